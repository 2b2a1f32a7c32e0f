//! Schema and resources commands
//!
//! Neither needs a reachable cluster or a valid configuration.

use super::CommandContext;
use anyhow::{bail, Result};
use clap::Parser;
use serde_json::json;

/// Arguments for the schema command
#[derive(Parser, Debug, Clone)]
pub struct SchemaArgs {
    /// Only print the schema of this resource type
    #[arg(long, short = 'r')]
    pub resource: Option<String>,
}

impl SchemaArgs {
    /// Execute the schema command
    pub fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let schemas = ctx.provider.resource_schemas();

        if let Some(name) = &self.resource {
            let Some(schema) = schemas.get(name.as_str()) else {
                bail!("unknown resource type '{}'", name);
            };
            ctx.print(schema)?;
            return Ok(0);
        }

        ctx.print(&json!({
            "provider": {
                "type": ctx.provider.type_name(),
                "version": ctx.provider.version(),
                "schema": ctx.provider.schema(),
            },
            "resources": schemas,
        }))?;
        Ok(0)
    }
}

/// Print every resource type name, one per line
pub fn list_resources(ctx: &CommandContext) -> Result<i32> {
    for name in ctx.provider.resource_schemas().keys() {
        println!("{}", name);
    }
    Ok(0)
}
