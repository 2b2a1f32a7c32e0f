//! Lifecycle commands - create, read, update, delete, import, plan
//!
//! Each one configures the provider, dispatches through the resource
//! registry and prints the resulting state as JSON.

use super::{parse_state, CommandContext};
use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing::info;

/// Arguments for commands acting on a single state document
#[derive(Parser, Debug, Clone)]
pub struct StateArgs {
    /// Resource type, e.g. garage_bucket
    pub resource: String,

    /// State as inline JSON, @file or - for stdin
    #[arg(long, short = 's')]
    pub state: String,
}

/// Arguments for commands comparing prior and planned state
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Resource type, e.g. garage_bucket
    pub resource: String,

    /// Prior state as inline JSON or @file
    #[arg(long, short = 'p')]
    pub prior: String,

    /// Planned state as inline JSON, @file or - for stdin
    #[arg(long, short = 's')]
    pub state: String,
}

/// Arguments for the import command
#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// Resource type, e.g. garage_permission
    pub resource: String,

    /// Id of the existing object
    pub id: String,
}

impl StateArgs {
    pub async fn create(&self, ctx: &CommandContext) -> Result<i32> {
        let plan = parse_state(&self.state)?;
        let state = ctx.registry()?.create(&self.resource, &plan).await?;
        info!(resource = %self.resource, "created");
        ctx.print_state(&state)?;
        Ok(0)
    }

    pub async fn read(&self, ctx: &CommandContext) -> Result<i32> {
        let current = parse_state(&self.state)?;
        let state = ctx.registry()?.read(&self.resource, &current).await?;
        ctx.print_state(&state)?;
        Ok(0)
    }

    pub async fn delete(&self, ctx: &CommandContext) -> Result<i32> {
        let current = parse_state(&self.state)?;
        ctx.registry()?.delete(&self.resource, &current).await?;
        info!(resource = %self.resource, "deleted");
        Ok(0)
    }
}

impl UpdateArgs {
    pub async fn update(&self, ctx: &CommandContext) -> Result<i32> {
        let prior = parse_state(&self.prior)?;
        let plan = parse_state(&self.state)?;
        let state = ctx
            .registry()?
            .update(&self.resource, &prior, &plan)
            .await?;
        info!(resource = %self.resource, "updated");
        ctx.print_state(&state)?;
        Ok(0)
    }

    /// Validate the plan and report which attributes force replacement.
    /// Makes no request to the cluster.
    pub fn plan(&self, ctx: &CommandContext) -> Result<i32> {
        let prior = parse_state(&self.prior)?;
        let plan = parse_state(&self.state)?;
        let registry = ctx.registry()?;
        registry.validate(&self.resource, &plan)?;
        let replace = registry.requires_replace(&self.resource, &prior, &plan)?;
        ctx.print(&json!({
            "resource": self.resource,
            "requires_replace": replace,
        }))?;
        Ok(0)
    }
}

impl ImportArgs {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let state = ctx.registry()?.import(&self.resource, &self.id).await?;
        info!(resource = %self.resource, "imported");
        ctx.print_state(&state)?;
        Ok(0)
    }
}
