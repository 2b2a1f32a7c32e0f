//! Subcommands module for the garage-provider CLI

pub mod lifecycle;
pub mod schema;

use anyhow::{Context, Result};
use garage_provider::config::ProviderConfig;
use garage_provider::provider::GarageProvider;
use garage_provider::resources::{ResourceRegistry, ResourceState};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;

/// Common context shared between commands
pub struct CommandContext {
    /// Configuration after file, env and flag overrides
    pub config: ProviderConfig,
    /// Provider metadata and schemas
    pub provider: GarageProvider,
}

impl CommandContext {
    /// Create a new command context from CLI arguments
    pub fn new(cli: &crate::cli::Cli, mut config: ProviderConfig) -> Self {
        if let Some(host) = &cli.host {
            config.host = Some(host.clone());
        }
        if let Some(scheme) = &cli.scheme {
            config.scheme = Some(scheme.clone());
        }
        if let Some(token) = &cli.token {
            config.token = Some(token.clone());
        }

        Self {
            config,
            provider: GarageProvider::default(),
        }
    }

    /// Configure the provider; fails on a missing host/token or a bad scheme.
    pub fn registry(&self) -> Result<ResourceRegistry> {
        self.provider
            .configure(&self.config)
            .context("failed to configure provider")
    }

    /// Print `value` as pretty JSON on stdout
    pub fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print state with its keys sorted
    pub fn print_state(&self, state: &ResourceState) -> Result<()> {
        let sorted: BTreeMap<&String, &serde_json::Value> = state.iter().collect();
        self.print(&sorted)
    }
}

/// Parse a state argument: inline JSON, `@path` to a JSON file, or `-` for stdin.
pub fn parse_state(arg: &str) -> Result<ResourceState> {
    let content = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read state from stdin")?;
        buf
    } else if let Some(path) = arg.strip_prefix('@') {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state file '{}'", path))?
    } else {
        arg.to_string()
    };

    let state: ResourceState =
        serde_json::from_str(&content).context("state must be a JSON object")?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_inline_state() {
        let state = parse_state(r#"{"name": "bongo", "read": true}"#).unwrap();
        assert_eq!(state.get("name"), Some(&json!("bongo")));
        assert_eq!(state.get("read"), Some(&json!(true)));
    }

    #[test]
    fn test_parse_state_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id": "b1"}}"#).unwrap();
        let arg = format!("@{}", file.path().display());
        let state = parse_state(&arg).unwrap();
        assert_eq!(state.get("id"), Some(&json!("b1")));
    }

    #[test]
    fn test_parse_state_rejects_non_object() {
        assert!(parse_state("[1, 2]").is_err());
        assert!(parse_state("@/definitely/not/here.json").is_err());
    }
}
