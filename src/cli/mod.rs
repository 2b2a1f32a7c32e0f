//! CLI module for garage-provider
//!
//! Operator harness around the provider: argument parsing and subcommand
//! dispatch. The host runtime drives the library directly; this binary
//! lets the same lifecycle be driven by hand against a live cluster.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// garage-provider - Manage buckets, access keys and permissions of a Garage cluster
#[derive(Parser, Debug, Clone)]
#[command(name = "garage-provider")]
#[command(version)]
#[command(about = "Manage a Garage cluster through its admin API", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "GARAGE_PROVIDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hostname/ip (and port) of the admin API, overrides config and GARAGE_HOST
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Scheme of the admin API (http or https)
    #[arg(long, global = true)]
    pub scheme: Option<String>,

    /// Admin API token, overrides config and GARAGE_TOKEN
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print provider and resource schemas as JSON
    Schema(commands::schema::SchemaArgs),

    /// List resource type names
    Resources,

    /// Create a resource from planned state
    Create(commands::lifecycle::StateArgs),

    /// Refresh a resource's state from the cluster
    Read(commands::lifecycle::StateArgs),

    /// Update a resource from prior and planned state
    Update(commands::lifecycle::UpdateArgs),

    /// Delete a resource
    Delete(commands::lifecycle::StateArgs),

    /// Import an existing object by id
    Import(commands::lifecycle::ImportArgs),

    /// Validate planned state and list attributes forcing replacement
    Plan(commands::lifecycle::UpdateArgs),
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["garage-provider", "resources"]).unwrap();
        assert!(matches!(cli.command, Commands::Resources));
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["garage-provider", "-vvvvv", "resources"]).unwrap();
        assert_eq!(cli.verbosity(), 3);
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "garage-provider",
            "read",
            "garage_bucket",
            "--state",
            r#"{"id":"b1"}"#,
            "--host",
            "garage:3903",
            "--scheme",
            "http",
        ])
        .unwrap();
        assert_eq!(cli.host.as_deref(), Some("garage:3903"));
        assert_eq!(cli.scheme.as_deref(), Some("http"));
        match cli.command {
            Commands::Read(args) => assert_eq!(args.resource, "garage_bucket"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_update_requires_prior() {
        let result = Cli::try_parse_from([
            "garage-provider",
            "update",
            "garage_bucket",
            "--state",
            "{}",
        ]);
        assert!(result.is_err());
    }
}
