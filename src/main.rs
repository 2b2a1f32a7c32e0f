//! garage-provider - declarative management of a Garage cluster
//!
//! This is the main entry point for the garage-provider CLI.

mod cli;

use anyhow::Result;
use cli::commands::{schema, CommandContext};
use cli::{Cli, Commands};
use garage_provider::config::ProviderConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application version information
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity(), cli.log_json);
    tracing::debug!(version = VERSION, "garage-provider starting");

    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> Result<i32> {
    // Load configuration
    let config = ProviderConfig::load(cli.config.as_deref())?;
    let ctx = CommandContext::new(cli, config);

    // Execute the appropriate command
    match &cli.command {
        Commands::Schema(args) => args.execute(&ctx),
        Commands::Resources => schema::list_resources(&ctx),
        Commands::Create(args) => args.create(&ctx).await,
        Commands::Read(args) => args.read(&ctx).await,
        Commands::Update(args) => args.update(&ctx).await,
        Commands::Delete(args) => args.delete(&ctx).await,
        Commands::Import(args) => args.execute(&ctx).await,
        Commands::Plan(args) => args.plan(&ctx),
    }
}

/// Initialize logging based on verbosity level. Logs go to stderr so stdout
/// stays machine-readable.
fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(verbosity >= 3)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
