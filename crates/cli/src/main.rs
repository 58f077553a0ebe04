//! # jobs-push
//!
//! Command-line entry point.
//!
//! Provides:
//! - Job submission with explicit options or configured dispatch rules
//! - Pipeline resolution preview
//! - Configuration validation and inspection

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_info, run_push, run_resolve, run_validate};
use observability::ObservabilityConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "jobs-push");

    let result = match &cli.command {
        Commands::Push(args) => run_push(args).await,
        Commands::Resolve(args) => run_resolve(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(err) = &result {
        tracing::error!(error = %err, "command failed");
    }

    result
}

fn init_logging(cli: &Cli) -> Result<()> {
    observability::init_with_config(ObservabilityConfig::from_verbosity(
        cli.quiet,
        cli.verbose,
        cli.log_format.into(),
    ))
}
