//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// jobs-push - submit jobs to a remote job service
#[derive(Parser, Debug)]
#[command(
    name = "jobs-push",
    author,
    version,
    about = "Push jobs to a remote job service",
    long_about = "Resolves the pipeline of a job from explicit options or the dispatch \n\
                  rules of the jobs configuration, then submits it over RPC and prints \n\
                  the identifier assigned by the service."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "JOBS_PUSH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "JOBS_PUSH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Push a job to the job service
    Push(PushArgs),

    /// Show which pipeline a job kind resolves to
    Resolve(ResolveArgs),

    /// Validate configuration file
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Per-push delivery options
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Explicit pipeline, overrides the dispatch rules
    #[arg(long)]
    pub pipeline: Option<String>,

    /// Delay execution by this many seconds
    #[arg(long)]
    pub delay: Option<u32>,

    /// Maximum number of attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Seconds between attempts
    #[arg(long)]
    pub retry_delay: Option<u32>,

    /// Seconds before the broker treats the job as failed
    #[arg(long)]
    pub timeout: Option<u32>,
}

/// Arguments for the `push` command
#[derive(Parser, Debug, Clone)]
pub struct PushArgs {
    /// Job kind tag
    pub kind: String,

    /// Job payload as JSON
    #[arg(long, default_value = "{}")]
    pub payload: String,

    #[command(flatten)]
    pub options: OptionArgs,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "jobs.toml", env = "JOBS_CONFIG")]
    pub config: PathBuf,

    /// Override the job service address from configuration
    #[arg(long, env = "JOBS_RPC_ADDRESS")]
    pub address: Option<String>,

    /// Log the request instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Submit this many independent jobs, one call each (not a retry)
    #[arg(long, default_value = "1")]
    pub repeat: u32,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "JOBS_PUSH_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `resolve` command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Job kind tag
    pub kind: String,

    /// Explicit pipeline to test precedence with
    #[arg(long)]
    pub pipeline: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "jobs.toml", env = "JOBS_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "jobs.toml", env = "JOBS_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "jobs.toml", env = "JOBS_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
