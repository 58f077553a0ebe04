//! Command implementations.

mod info;
mod push;
mod resolve;
mod validate;

pub use info::run_info;
pub use push::run_push;
pub use resolve::run_resolve;
pub use validate::run_validate;

use anyhow::{Context, Result};
use contracts::{JobOptions, JobsConfig};
use std::path::Path;

use crate::cli::OptionArgs;

/// Load a config file, failing early with a readable message
fn load_config(path: &Path) -> Result<JobsConfig> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }

    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Build immutable job options from CLI flags
fn build_options(args: &OptionArgs) -> JobOptions {
    let mut options = JobOptions::new();
    if let Some(pipeline) = &args.pipeline {
        options = options.with_pipeline(pipeline.clone());
    }
    if let Some(delay) = args.delay {
        options = options.with_delay(delay);
    }
    if let Some(attempts) = args.max_attempts {
        options = options.with_max_attempts(attempts);
    }
    if let Some(retry_delay) = args.retry_delay {
        options = options.with_retry_delay(retry_delay);
    }
    if let Some(timeout) = args.timeout {
        options = options.with_timeout(timeout);
    }
    options
}
