//! `resolve` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use config_loader::DispatchTable;
use contracts::JobOptions;
use dispatcher::{Dispatcher, LogTransport};

use super::load_config;
use crate::cli::ResolveArgs;

#[derive(Serialize)]
struct Resolution {
    job: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pipeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the `resolve` command
pub fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let resolution = resolve(&config, args);

    info!(job = %resolution.job, pipeline = ?resolution.pipeline, "Resolution computed");

    if args.json {
        let json = serde_json::to_string_pretty(&resolution)
            .context("Failed to serialize resolution")?;
        println!("{}", json);
    } else if let Some(ref pipeline) = resolution.pipeline {
        println!("{} -> {}", resolution.job, pipeline);
    } else {
        println!("{} -> (unresolved)", resolution.job);
    }

    match resolution.error {
        Some(error) => anyhow::bail!(error),
        None => Ok(()),
    }
}

fn resolve(config: &contracts::JobsConfig, args: &ResolveArgs) -> Resolution {
    // resolution never reaches the transport
    let dispatcher = Dispatcher::new(
        LogTransport::new("resolve"),
        DispatchTable::from_config(config),
    );

    let options = match args.pipeline {
        Some(ref pipeline) => JobOptions::new().with_pipeline(pipeline.clone()),
        None => JobOptions::new(),
    };

    match dispatcher.resolve_pipeline(&args.kind, &options) {
        Ok(pipeline) => Resolution {
            job: args.kind.clone(),
            pipeline: Some(pipeline.to_string()),
            error: None,
        },
        Err(e) => Resolution {
            job: args.kind.clone(),
            pipeline: None,
            error: Some(e.to_string()),
        },
    }
}
