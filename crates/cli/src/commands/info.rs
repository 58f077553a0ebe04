//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::JobsConfig;

use super::load_config;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    rpc: RpcInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pipelines: Vec<PipelineInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dispatch: Vec<RuleInfo>,
}

#[derive(Serialize)]
struct RpcInfo {
    address: String,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
}

#[derive(Serialize)]
struct PipelineInfo {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    broker: Option<String>,
}

#[derive(Serialize)]
struct RuleInfo {
    pattern: String,
    pipeline: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let config = load_config(&args.config)?;

    if args.json {
        let json = serde_json::to_string_pretty(&build_config_info(&config))
            .context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn build_config_info(config: &JobsConfig) -> ConfigInfo {
    ConfigInfo {
        rpc: RpcInfo {
            address: config.rpc.address.clone(),
            method: config.rpc.push_method(),
            timeout_ms: config.rpc.timeout().map(|t| t.as_millis() as u64),
        },
        pipelines: config
            .pipelines
            .iter()
            .map(|p| PipelineInfo {
                name: p.name.clone(),
                broker: p.broker.clone(),
            })
            .collect(),
        dispatch: config
            .dispatch
            .iter()
            .map(|r| RuleInfo {
                pattern: r.pattern.clone(),
                pipeline: r.pipeline.clone(),
            })
            .collect(),
    }
}

fn print_config_info(config: &JobsConfig) {
    println!("\n=== Jobs Configuration ===\n");
    println!("Job service:");
    println!("  Address: {}", config.rpc.address);
    println!("  Method: {}", config.rpc.push_method());
    match config.rpc.timeout() {
        Some(timeout) => println!("  Timeout: {}ms", timeout.as_millis()),
        None => println!("  Timeout: none"),
    }

    println!("\nPipelines ({}):", config.pipelines.len());
    for pipeline in &config.pipelines {
        match pipeline.broker {
            Some(ref broker) => println!("  - {} ({})", pipeline.name, broker),
            None => println!("  - {}", pipeline.name),
        }
    }

    println!("\nDispatch rules ({}):", config.dispatch.len());
    for rule in &config.dispatch {
        println!("  - {} -> {}", rule.pattern, rule.pipeline);
    }

    println!();
}
