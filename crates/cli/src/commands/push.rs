//! `push` command implementation.

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{error, info};

use config_loader::DispatchTable;
use contracts::{Job, JobOptions, PipelineLookup, RawJob, RpcTransport};
use dispatcher::{Dispatcher, LogTransport, NetworkTransport};
use observability::PushStatsAggregator;

use super::{build_options, load_config};
use crate::cli::PushArgs;

/// Execute the `push` command
pub async fn run_push(args: &PushArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;

    if let Some(ref address) = args.address {
        info!(address = %address, "Overriding job service address from CLI");
        config.rpc.address = address.clone();
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let payload = serde_json::from_str(&args.payload).context("--payload is not valid JSON")?;
    let job = RawJob::new(&args.kind, payload);
    let options = build_options(&args.options);
    let lookup = DispatchTable::from_config(&config);
    let method = config.rpc.push_method();

    if args.dry_run {
        info!("Dry run mode - requests are logged, not sent");
        let dispatcher =
            Dispatcher::new(LogTransport::new("dry-run"), lookup).with_method(method);
        push_repeated(&dispatcher, &job, &options, args.repeat).await
    } else {
        info!(address = %config.rpc.address, method = %method, "Pushing to job service");
        let dispatcher =
            Dispatcher::new(NetworkTransport::from_rpc(&config.rpc), lookup).with_method(method);
        push_repeated(&dispatcher, &job, &options, args.repeat).await
    }
}

/// Submit `job` as `repeat` independent jobs, printing each id, and a
/// summary for batches. A failed push is reported, never resent.
async fn push_repeated<T, L>(
    dispatcher: &Dispatcher<T, L>,
    job: &RawJob,
    options: &JobOptions,
    repeat: u32,
) -> Result<()>
where
    T: RpcTransport + Sync,
    L: PipelineLookup,
{
    let pipeline = dispatcher.resolve_pipeline(job.kind(), options).ok();
    let mut stats = PushStatsAggregator::new();
    let mut last_error = None;

    for seq in 1..=repeat.max(1) {
        let started = Instant::now();
        let outcome = dispatcher.push(job, Some(options.clone())).await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(id) => {
                stats.update(pipeline.as_ref().map(|p| p.as_str()), true, latency_ms);
                println!("{id}");
            }
            Err(e) => {
                stats.update(pipeline.as_ref().map(|p| p.as_str()), false, latency_ms);
                error!(seq, error = %e, "Push failed");
                let unresolved = e.is_resolution();
                last_error = Some(e);
                if unresolved {
                    break;
                }
            }
        }
    }

    if repeat > 1 {
        print!("{}", stats.summary());
    }

    match last_error {
        Some(e) => Err(e).with_context(|| format!("Failed to push job '{}'", job.kind())),
        None => Ok(()),
    }
}
