//! Dispatcher - pipeline resolution and the push call

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use contracts::{
    Job, JobId, JobOptions, PipelineLookup, PipelineName, PushRequest, RpcFailure, RpcTransport,
};

use crate::error::DispatchError;
use crate::metrics::{MetricsSnapshot, PushMetrics};

/// Service name used when no other is configured
pub const DEFAULT_SERVICE: &str = "jobs";

/// Submits jobs to the remote job service.
///
/// Holds only its two collaborators and a counter block; share it behind an
/// `Arc` and call [`push`](Self::push) from as many tasks as needed.
pub struct Dispatcher<T, L> {
    transport: T,
    lookup: L,
    method: String,
    metrics: Arc<PushMetrics>,
}

impl<T, L> Dispatcher<T, L>
where
    T: RpcTransport + Sync,
    L: PipelineLookup,
{
    /// Create a dispatcher calling `jobs.Push`
    pub fn new(transport: T, lookup: L) -> Self {
        Self {
            transport,
            lookup,
            method: format!("{DEFAULT_SERVICE}.Push"),
            metrics: Arc::new(PushMetrics::new()),
        }
    }

    /// Override the remote method name
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get current counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Resolve the pipeline for a job kind.
    ///
    /// An explicit option wins over the dispatch rules. Empty names count
    /// as absent on both sides.
    ///
    /// # Errors
    /// [`DispatchError::PipelineResolution`] when neither yields a name
    pub fn resolve_pipeline(
        &self,
        job_kind: &str,
        options: &JobOptions,
    ) -> Result<PipelineName, DispatchError> {
        if let Some(pipeline) = options.pipeline().and_then(PipelineName::new) {
            debug!(job = job_kind, pipeline = %pipeline, source = "options", "pipeline resolved");
            return Ok(pipeline);
        }

        match self
            .lookup
            .default_pipeline(job_kind)
            .and_then(PipelineName::new)
        {
            Some(pipeline) => {
                debug!(
                    job = job_kind,
                    pipeline = %pipeline,
                    source = "dispatch",
                    "pipeline resolved"
                );
                Ok(pipeline)
            }
            None => Err(DispatchError::pipeline_resolution(job_kind)),
        }
    }

    /// Push a job and return the identifier assigned by the service.
    ///
    /// `None` options behave like `JobOptions::default()`. Exactly one call
    /// is made per push; nothing is retried.
    ///
    /// # Errors
    /// - [`DispatchError::PipelineResolution`] before any call is attempted
    /// - [`DispatchError::Push`] for every failure from the call onwards
    #[instrument(name = "dispatcher_push", skip(self, job, options), fields(job = %job.kind()))]
    pub async fn push<J: Job>(
        &self,
        job: &J,
        options: Option<JobOptions>,
    ) -> Result<JobId, DispatchError> {
        let options = options.unwrap_or_default();
        let kind = job.kind();

        let pipeline = match self.resolve_pipeline(kind, &options) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                self.metrics.inc_unresolved_count();
                observability::record_pipeline_unresolved();
                warn!(job = kind, "no pipeline for job, push rejected");
                return Err(e);
            }
        };

        let request = PushRequest::new(job, &pipeline, &options);
        let started = Instant::now();
        let outcome = self
            .transport
            .call(&self.method, &request)
            .await
            .and_then(into_job_id);
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(id) => {
                self.metrics.inc_pushed_count();
                observability::record_push(pipeline.as_str(), true, latency_ms);
                info!(job = kind, pipeline = %pipeline, id = %id, latency_ms, "job pushed");
                Ok(id)
            }
            Err(failure) => {
                self.metrics.inc_failure_count();
                observability::record_push(pipeline.as_str(), false, latency_ms);
                warn!(
                    job = kind,
                    pipeline = %pipeline,
                    failure = %failure.kind,
                    code = ?failure.code,
                    error = %failure.message,
                    "push failed"
                );
                Err(DispatchError::push(kind, failure))
            }
        }
    }
}

/// The service answers with the job id as a bare string
fn into_job_id(response: Value) -> Result<JobId, RpcFailure> {
    match response {
        Value::String(id) => Ok(JobId::from(id)),
        other => Err(RpcFailure::codec(format!(
            "expected a string job id, got {other}"
        ))),
    }
}
