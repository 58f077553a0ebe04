//! Dispatcher error types

use contracts::{RpcFailure, RpcFailureKind};
use thiserror::Error;

/// The single failure type of a push.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Neither the options nor the dispatch rules named a pipeline.
    /// Raised before any call is attempted.
    #[error("no pipeline resolved for job '{job}'")]
    PipelineResolution { job: String },

    /// Anything that went wrong during or after the call
    #[error("failed to push job '{job}': {message}")]
    Push {
        job: String,
        message: String,
        code: Option<i64>,
        #[source]
        source: RpcFailure,
    },
}

impl DispatchError {
    /// Create a resolution error
    pub fn pipeline_resolution(job: impl Into<String>) -> Self {
        Self::PipelineResolution { job: job.into() }
    }

    /// Wrap a transport failure, keeping its message and code
    pub fn push(job: impl Into<String>, failure: RpcFailure) -> Self {
        Self::Push {
            job: job.into(),
            message: failure.message.clone(),
            code: failure.code,
            source: failure,
        }
    }

    /// Kind tag of the job that failed
    pub fn job(&self) -> &str {
        match self {
            Self::PipelineResolution { job } | Self::Push { job, .. } => job,
        }
    }

    /// Message of the underlying failure
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::PipelineResolution { .. } => None,
            Self::Push { message, .. } => Some(message),
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            Self::PipelineResolution { .. } => None,
            Self::Push { code, .. } => *code,
        }
    }

    pub fn failure_kind(&self) -> Option<RpcFailureKind> {
        match self {
            Self::PipelineResolution { .. } => None,
            Self::Push { source, .. } => Some(source.kind),
        }
    }

    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::PipelineResolution { .. })
    }
}
