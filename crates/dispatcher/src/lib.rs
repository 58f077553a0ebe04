//! # Dispatcher
//!
//! Job submission module.
//!
//! Responsible for:
//! - Resolving the pipeline of a job (explicit option, then dispatch rules)
//! - Building the push envelope
//! - Making exactly one call to the job service per push
//! - Funnelling every failure into [`DispatchError`]

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod transports;

pub use contracts::{Job, JobId, JobOptions, PipelineLookup, RpcTransport};
pub use dispatcher::{Dispatcher, DEFAULT_SERVICE};
pub use error::DispatchError;
pub use metrics::{MetricsSnapshot, PushMetrics};
pub use transports::{LogTransport, NetworkTransport, NetworkTransportConfig};
