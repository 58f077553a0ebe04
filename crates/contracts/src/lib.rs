//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Push model
//! - A [`Job`] exposes a stable kind tag and is serializable
//! - [`JobOptions`] carry per-push delivery preferences
//! - [`PushRequest`] is the envelope handed to an [`RpcTransport`]
//! - [`PipelineLookup`] supplies the configured default pipeline for a kind

mod config;
mod error;
mod job;
mod lookup;
mod options;
mod request;
mod rpc;

pub use config::*;
pub use error::*;
pub use job::*;
pub use lookup::PipelineLookup;
pub use options::*;
pub use request::*;
pub use rpc::*;
