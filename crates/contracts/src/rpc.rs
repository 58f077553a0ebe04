//! RpcTransport trait - the call primitive used by the dispatcher
//!
//! A transport invokes a named remote method with a serializable request and
//! hands back either the raw response value or an [`RpcFailure`].

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Call primitive trait
///
/// Implementations must be safe to share between concurrent callers.
#[trait_variant::make(RpcTransport: Send)]
pub trait LocalRpcTransport {
    /// Invoke `method` with `request`.
    ///
    /// # Errors
    /// Any connection, codec, timeout or remote failure, tagged by [`RpcFailureKind`]
    async fn call<R>(&self, method: &str, request: &R) -> Result<Value, RpcFailure>
    where
        R: Serialize + Sync;
}

/// Where a call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcFailureKind {
    /// Could not reach the service, or the connection broke mid-call
    Connection,
    /// No response within the transport deadline
    Timeout,
    /// Request could not be encoded or response could not be decoded
    Codec,
    /// The service processed the call and reported an error
    Remote,
    /// Anything else
    Other,
}

impl RpcFailureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Timeout => "timeout",
            Self::Codec => "codec",
            Self::Remote => "remote",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RpcFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure branch of a transport call.
#[derive(Debug, Error)]
#[error("{kind} failure: {message}")]
pub struct RpcFailure {
    pub kind: RpcFailureKind,
    pub message: String,
    /// Error code reported by the remote side, if any
    pub code: Option<i64>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RpcFailure {
    pub fn new(kind: RpcFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: None,
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(RpcFailureKind::Connection, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(RpcFailureKind::Timeout, message)
    }

    pub fn codec(message: impl Into<String>) -> Self {
        Self::new(RpcFailureKind::Codec, message)
    }

    /// Create a failure reported by the remote service
    pub fn remote(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            code,
            ..Self::new(RpcFailureKind::Remote, message)
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(RpcFailureKind::Other, message)
    }

    #[must_use]
    pub fn with_source(self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..self
        }
    }
}

impl From<std::io::Error> for RpcFailure {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::TimedOut => RpcFailureKind::Timeout,
            // undecodable bytes on an otherwise healthy stream
            std::io::ErrorKind::InvalidData => RpcFailureKind::Codec,
            _ => RpcFailureKind::Connection,
        };
        Self::new(kind, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for RpcFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::codec(err.to_string()).with_source(err)
    }
}
