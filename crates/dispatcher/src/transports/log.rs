//! LogTransport - logs envelopes instead of sending them

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{RpcFailure, RpcTransport};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

/// Transport that logs each request and answers with a local id.
///
/// Requests are still fully serialized, so payload encoding failures show
/// up exactly as they would on the network.
#[derive(Debug)]
pub struct LogTransport {
    name: String,
    next_id: AtomicU64,
}

impl LogTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl RpcTransport for LogTransport {
    #[instrument(name = "log_transport_call", skip(self, request), fields(transport = %self.name))]
    async fn call<R>(&self, method: &str, request: &R) -> Result<Value, RpcFailure>
    where
        R: Serialize + Sync,
    {
        let body = serde_json::to_string(request)?;
        let id = format!("local-{}", self.next_id.fetch_add(1, Ordering::Relaxed));

        info!(
            transport = %self.name,
            method,
            id = %id,
            request = %body,
            "request logged"
        );

        Ok(Value::String(id))
    }
}
