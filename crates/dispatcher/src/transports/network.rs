//! NetworkTransport - newline-delimited JSON calls over TCP
//!
//! Frame format, one JSON object per line:
//! - request:  `{"id":1,"method":"jobs.Push","params":{...}}`
//! - response: `{"id":1,"result":...}` or `{"id":1,"error":{"code":..,"message":".."}}`
//!
//! Every call opens its own connection. Responses are read up to
//! `max_response_bytes`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use contracts::{RpcConfig, RpcFailure, RpcTransport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

/// Configuration for NetworkTransport
#[derive(Debug, Clone)]
pub struct NetworkTransportConfig {
    /// Target `host:port`
    pub addr: String,
    /// Deadline for connect + request + response (None = no deadline)
    pub timeout: Option<Duration>,
    /// Longest response line accepted, newline included
    pub max_response_bytes: u64,
}

/// 1 MiB
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 1024 * 1024;

impl NetworkTransportConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    pub fn from_rpc(rpc: &RpcConfig) -> Self {
        Self {
            timeout: rpc.timeout(),
            ..Self::new(rpc.address.clone())
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_max_response_bytes(mut self, limit: u64) -> Self {
        self.max_response_bytes = limit;
        self
    }
}

#[derive(Serialize)]
struct RequestFrame<'a, R> {
    id: u64,
    method: &'a str,
    params: &'a R,
}

#[derive(Debug, Deserialize)]
struct ResponseFrame {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RemoteError>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

/// Transport that calls the job service over TCP
#[derive(Debug)]
pub struct NetworkTransport {
    config: NetworkTransportConfig,
    next_id: AtomicU64,
}

impl NetworkTransport {
    pub fn new(config: NetworkTransportConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_rpc(rpc: &RpcConfig) -> Self {
        Self::new(NetworkTransportConfig::from_rpc(rpc))
    }

    pub fn addr(&self) -> &str {
        &self.config.addr
    }

    fn encode<R: Serialize>(id: u64, method: &str, params: &R) -> Result<Vec<u8>, RpcFailure> {
        let mut frame = serde_json::to_vec(&RequestFrame { id, method, params })?;
        frame.push(b'\n');
        Ok(frame)
    }

    fn decode(id: u64, line: &str) -> Result<Value, RpcFailure> {
        let frame: ResponseFrame = serde_json::from_str(line)?;

        if frame.id != id {
            return Err(RpcFailure::codec(format!(
                "response id {} does not match request id {id}",
                frame.id
            )));
        }

        match (frame.error, frame.result) {
            (Some(err), _) => Err(RpcFailure::remote(err.code, err.message)),
            (None, Some(result)) => Ok(result),
            (None, None) => Err(RpcFailure::codec(
                "response carries neither result nor error",
            )),
        }
    }

    async fn exchange(&self, frame: &[u8]) -> Result<String, RpcFailure> {
        let mut stream = TcpStream::connect(&self.config.addr).await?;
        stream.write_all(frame).await?;
        stream.flush().await?;

        let limit = self.config.max_response_bytes;
        let mut reader = BufReader::new(stream).take(limit);
        let mut line = String::new();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            return Err(RpcFailure::connection(
                "connection closed before a response arrived",
            ));
        }
        if !line.ends_with('\n') && read as u64 >= limit {
            return Err(RpcFailure::codec(format!("response exceeds {limit} bytes")));
        }
        Ok(line)
    }
}

impl RpcTransport for NetworkTransport {
    #[instrument(
        name = "network_transport_call",
        skip(self, request),
        fields(addr = %self.config.addr)
    )]
    async fn call<R>(&self, method: &str, request: &R) -> Result<Value, RpcFailure>
    where
        R: Serialize + Sync,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let frame = Self::encode(id, method, request)?;

        let line = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(&frame))
                .await
                .map_err(|_| {
                    RpcFailure::timeout(format!(
                        "no response from {} within {limit:?}",
                        self.config.addr
                    ))
                })??,
            None => self.exchange(&frame).await?,
        };

        debug!(id, bytes = line.len(), "response received");
        Self::decode(id, line.trim_end())
    }
}
