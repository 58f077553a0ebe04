//! JobsConfig - Config Loader output
//!
//! Describes the job service endpoint, the declared pipelines and the
//! dispatch rules that assign default pipelines to job kinds.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Full jobs configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct JobsConfig {
    /// Job service endpoint
    #[serde(default)]
    #[validate(nested)]
    pub rpc: RpcConfig,

    /// Declared pipelines
    #[serde(default)]
    pub pipelines: Vec<PipelineConfig>,

    /// Default pipeline assignment, in declaration order
    #[serde(default)]
    pub dispatch: Vec<DispatchRule>,
}

/// Job service endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RpcConfig {
    /// `host:port` of the job service
    #[serde(default = "default_rpc_address")]
    #[validate(length(min = 1, message = "rpc address cannot be empty"))]
    pub address: String,

    /// Service name, the push method is `<service>.Push`
    #[serde(default = "default_rpc_service")]
    #[validate(length(min = 1, message = "rpc service cannot be empty"))]
    pub service: String,

    /// Per-call timeout in milliseconds (0 = none)
    #[serde(default = "default_rpc_timeout_ms")]
    pub timeout_ms: u64,
}

impl RpcConfig {
    /// Fully qualified push method name
    pub fn push_method(&self) -> String {
        format!("{}.Push", self.service)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            address: default_rpc_address(),
            service: default_rpc_service(),
            timeout_ms: default_rpc_timeout_ms(),
        }
    }
}

fn default_rpc_address() -> String {
    "127.0.0.1:6001".to_string()
}

fn default_rpc_service() -> String {
    "jobs".to_string()
}

fn default_rpc_timeout_ms() -> u64 {
    5000
}

/// Declared pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,

    /// Broker backing the pipeline, informational on the client side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker: Option<String>,
}

/// Maps job kinds matching `pattern` to `pipeline`.
///
/// `*` in the pattern matches any run of characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRule {
    pub pattern: String,
    pub pipeline: String,
}

impl DispatchRule {
    pub fn new(pattern: impl Into<String>, pipeline: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            pipeline: pipeline.into(),
        }
    }
}
