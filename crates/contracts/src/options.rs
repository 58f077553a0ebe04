//! JobOptions - per-push delivery preferences
//!
//! Immutable once built: every `with_*` method consumes the value and
//! returns a new one.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

/// Reservation timeout applied by the job service when none is given.
pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Delivery preferences for a single push.
///
/// `JobOptions::default()` leaves every field unset, which means "let the
/// dispatcher and the job service decide".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOptions {
    /// Explicit pipeline override, never `Some("")`
    #[serde(
        default,
        deserialize_with = "non_empty_pipeline",
        skip_serializing_if = "Option::is_none"
    )]
    pipeline: Option<String>,

    /// Seconds to delay execution for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delay: Option<u32>,

    /// Maximum number of attempts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_attempts: Option<u32>,

    /// Seconds to wait between attempts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retry_delay: Option<u32>,

    /// Seconds the broker waits before treating the job as failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout: Option<u32>,
}

fn non_empty_pipeline<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let pipeline = Option::<String>::deserialize(deserializer)?;
    Ok(pipeline.filter(|p| !p.is_empty()))
}

impl JobOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit pipeline override, if any.
    ///
    /// An empty name counts as unset.
    pub fn pipeline(&self) -> Option<&str> {
        self.pipeline.as_deref().filter(|p| !p.is_empty())
    }

    pub fn delay(&self) -> Option<u32> {
        self.delay
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn retry_delay(&self) -> Option<u32> {
        self.retry_delay
    }

    pub fn timeout(&self) -> Option<u32> {
        self.timeout
    }

    #[must_use]
    pub fn with_pipeline(self, pipeline: impl Into<String>) -> Self {
        let pipeline = pipeline.into();
        Self {
            pipeline: (!pipeline.is_empty()).then_some(pipeline),
            ..self
        }
    }

    #[must_use]
    pub fn with_delay(self, seconds: u32) -> Self {
        Self {
            delay: Some(seconds),
            ..self
        }
    }

    #[must_use]
    pub fn with_max_attempts(self, attempts: u32) -> Self {
        Self {
            max_attempts: Some(attempts),
            ..self
        }
    }

    #[must_use]
    pub fn with_retry_delay(self, seconds: u32) -> Self {
        Self {
            retry_delay: Some(seconds),
            ..self
        }
    }

    #[must_use]
    pub fn with_timeout(self, seconds: u32) -> Self {
        Self {
            timeout: Some(seconds),
            ..self
        }
    }

    /// Whether the broker may run the job again after `attempts` tries.
    pub fn can_retry(&self, attempts: u32) -> bool {
        self.max_attempts.unwrap_or(0) > attempts
    }

    pub fn delay_duration(&self) -> Duration {
        seconds(self.delay)
    }

    pub fn retry_duration(&self) -> Duration {
        seconds(self.retry_delay)
    }

    /// Reservation timeout, [`DEFAULT_JOB_TIMEOUT`] when unset or zero.
    pub fn timeout_duration(&self) -> Duration {
        match self.timeout {
            None | Some(0) => DEFAULT_JOB_TIMEOUT,
            Some(secs) => Duration::from_secs(u64::from(secs)),
        }
    }
}

fn seconds(value: Option<u32>) -> Duration {
    Duration::from_secs(u64::from(value.unwrap_or(0)))
}
