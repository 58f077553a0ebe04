//! Job capability and the identifier returned by the job service.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A unit of work that can be pushed to the job service.
///
/// The kind tag is used both for default pipeline lookup and for routing on
/// the remote side, so it must be stable for a given job type.
pub trait Job: Serialize + Send + Sync {
    /// Stable kind tag, e.g. `"app-jobs-send-mail"`
    fn kind(&self) -> &str;
}

impl<J: Job + ?Sized> Job for &J {
    fn kind(&self) -> &str {
        (**self).kind()
    }
}

/// A job assembled at runtime from a kind tag and a JSON payload.
///
/// Serializes as its payload only; the kind travels in the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct RawJob {
    kind: String,
    payload: Value,
}

impl RawJob {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

impl Serialize for RawJob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

impl Job for RawJob {
    fn kind(&self) -> &str {
        &self.kind
    }
}

/// Identifier assigned by the job service to an accepted job.
///
/// Opaque to this side; returned to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
