//! PushRequest - the envelope sent to the job service

use std::fmt;

use serde::{Serialize, Serializer};

use crate::{Job, JobOptions};

/// A resolved, non-empty pipeline name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PipelineName(String);

impl PipelineName {
    /// Returns `None` for an empty name.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (!name.is_empty()).then_some(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PipelineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request body of the `<service>.Push` method.
///
/// The payload is borrowed and only encoded when the transport serializes
/// the envelope; it goes on the wire as a JSON string, which is the form
/// the job service stores and hands to workers.
#[derive(Debug, Serialize)]
pub struct PushRequest<'a, J: Job> {
    /// Job kind tag
    pub job: &'a str,
    /// Resolved pipeline
    pub pipeline: &'a PipelineName,
    /// The job itself
    #[serde(serialize_with = "serialize_payload")]
    pub payload: &'a J,
    /// Normalised options
    pub options: &'a JobOptions,
}

impl<'a, J: Job> PushRequest<'a, J> {
    pub fn new(job: &'a J, pipeline: &'a PipelineName, options: &'a JobOptions) -> Self {
        Self {
            job: job.kind(),
            pipeline,
            payload: job,
            options,
        }
    }
}

fn serialize_payload<J, S>(payload: &&J, serializer: S) -> Result<S::Ok, S::Error>
where
    J: Job,
    S: Serializer,
{
    let encoded = serde_json::to_string(*payload).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawJob;
    use serde_json::{json, Value};

    #[test]
    fn test_pipeline_name_rejects_empty() {
        assert!(PipelineName::new("").is_none());
        assert_eq!(PipelineName::new("default").unwrap().as_str(), "default");
    }

    #[test]
    fn test_envelope_shape() {
        let job = RawJob::new("app-jobs-mail", json!({"to": "a@b.c"}));
        let pipeline = PipelineName::new("mail").unwrap();
        let options = JobOptions::new().with_delay(3);

        let request = PushRequest::new(&job, &pipeline, &options);
        let value: Value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "job": "app-jobs-mail",
                "pipeline": "mail",
                "payload": "{\"to\":\"a@b.c\"}",
                "options": {"delay": 3}
            })
        );
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("payload refused"))
        }
    }

    impl Job for Unserializable {
        fn kind(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_payload_failure_surfaces_at_serialization() {
        let pipeline = PipelineName::new("default").unwrap();
        let options = JobOptions::new();
        let request = PushRequest::new(&Unserializable, &pipeline, &options);

        let err = serde_json::to_string(&request).unwrap_err();
        assert!(err.to_string().contains("payload refused"), "got: {err}");
    }
}
