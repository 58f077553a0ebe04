//! # Integration Tests
//!
//! Cross-crate tests of the push path.
//!
//! Covers:
//! - Pipeline resolution precedence against real dispatch tables
//! - Failure funnelling into a single error kind
//! - Concurrent pushes against one dispatcher
//! - A full round trip over TCP

#[cfg(test)]
mod support {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    use contracts::{RpcFailure, RpcTransport};
    use serde::{Serialize, Serializer};
    use serde_json::{json, Value};

    /// Assigns `job-<n>` ids from a shared counter and keeps every request
    #[derive(Default)]
    pub struct CountingTransport {
        calls: AtomicU64,
        requests: Mutex<Vec<Value>>,
    }

    impl CountingTransport {
        pub fn calls(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<Value> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl RpcTransport for CountingTransport {
        async fn call<R>(&self, _method: &str, request: &R) -> Result<Value, RpcFailure>
        where
            R: Serialize + Sync,
        {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let body = serde_json::to_value(request)?;
            self.requests.lock().unwrap().push(body);
            Ok(json!(format!("job-{n}")))
        }
    }

    /// Answers according to the job kind in the envelope
    pub struct ScriptedTransport;

    impl RpcTransport for ScriptedTransport {
        async fn call<R>(&self, _method: &str, request: &R) -> Result<Value, RpcFailure>
        where
            R: Serialize + Sync,
        {
            let body = serde_json::to_value(request)?;
            match body["job"].as_str() {
                Some("refused") => Err(RpcFailure::from(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))),
                Some("garbled") => Ok(json!(42)),
                Some("rejected") => Err(RpcFailure::remote(Some(409), "duplicate job")),
                _ => Ok(json!("job-123")),
            }
        }
    }

    /// A job whose payload cannot be encoded
    pub struct PoisonJob;

    impl Serialize for PoisonJob {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cyclic payload"))
        }
    }

    impl contracts::Job for PoisonJob {
        fn kind(&self) -> &str {
            "poison"
        }
    }
}

#[cfg(test)]
mod resolution_tests {
    use std::collections::HashMap;

    use config_loader::{ConfigFormat, ConfigLoader, DispatchTable};
    use contracts::{DispatchRule, JobOptions, RawJob};
    use dispatcher::Dispatcher;
    use proptest::prelude::*;
    use serde_json::json;

    use crate::support::CountingTransport;

    const CONFIG: &str = r#"
[[pipelines]]
name = "default"

[[pipelines]]
name = "mail"

[[dispatch]]
pattern = "app-jobs-*"
pipeline = "default"

[[dispatch]]
pattern = "app-jobs-mail-*"
pipeline = "mail"
"#;

    fn table() -> DispatchTable {
        let config = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        DispatchTable::from_config(&config)
    }

    #[tokio::test]
    async fn test_default_pipeline_from_config() {
        let dispatcher = Dispatcher::new(CountingTransport::default(), table());
        let job = RawJob::new("app-jobs-mail-welcome", json!({"user": 7}));

        dispatcher.push(&job, None).await.unwrap();

        let requests = dispatcher.transport().requests();
        assert_eq!(requests[0]["pipeline"], "mail");
        assert_eq!(requests[0]["job"], "app-jobs-mail-welcome");
        assert_eq!(requests[0]["options"], json!({}));
    }

    #[tokio::test]
    async fn test_unmapped_kind_never_reaches_transport() {
        let dispatcher = Dispatcher::new(CountingTransport::default(), table());
        let job = RawJob::new("billing-invoice", json!({}));

        let err = dispatcher.push(&job, None).await.unwrap_err();

        assert!(err.is_resolution());
        assert_eq!(dispatcher.transport().calls(), 0);
    }

    #[test]
    fn test_fresh_options_are_identical() {
        let a = JobOptions::new();
        let b = JobOptions::new();
        assert_eq!(a, b);
        assert_eq!(a.pipeline(), None);
        assert_eq!(serde_json::to_value(&a).unwrap(), json!({}));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: an explicit pipeline always wins over dispatch rules.
        #[test]
        fn explicit_pipeline_always_wins(
            kind in "[a-z][a-z0-9-]{0,30}",
            explicit in "[a-z][a-z0-9_]{0,15}",
            fallback in "[a-z][a-z0-9_]{0,15}",
        ) {
            let table = DispatchTable::new(&[DispatchRule::new("*", fallback)]);
            let dispatcher = Dispatcher::new(CountingTransport::default(), table);
            let options = JobOptions::new().with_pipeline(explicit.clone());

            let pipeline = dispatcher.resolve_pipeline(&kind, &options).unwrap();
            prop_assert_eq!(pipeline.as_str(), explicit.as_str());
        }

        /// Property: without an explicit pipeline the mapped default is used.
        #[test]
        fn mapped_default_is_used(
            kind in "[a-z][a-z0-9-]{0,30}",
            mapped in "[a-z][a-z0-9_]{0,15}",
        ) {
            let lookup = HashMap::from([(kind.clone(), mapped.clone())]);
            let dispatcher = Dispatcher::new(CountingTransport::default(), lookup);

            let pipeline = dispatcher.resolve_pipeline(&kind, &JobOptions::new()).unwrap();
            prop_assert_eq!(pipeline.as_str(), mapped.as_str());
        }

        /// Property: no explicit pipeline and no mapping fails resolution.
        #[test]
        fn unmapped_kind_fails(kind in "[a-z][a-z0-9-]{0,30}") {
            let dispatcher = Dispatcher::new(CountingTransport::default(), HashMap::new());

            let err = dispatcher.resolve_pipeline(&kind, &JobOptions::new()).unwrap_err();
            prop_assert!(err.is_resolution());
        }
    }
}

#[cfg(test)]
mod funnel_tests {
    use std::collections::HashMap;

    use contracts::{RawJob, RpcFailureKind};
    use dispatcher::{DispatchError, Dispatcher};
    use serde_json::json;

    use crate::support::{PoisonJob, ScriptedTransport};

    fn dispatcher() -> Dispatcher<ScriptedTransport, HashMap<String, String>> {
        let lookup = ["refused", "garbled", "rejected", "ok", "poison"]
            .into_iter()
            .map(|kind| (kind.to_string(), "default".to_string()))
            .collect();
        Dispatcher::new(ScriptedTransport, lookup)
    }

    #[tokio::test]
    async fn test_round_trip_returns_id_verbatim() {
        let id = dispatcher()
            .push(&RawJob::new("ok", json!({})), None)
            .await
            .unwrap();
        assert_eq!(id.as_str(), "job-123");
    }

    #[tokio::test]
    async fn test_every_failure_is_a_dispatch_error() {
        let dispatcher = dispatcher();
        let cases = [
            ("refused", RpcFailureKind::Connection, "connection refused"),
            ("garbled", RpcFailureKind::Codec, "expected a string job id"),
            ("rejected", RpcFailureKind::Remote, "duplicate job"),
        ];

        for (kind, expected_kind, expected_message) in cases {
            let err = dispatcher
                .push(&RawJob::new(kind, json!({})), None)
                .await
                .unwrap_err();

            assert!(matches!(err, DispatchError::Push { .. }), "{kind}: {err:?}");
            assert_eq!(err.failure_kind(), Some(expected_kind), "{kind}");
            assert!(
                err.message().unwrap().contains(expected_message),
                "{kind}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_remote_code_is_preserved() {
        let err = dispatcher()
            .push(&RawJob::new("rejected", json!({})), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(409));
    }

    #[tokio::test]
    async fn test_payload_encoding_failure_is_a_dispatch_error() {
        let err = dispatcher().push(&PoisonJob, None).await.unwrap_err();

        assert_eq!(err.failure_kind(), Some(RpcFailureKind::Codec));
        assert!(err.message().unwrap().contains("cyclic payload"), "{err}");
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    use contracts::RawJob;
    use dispatcher::Dispatcher;
    use serde_json::json;

    use crate::support::CountingTransport;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_pushes_get_distinct_ids() {
        let lookup = HashMap::from([("app-jobs-ping".to_string(), "default".to_string())]);
        let dispatcher = Arc::new(Dispatcher::new(CountingTransport::default(), lookup));

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move {
                    let job = RawJob::new("app-jobs-ping", json!({ "seq": i }));
                    dispatcher.push(&job, None).await
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let id = handle.await.unwrap().unwrap();
            ids.insert(id.into_inner());
        }

        assert_eq!(ids.len(), 100);
        assert_eq!(dispatcher.transport().calls(), 100);
        assert_eq!(dispatcher.metrics().pushed_count, 100);
    }
}

#[cfg(test)]
mod e2e_tests {
    use config_loader::{ConfigFormat, ConfigLoader, DispatchTable};
    use std::collections::HashMap;
    use std::time::Duration;

    use contracts::{JobOptions, RawJob, RpcFailureKind};
    use dispatcher::{DispatchError, Dispatcher, NetworkTransport, NetworkTransportConfig};
    use serde_json::{json, Value};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Minimal job service: accepts `count` connections, answers each push
    /// with `srv-<n>` and forwards the request params to `seen`.
    async fn spawn_job_service(count: usize) -> (String, mpsc::Receiver<Value>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (seen_tx, seen_rx) = mpsc::channel(count);

        tokio::spawn(async move {
            for n in 1..=count {
                let (stream, _) = listener.accept().await.unwrap();
                let (read, mut write) = stream.into_split();
                let mut line = String::new();
                BufReader::new(read).read_line(&mut line).await.unwrap();

                let request: Value = serde_json::from_str(&line).unwrap();
                let response = if request["params"]["pipeline"] == "closed" {
                    json!({"id": request["id"], "error": {"code": 3, "message": "pipeline closed"}})
                } else {
                    json!({"id": request["id"], "result": format!("srv-{n}")})
                };
                seen_tx.send(request).await.unwrap();

                let mut out = serde_json::to_vec(&response).unwrap();
                out.push(b'\n');
                write.write_all(&out).await.unwrap();
            }
        });

        (addr, seen_rx)
    }

    #[tokio::test]
    async fn test_e2e_push_over_tcp() {
        let (addr, mut seen) = spawn_job_service(2).await;

        let config_text = format!(
            r#"
[rpc]
address = "{addr}"
service = "jobs"
timeout_ms = 2000

[[pipelines]]
name = "default"

[[pipelines]]
name = "closed"

[[dispatch]]
pattern = "*"
pipeline = "default"
"#
        );
        let config = ConfigLoader::load_from_str(&config_text, ConfigFormat::Toml).unwrap();
        let dispatcher = Dispatcher::new(
            NetworkTransport::from_rpc(&config.rpc),
            DispatchTable::from_config(&config),
        )
        .with_method(config.rpc.push_method());

        let job = RawJob::new("app-jobs-report", json!({"month": "2026-09"}));
        let id = dispatcher
            .push(&job, Some(JobOptions::new().with_max_attempts(3)))
            .await
            .unwrap();
        assert_eq!(id.as_str(), "srv-1");

        let request = seen.recv().await.unwrap();
        assert_eq!(request["method"], "jobs.Push");
        assert_eq!(request["params"]["pipeline"], "default");
        assert_eq!(request["params"]["payload"], r#"{"month":"2026-09"}"#);
        assert_eq!(request["params"]["options"], json!({"maxAttempts": 3}));

        let err = dispatcher
            .push(&job, Some(JobOptions::new().with_pipeline("closed")))
            .await
            .unwrap_err();
        assert_eq!(err.message(), Some("pipeline closed"));
        assert_eq!(err.code(), Some(3));
    }

    #[tokio::test]
    async fn test_e2e_silent_service_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let transport = NetworkTransport::new(
            NetworkTransportConfig::new(addr).with_timeout(Duration::from_millis(100)),
        );
        let lookup = HashMap::from([("app-jobs-report".to_string(), "default".to_string())]);
        let dispatcher = Dispatcher::new(transport, lookup);

        let err = dispatcher
            .push(&RawJob::new("app-jobs-report", json!({})), None)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Push { .. }), "{err:?}");
        assert_eq!(err.failure_kind(), Some(RpcFailureKind::Timeout));
        assert_eq!(dispatcher.metrics().failure_count, 1);
    }
}
