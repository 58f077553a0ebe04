//! Push counters for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single dispatcher
#[derive(Debug, Default)]
pub struct PushMetrics {
    /// Jobs accepted by the service
    pushed_count: AtomicU64,
    /// Calls that failed at or after the transport
    failure_count: AtomicU64,
    /// Pushes rejected before the call for lack of a pipeline
    unresolved_count: AtomicU64,
}

impl PushMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushed_count(&self) -> u64 {
        self.pushed_count.load(Ordering::Relaxed)
    }

    pub fn inc_pushed_count(&self) {
        self.pushed_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unresolved_count(&self) -> u64 {
        self.unresolved_count.load(Ordering::Relaxed)
    }

    pub fn inc_unresolved_count(&self) {
        self.unresolved_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pushed_count: self.pushed_count(),
            failure_count: self.failure_count(),
            unresolved_count: self.unresolved_count(),
        }
    }
}

/// Snapshot of push metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub pushed_count: u64,
    pub failure_count: u64,
    pub unresolved_count: u64,
}
