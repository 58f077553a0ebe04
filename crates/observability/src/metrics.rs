//! Push metrics
//!
//! Exported through the `metrics` facade and aggregated in memory for
//! end-of-run summaries.

use std::collections::HashMap;
use std::fmt;

use metrics::{counter, histogram};

/// Record the outcome of one push call.
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_push;
///
/// record_push("default", true, 1.8);
/// ```
pub fn record_push(pipeline: &str, success: bool, latency_ms: f64) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "jobs_push_total",
        "pipeline" => pipeline.to_string(),
        "status" => status
    )
    .increment(1);

    histogram!("jobs_push_latency_ms", "pipeline" => pipeline.to_string()).record(latency_ms);
}

/// Record a push rejected because no pipeline could be resolved.
///
/// Unlabelled: job kinds come from callers and are unbounded. The kind is
/// logged by the dispatcher instead.
pub fn record_pipeline_unresolved() {
    counter!("jobs_pipeline_unresolved_total").increment(1);
}

/// In-memory aggregation of push outcomes
#[derive(Debug, Clone, Default)]
pub struct PushStatsAggregator {
    pub total: u64,
    pub failed: u64,
    pub latency: RunningStats,
    pub per_pipeline: HashMap<String, u64>,
}

impl PushStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one push; `pipeline` is `None` when resolution failed
    pub fn update(&mut self, pipeline: Option<&str>, success: bool, latency_ms: f64) {
        self.total += 1;
        if !success {
            self.failed += 1;
        }
        if let Some(pipeline) = pipeline {
            *self.per_pipeline.entry(pipeline.to_string()).or_insert(0) += 1;
            self.latency.push(latency_ms);
        }
    }

    pub fn summary(&self) -> PushSummary {
        PushSummary {
            total: self.total,
            failed: self.failed,
            failure_rate: if self.total > 0 {
                self.failed as f64 / self.total as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency),
            per_pipeline: self.per_pipeline.clone(),
        }
    }
}

/// Summary of a batch of pushes
#[derive(Debug, Clone, Default)]
pub struct PushSummary {
    pub total: u64,
    pub failed: u64,
    pub failure_rate: f64,
    pub latency_ms: StatsSummary,
    pub per_pipeline: HashMap<String, u64>,
}

impl fmt::Display for PushSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Push Summary ===")?;
        writeln!(f, "Total pushes: {}", self.total)?;
        writeln!(f, "Failed: {} ({:.2}%)", self.failed, self.failure_rate)?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)?;

        if !self.per_pipeline.is_empty() {
            writeln!(f, "Per pipeline:")?;
            let mut pipelines: Vec<_> = self.per_pipeline.iter().collect();
            pipelines.sort();
            for (pipeline, count) in pipelines {
                writeln!(f, "  {pipeline}: {count}")?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
