//! PipelineLookup trait - default pipeline assignment

use std::collections::HashMap;
use std::sync::Arc;

/// Supplies the configured default pipeline for a job kind.
///
/// Implementations never fail: a kind without a mapping yields `None`.
/// Lookups may run concurrently from many pushes.
pub trait PipelineLookup: Send + Sync {
    fn default_pipeline(&self, job_kind: &str) -> Option<&str>;
}

impl PipelineLookup for HashMap<String, String> {
    fn default_pipeline(&self, job_kind: &str) -> Option<&str> {
        self.get(job_kind).map(String::as_str)
    }
}

impl<L: PipelineLookup + ?Sized> PipelineLookup for Arc<L> {
    fn default_pipeline(&self, job_kind: &str) -> Option<&str> {
        (**self).default_pipeline(job_kind)
    }
}

impl<L: PipelineLookup + ?Sized> PipelineLookup for &L {
    fn default_pipeline(&self, job_kind: &str) -> Option<&str> {
        (**self).default_pipeline(job_kind)
    }
}
