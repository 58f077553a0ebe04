//! Default pipeline assignment from dispatch rules

use contracts::{DispatchRule, JobsConfig, PipelineLookup};
use tracing::trace;

/// Compiled dispatch rules.
///
/// Resolution order for a kind:
/// 1. a wildcard-free pattern equal to the kind
/// 2. the matching pattern with the most literal characters
/// 3. declaration order among equally specific patterns
///
/// Comparison is ASCII case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    rules: Vec<CompiledRule>,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: String,
    pipeline: String,
    exact: bool,
    literal_len: usize,
}

impl CompiledRule {
    fn new(rule: &DispatchRule) -> Self {
        let pattern = rule.pattern.to_ascii_lowercase();
        let literal_len = pattern.chars().filter(|c| *c != '*').count();
        Self {
            exact: literal_len == pattern.chars().count(),
            literal_len,
            pattern,
            pipeline: rule.pipeline.clone(),
        }
    }

    /// Ranking key, higher is more specific
    fn specificity(&self) -> (bool, usize) {
        (self.exact, self.literal_len)
    }
}

impl DispatchTable {
    pub fn new(rules: &[DispatchRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .filter(|r| !r.pattern.is_empty() && !r.pipeline.is_empty())
                .map(CompiledRule::new)
                .collect(),
        }
    }

    pub fn from_config(config: &JobsConfig) -> Self {
        Self::new(&config.dispatch)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl PipelineLookup for DispatchTable {
    fn default_pipeline(&self, job_kind: &str) -> Option<&str> {
        let kind = job_kind.to_ascii_lowercase();
        let mut best: Option<&CompiledRule> = None;

        for rule in &self.rules {
            if !wildcard_match(&rule.pattern, &kind) {
                continue;
            }
            // strictly greater keeps the earliest rule on ties
            if best.is_none_or(|b| rule.specificity() > b.specificity()) {
                best = Some(rule);
            }
        }

        let pipeline = best.map(|r| r.pipeline.as_str());
        trace!(job = job_kind, pipeline = ?pipeline, "dispatch table lookup");
        pipeline
    }
}

/// Glob match where `*` matches any (possibly empty) run of characters.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            p += 1;
            resume = t;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some(s) = star {
            p = s + 1;
            resume += 1;
            t = resume;
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}
