//! Metrics comparing a candidate fix with a reference fix.
//!
//! Each metric is a pure function of two [`BugFixAnalysis`] values and
//! returns a score in `[0, 1]` plus a structured explanation. Degenerate
//! inputs (an empty reference, zero complexity, no common files) fall back
//! to fixed scores instead of failing.

mod cleanliness;
mod complexity;
mod correctness;
mod efficiency;
mod patterns;

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use serde::{Deserialize, Serialize};

pub use cleanliness::CleanlinessDetails;
pub use complexity::ComplexityDetails;
pub use correctness::CorrectnessDetails;
pub use efficiency::{EfficiencyDetails, LineCountComparison};
pub use patterns::{CompletenessDetails, PatternMatchDetails};

use crate::analysis::BugFixAnalysis;
use crate::config::MetricsConfig;
use crate::core::Result;

/// Scores at or above this are reported as strengths.
pub const STRENGTH_THRESHOLD: f64 = 0.8;
/// Scores below this are reported as weaknesses.
pub const WEAKNESS_THRESHOLD: f64 = 0.5;

/// The six evaluation metrics, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Correctness,
    Completeness,
    PatternMatch,
    Cleanliness,
    Efficiency,
    Complexity,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        Self::Correctness,
        Self::Completeness,
        Self::PatternMatch,
        Self::Cleanliness,
        Self::Efficiency,
        Self::Complexity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correctness => "correctness",
            Self::Completeness => "completeness",
            Self::PatternMatch => "pattern_match",
            Self::Cleanliness => "cleanliness",
            Self::Efficiency => "efficiency",
            Self::Complexity => "complexity",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Correctness => "Whether the fix touches the same lines as the reference",
            Self::Completeness => "Share of reference fix patterns the candidate also shows",
            Self::PatternMatch => "Similarity of the two fix pattern sets",
            Self::Cleanliness => "Style issues in the lines the candidate wrote",
            Self::Efficiency => "Size of the candidate change relative to the reference",
            Self::Complexity => "Complexity of the candidate change relative to the reference",
        }
    }

    /// Sentence reported when the metric scores high.
    pub fn strength(&self) -> &'static str {
        match self {
            Self::Correctness => "Solution correctly fixes the bug",
            Self::Completeness => "Solution addresses all aspects of the bug",
            Self::PatternMatch => "Solution uses similar fix patterns as reference",
            Self::Cleanliness => "Solution follows good coding practices",
            Self::Efficiency => "Solution is efficient in its approach",
            Self::Complexity => "Solution has appropriate complexity",
        }
    }

    /// Sentence reported when the metric scores low.
    pub fn weakness(&self) -> &'static str {
        match self {
            Self::Correctness => "Solution does not correctly fix the bug",
            Self::Completeness => "Solution misses aspects of the bug",
            Self::PatternMatch => "Solution uses different fix patterns than reference",
            Self::Cleanliness => "Solution has code quality issues",
            Self::Efficiency => "Solution is not efficient in its approach",
            Self::Complexity => "Solution has inappropriate complexity",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Explanation attached to a metric score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricDetails {
    Correctness(CorrectnessDetails),
    Completeness(CompletenessDetails),
    PatternMatch(PatternMatchDetails),
    Cleanliness(CleanlinessDetails),
    Efficiency(EfficiencyDetails),
    Complexity(ComplexityDetails),
}

/// Score, weight and explanation for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub score: f64,
    pub weight: f64,
    pub details: MetricDetails,
}

/// Compute one metric.
pub fn compute_metric(
    kind: MetricKind,
    reference: &BugFixAnalysis,
    candidate: &BugFixAnalysis,
) -> (f64, MetricDetails) {
    let (score, details) = match kind {
        MetricKind::Correctness => {
            let (s, d) = correctness::score(reference, candidate);
            (s, MetricDetails::Correctness(d))
        }
        MetricKind::Completeness => {
            let (s, d) = patterns::completeness(reference, candidate);
            (s, MetricDetails::Completeness(d))
        }
        MetricKind::PatternMatch => {
            let (s, d) = patterns::pattern_match(reference, candidate);
            (s, MetricDetails::PatternMatch(d))
        }
        MetricKind::Cleanliness => {
            let (s, d) = cleanliness::score(candidate);
            (s, MetricDetails::Cleanliness(d))
        }
        MetricKind::Efficiency => {
            let (s, d) = efficiency::score(reference, candidate);
            (s, MetricDetails::Efficiency(d))
        }
        MetricKind::Complexity => {
            let (s, d) = complexity::score(reference, candidate);
            (s, MetricDetails::Complexity(d))
        }
    };
    (score.clamp(0.0, 1.0), details)
}

/// Computes every enabled metric with its configured weight.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    /// Build an engine, rejecting weights outside [0, 1].
    pub fn new(config: &MetricsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Compute all enabled metrics. Disabled metrics are absent from the map.
    pub fn compute(
        &self,
        reference: &BugFixAnalysis,
        candidate: &BugFixAnalysis,
    ) -> BTreeMap<MetricKind, MetricResult> {
        let start = Instant::now();
        let metrics: BTreeMap<_, _> = self
            .config
            .enabled()
            .map(|(kind, metric)| {
                let (score, details) = compute_metric(kind, reference, candidate);
                tracing::debug!("{} = {:.3} (weight {})", kind, score, metric.weight);
                let result = MetricResult {
                    score,
                    weight: metric.weight,
                    details,
                };
                (kind, result)
            })
            .collect();

        tracing::info!(
            "Computed {} metrics in {:?}",
            metrics.len(),
            start.elapsed()
        );
        metrics
    }
}

/// Jaccard similarity of two sets, with a caller-chosen value for two empty sets.
pub(crate) fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>, both_empty: f64) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return both_empty;
    }
    a.intersection(b).count() as f64 / union as f64
}
