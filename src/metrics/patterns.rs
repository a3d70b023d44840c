//! Pattern-set metrics: completeness and pattern match.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::jaccard;
use crate::analysis::BugFixAnalysis;
use crate::patterns::PatternTag;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessDetails {
    /// Reference patterns the candidate also shows.
    pub addressed: BTreeSet<PatternTag>,
    /// Reference patterns the candidate lacks.
    pub missed: BTreeSet<PatternTag>,
    /// Number of reference patterns.
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternMatchDetails {
    pub matched: BTreeSet<PatternTag>,
    pub reference_only: BTreeSet<PatternTag>,
    pub candidate_only: BTreeSet<PatternTag>,
    pub similarity: f64,
}

/// Share of reference patterns present in the candidate; 1.0 when the
/// reference has none.
pub(super) fn completeness(
    reference: &BugFixAnalysis,
    candidate: &BugFixAnalysis,
) -> (f64, CompletenessDetails) {
    let r = &reference.patterns;
    let c = &candidate.patterns;
    let details = CompletenessDetails {
        addressed: r.intersection(c).copied().collect(),
        missed: r.difference(c).copied().collect(),
        total: r.len(),
    };
    let score = if r.is_empty() {
        1.0
    } else {
        details.addressed.len() as f64 / r.len() as f64
    };
    (score, details)
}

/// Jaccard similarity of the pattern sets: 1.0 when both are empty and 0.0
/// when exactly one is.
pub(super) fn pattern_match(
    reference: &BugFixAnalysis,
    candidate: &BugFixAnalysis,
) -> (f64, PatternMatchDetails) {
    let r = &reference.patterns;
    let c = &candidate.patterns;
    let similarity = jaccard(r, c, 1.0);
    let details = PatternMatchDetails {
        matched: r.intersection(c).copied().collect(),
        reference_only: r.difference(c).copied().collect(),
        candidate_only: c.difference(r).copied().collect(),
        similarity,
    };
    (similarity, details)
}
