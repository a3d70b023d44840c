//! Complexity ratio between the two fixes.

use serde::{Deserialize, Serialize};

use crate::analysis::{BugFixAnalysis, ComplexityScore};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityDetails {
    pub reference: ComplexityScore,
    pub candidate: ComplexityScore,
    pub factors: Vec<String>,
}

/// Score the candidate/reference complexity ratio.
///
/// Below 0.7 scores a flat 0.7, above 1.3 loses a point per unit over 1,
/// and in between scores `1 - |1 - ratio|`.
pub(super) fn score(
    reference: &BugFixAnalysis,
    candidate: &BugFixAnalysis,
) -> (f64, ComplexityDetails) {
    let mut details = ComplexityDetails {
        reference: reference.complexity.clone(),
        candidate: candidate.complexity.clone(),
        factors: Vec::new(),
    };
    let r = reference.complexity.score;
    let c = candidate.complexity.score;

    if r == 0 {
        if c == 0 {
            return (1.0, details);
        }
        details
            .factors
            .push("Candidate solution is more complex than necessary".to_string());
        return (0.0, details);
    }

    let ratio = f64::from(c) / f64::from(r);
    let score = if ratio < 0.7 {
        details
            .factors
            .push("Candidate solution may be too simple".to_string());
        0.7
    } else if ratio > 1.3 {
        details
            .factors
            .push("Candidate solution is more complex than reference".to_string());
        (1.0 - (ratio - 1.0)).max(0.0)
    } else {
        1.0 - (1.0 - ratio).abs()
    };
    (score, details)
}
