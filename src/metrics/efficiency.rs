//! Change-size comparison on the files both fixes touched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::BugFixAnalysis;
use crate::core::ChangeCounts;

/// Score when no common file has changes on both sides.
const NEUTRAL: f64 = 0.5;
/// Ratio used when the candidate changed under half as many lines.
const TOO_SMALL: f64 = 0.7;
/// Ratio used when the candidate changed over twice as many lines.
const TOO_LARGE: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyDetails {
    pub line_count_comparison: BTreeMap<String, LineCountComparison>,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCountComparison {
    pub reference: ChangeCounts,
    pub candidate: ChangeCounts,
}

pub(super) fn score(
    reference: &BugFixAnalysis,
    candidate: &BugFixAnalysis,
) -> (f64, EfficiencyDetails) {
    let mut details = EfficiencyDetails::default();
    let common: Vec<_> = reference
        .changed_files
        .iter()
        .filter_map(|r| candidate.file(&r.path).map(|c| (r, c)))
        .collect();

    if common.is_empty() {
        details
            .factors
            .push("No common files to compare efficiency".to_string());
        return (NEUTRAL, details);
    }

    let mut total_ratio = 0.0;
    let mut compared = 0usize;
    for (r, c) in common {
        let counts = LineCountComparison {
            reference: r.counts(),
            candidate: c.counts(),
        };
        details
            .line_count_comparison
            .insert(r.path.clone(), counts);

        let (rt, ct) = (counts.reference.total, counts.candidate.total);
        if rt == 0 || ct == 0 {
            continue;
        }

        let ratio = if (ct as f64) < 0.5 * rt as f64 {
            details.factors.push(format!(
                "Candidate solution for {} is much smaller than reference",
                r.path
            ));
            TOO_SMALL
        } else if ct as f64 > 2.0 * rt as f64 {
            details.factors.push(format!(
                "Candidate solution for {} is much larger than reference",
                r.path
            ));
            TOO_LARGE
        } else {
            rt.min(ct) as f64 / rt.max(ct) as f64
        };
        total_ratio += ratio;
        compared += 1;
    }

    if compared == 0 {
        details
            .factors
            .push("No valid files to compare efficiency".to_string());
        return (NEUTRAL, details);
    }
    (total_ratio / compared as f64, details)
}
