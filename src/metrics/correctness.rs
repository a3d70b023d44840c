//! Line-overlap correctness.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::jaccard;
use crate::analysis::{BugFixAnalysis, FileAnalysis};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectnessDetails {
    /// Similarity per path. Paths only one side touched score 0.
    pub file_scores: BTreeMap<String, f64>,
    pub factors: Vec<String>,
}

/// Mean over reference files of the before-line Jaccard similarity with the
/// candidate's changes to the same file.
pub(super) fn score(
    reference: &BugFixAnalysis,
    candidate: &BugFixAnalysis,
) -> (f64, CorrectnessDetails) {
    let mut details = CorrectnessDetails::default();
    let reference_paths = reference.paths();
    let candidate_paths = candidate.paths();

    let missed: Vec<_> = reference_paths.difference(&candidate_paths).collect();
    if !missed.is_empty() {
        details
            .factors
            .push(format!("Candidate missed changes to {} files", missed.len()));
        for path in missed {
            details.file_scores.insert(path.to_string(), 0.0);
        }
    }

    let extra: Vec<_> = candidate_paths.difference(&reference_paths).collect();
    if !extra.is_empty() {
        details.factors.push(format!(
            "Candidate made unnecessary changes to {} files",
            extra.len()
        ));
        for path in extra {
            details.file_scores.insert(path.to_string(), 0.0);
        }
    }

    let mut common = 0;
    for (r, c) in reference
        .changed_files
        .iter()
        .filter_map(|r| candidate.file(&r.path).map(|c| (r, c)))
    {
        common += 1;
        details
            .file_scores
            .insert(r.path.clone(), file_similarity(r, c));
    }

    if reference_paths.is_empty() {
        details
            .factors
            .push("Reference solution made no changes".to_string());
        return (0.0, details);
    }
    if common == 0 {
        return (0.0, details);
    }

    let total: f64 = reference_paths
        .iter()
        .map(|p| details.file_scores.get(*p).copied().unwrap_or(0.0))
        .sum();
    (total / reference_paths.len() as f64, details)
}

/// Jaccard similarity of the before-side lines two changes to one file touch.
pub fn file_similarity(reference: &FileAnalysis, candidate: &FileAnalysis) -> f64 {
    if reference.changes.is_empty() || candidate.changes.is_empty() {
        return 0.0;
    }
    let r: BTreeSet<u32> = reference.touched_before_lines();
    let c: BTreeSet<u32> = candidate.touched_before_lines();
    jaccard(&r, &c, 0.0)
}
