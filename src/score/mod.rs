//! Weighted overall score, file comparison and verdict text.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::analysis::{Analyzer, BugFixAnalysis, ComplexityScore, FileAnalysis};
use crate::config::MetricsConfig;
use crate::core::{Error, Result, SubmissionInput};
use crate::metrics::{
    MetricKind, MetricResult, MetricsEngine, STRENGTH_THRESHOLD, WEAKNESS_THRESHOLD,
};
use crate::patterns::PatternTag;

/// Final result of comparing a candidate fix with a reference fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Weighted score in `[0, 100]`.
    pub overall_score: f64,
    pub grade: String,
    pub metrics: BTreeMap<MetricKind, MetricResult>,
    pub comparison: Comparison,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl EvaluationResult {
    /// Fail when the overall score is below `fail_under`.
    pub fn check_threshold(&self, fail_under: Option<f64>) -> Result<()> {
        match fail_under {
            Some(min) if self.overall_score < min => Err(Error::threshold_violation(
                format!(
                    "overall score {:.1} is below the minimum of {:.1}",
                    self.overall_score, min
                ),
                self.overall_score,
            )),
            _ => Ok(()),
        }
    }
}

/// Which submissions touched a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
    Common,
    ReferenceOnly,
    CandidateOnly,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::ReferenceOnly => "reference-only",
            Self::CandidateOnly => "candidate-only",
        }
    }
}

/// One side's changes to a file, as shown in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChangeSummary {
    pub patterns: BTreeSet<PatternTag>,
    pub change_count: usize,
    pub complexity: ComplexityScore,
}

impl From<&FileAnalysis> for FileChangeSummary {
    fn from(file: &FileAnalysis) -> Self {
        Self {
            patterns: file.patterns.clone(),
            change_count: file.changes.len(),
            complexity: file.complexity.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileComparison {
    pub category: FileCategory,
    pub in_reference: bool,
    pub in_candidate: bool,
    pub reference: Option<FileChangeSummary>,
    pub candidate: Option<FileChangeSummary>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub common_files: usize,
    pub reference_only: usize,
    pub candidate_only: usize,
    pub total_files: usize,
}

/// Per-path categorization of the union of both submissions' files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub files: BTreeMap<String, FileComparison>,
    pub summary: ComparisonSummary,
}

impl Comparison {
    pub fn new(reference: &BugFixAnalysis, candidate: &BugFixAnalysis) -> Self {
        let mut comparison = Self::default();
        let paths: BTreeSet<&str> = reference.paths().union(&candidate.paths()).copied().collect();

        for path in paths {
            let r = reference.file(path);
            let c = candidate.file(path);
            let category = match (r.is_some(), c.is_some()) {
                (true, true) => FileCategory::Common,
                (true, false) => FileCategory::ReferenceOnly,
                _ => FileCategory::CandidateOnly,
            };
            match category {
                FileCategory::Common => comparison.summary.common_files += 1,
                FileCategory::ReferenceOnly => comparison.summary.reference_only += 1,
                FileCategory::CandidateOnly => comparison.summary.candidate_only += 1,
            }
            comparison.files.insert(
                path.to_string(),
                FileComparison {
                    category,
                    in_reference: r.is_some(),
                    in_candidate: c.is_some(),
                    reference: r.map(FileChangeSummary::from),
                    candidate: c.map(FileChangeSummary::from),
                },
            );
        }

        comparison.summary.total_files = comparison.files.len();
        comparison
    }
}

/// Runs the whole pipeline: analysis of both submissions, metrics and
/// aggregation.
pub struct Evaluator {
    analyzer: Analyzer,
    engine: MetricsEngine,
}

impl Evaluator {
    /// Create an evaluator with the built-in detectors.
    pub fn new(config: &MetricsConfig) -> Result<Self> {
        Ok(Self {
            analyzer: Analyzer::new(),
            engine: MetricsEngine::new(config)?,
        })
    }

    pub fn with_analyzer(analyzer: Analyzer, config: &MetricsConfig) -> Result<Self> {
        Ok(Self {
            analyzer,
            engine: MetricsEngine::new(config)?,
        })
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Analyze both submissions on independent workers and score them.
    pub fn evaluate(
        &self,
        reference: &SubmissionInput,
        candidate: &SubmissionInput,
    ) -> Result<EvaluationResult> {
        let (reference, candidate) = rayon::join(
            || self.analyzer.analyze(reference),
            || self.analyzer.analyze(candidate),
        );
        Ok(self.score(&reference?, &candidate?))
    }

    /// Score two finished analyses.
    pub fn score(
        &self,
        reference: &BugFixAnalysis,
        candidate: &BugFixAnalysis,
    ) -> EvaluationResult {
        let start = Instant::now();
        let metrics = self.engine.compute(reference, candidate);
        let overall_score = overall_score(&metrics);
        let result = EvaluationResult {
            overall_score,
            grade: score_to_grade(overall_score),
            comparison: Comparison::new(reference, candidate),
            strengths: strengths(&metrics),
            weaknesses: weaknesses(&metrics),
            metrics,
        };

        tracing::info!(
            "Evaluation completed in {:?}: score {:.1} ({})",
            start.elapsed(),
            result.overall_score,
            result.grade
        );
        result
    }
}

/// `100 * sum(score * weight) / sum(weight)`, or 0 when the weights sum to 0.
pub fn overall_score(metrics: &BTreeMap<MetricKind, MetricResult>) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for metric in metrics.values() {
        weighted_sum += metric.score * metric.weight;
        total_weight += metric.weight;
    }

    if total_weight > 0.0 {
        (weighted_sum / total_weight * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn strengths(metrics: &BTreeMap<MetricKind, MetricResult>) -> Vec<String> {
    metrics
        .iter()
        .filter(|(_, m)| m.score >= STRENGTH_THRESHOLD)
        .map(|(kind, _)| kind.strength().to_string())
        .collect()
}

pub fn weaknesses(metrics: &BTreeMap<MetricKind, MetricResult>) -> Vec<String> {
    metrics
        .iter()
        .filter(|(_, m)| m.score < WEAKNESS_THRESHOLD)
        .map(|(kind, _)| kind.weakness().to_string())
        .collect()
}

pub fn score_to_grade(score: f64) -> String {
    if score >= 90.0 {
        "A".to_string()
    } else if score >= 80.0 {
        "B".to_string()
    } else if score >= 70.0 {
        "C".to_string()
    } else if score >= 60.0 {
        "D".to_string()
    } else {
        "F".to_string()
    }
}
