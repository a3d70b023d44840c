//! Style checks over the lines a candidate fix wrote.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::BugFixAnalysis;
use crate::core::LanguageFamily;

const TODO_PENALTY: f64 = 0.05;
const LONG_LINE_PENALTY: f64 = 0.02;
const WILDCARD_IMPORT_PENALTY: f64 = 0.10;
const VAR_PENALTY: f64 = 0.05;

/// Lines longer than this many characters are flagged.
const MAX_LINE_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanlinessDetails {
    pub style_issues: Vec<String>,
    pub good_practices: Vec<String>,
}

fn var_keyword() -> &'static Regex {
    static VAR: OnceLock<Regex> = OnceLock::new();
    VAR.get_or_init(|| Regex::new(r"\bvar\s").expect("valid regex"))
}

/// Start at 1.0 and deduct per offending added or modified-after line.
/// Only the candidate is inspected.
pub(super) fn score(candidate: &BugFixAnalysis) -> (f64, CleanlinessDetails) {
    let mut details = CleanlinessDetails::default();
    let mut score = 1.0;

    for file in &candidate.changed_files {
        let path = &file.path;
        for line in file.after_lines() {
            if line.contains("TODO") || line.contains("FIXME") {
                details
                    .style_issues
                    .push(format!("TODO/FIXME comment in {path}"));
                score -= TODO_PENALTY;
            }

            if line.chars().count() > MAX_LINE_LENGTH {
                details.style_issues.push(format!("Long line in {path}"));
                score -= LONG_LINE_PENALTY;
            }

            match file.language {
                LanguageFamily::Python if line.contains("import *") => {
                    details
                        .style_issues
                        .push(format!("Wildcard import in {path}"));
                    score -= WILDCARD_IMPORT_PENALTY;
                }
                lang if lang.is_js_like() && var_keyword().is_match(line) => {
                    details.style_issues.push(format!("'var' usage in {path}"));
                    score -= VAR_PENALTY;
                }
                _ => {}
            }
        }
    }

    if details.style_issues.is_empty() {
        details
            .good_practices
            .push("No style issues detected".to_string());
    }

    (f64::clamp(score, 0.0, 1.0), details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::*;

    #[test]
    fn test_clean_candidate() {
        let candidate = analysis(vec![file("a.py", vec![added(1, "x = 1")], &[])]);
        let (score, details) = score(&candidate);
        assert_eq!(score, 1.0);
        assert_eq!(details.good_practices, vec!["No style issues detected"]);
    }

    #[test]
    fn test_deductions_are_per_line() {
        let long = format!("x = {}", "1".repeat(120));
        let candidate = analysis(vec![file(
            "a.py",
            vec![
                added(1, "# TODO: tidy"),
                added(2, "# FIXME and TODO"),
                modified(3, "x = 1", &long),
                added(4, "from os import *"),
            ],
            &[],
        )]);
        let (score, details) = score(&candidate);
        assert!((score - (1.0 - 0.05 - 0.05 - 0.02 - 0.10)).abs() < 1e-9);
        assert_eq!(details.style_issues.len(), 4);
        assert!(details.good_practices.is_empty());
    }

    #[test]
    fn test_removed_lines_are_ignored() {
        let candidate = analysis(vec![file(
            "a.py",
            vec![crate::core::Change::Removed {
                before_line: 1,
                before: "# TODO".to_string(),
            }],
            &[],
        )]);
        assert_eq!(score(&candidate).0, 1.0);
    }

    #[test]
    fn test_var_only_flagged_for_js() {
        let js = analysis(vec![file("a.js", vec![added(1, "var x = 1;")], &[])]);
        let (score_js, details) = score(&js);
        assert!((score_js - 0.95).abs() < 1e-9);
        assert_eq!(details.style_issues, vec!["'var' usage in a.js"]);

        let ts = analysis(vec![file("a.ts", vec![added(1, "const variance = 1;")], &[])]);
        assert_eq!(score(&ts).0, 1.0);

        let py = analysis(vec![file("a.py", vec![added(1, "var x = 1")], &[])]);
        assert_eq!(score(&py).0, 1.0);
    }

    #[test]
    fn test_score_is_clamped() {
        let changes = (1..=30).map(|n| added(n, "# TODO")).collect();
        let candidate = analysis(vec![file("a.py", changes, &[])]);
        assert_eq!(score(&candidate).0, 0.0);
    }
}
