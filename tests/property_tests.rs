use std::collections::BTreeMap;

use proptest::prelude::*;

use fixeval::analysis::{Analyzer, BugFixAnalysis};
use fixeval::core::{Change, ChangeCounts, FileInput, SubmissionInput};
use fixeval::diff::extract_changes;
use fixeval::metrics::{compute_metric, MetricKind, MetricResult};
use fixeval::patterns::{shape_tag, PatternTag};
use fixeval::score::overall_score;

fn lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just("a = 1".to_string()),
            Just("b = a + 1".to_string()),
            Just("print(b)".to_string()),
            Just("".to_string()),
            Just("return b".to_string()),
            Just("-flag".to_string()),
        ],
        0..16,
    )
}

fn text(lines: &[String]) -> String {
    lines.iter().map(|l| format!("{l}\n")).collect()
}

fn analyze(before: &str, after: &str) -> BugFixAnalysis {
    let input = SubmissionInput::new().with_file("src/app.py", FileInput::from_text(before, after));
    Analyzer::new().analyze(&input).expect("valid input")
}

// ---------------------------------------------------------------------------
// Diff extraction
// ---------------------------------------------------------------------------

proptest! {
    /// Identical snapshots never produce changes, patterns or complexity.
    #[test]
    fn identical_snapshots_are_unchanged(body in lines()) {
        let content = text(&body);
        prop_assert!(extract_changes(&content, &content).is_empty());

        let analysis = analyze(&content, &content);
        prop_assert!(analysis.changed_files.is_empty());
        prop_assert!(analysis.patterns.is_empty());
        prop_assert_eq!(analysis.complexity.score, 0);
    }

    /// Inserting lines into a file yields only additions.
    #[test]
    fn pure_insertion_is_missing_code(
        body in lines(),
        inserts in prop::collection::vec((0usize..16, "[a-z]{1,8}"), 1..6),
    ) {
        let mut after = body.clone();
        for (at, line) in &inserts {
            let at = (*at).min(after.len());
            after.insert(at, format!("new_{line}()"));
        }

        let changes = extract_changes(&text(&body), &text(&after));
        prop_assert_eq!(changes.len(), inserts.len());
        prop_assert!(changes.iter().all(|c| matches!(c, Change::Added { .. })), "expected only Added changes");
        prop_assert_eq!(
            shape_tag(&ChangeCounts::from_changes(&changes)),
            Some(PatternTag::MissingCode)
        );
    }

    /// Every change points at the line it reports, on each side it touches.
    #[test]
    fn line_numbers_match_text(before in lines(), after in lines()) {
        let old = text(&before);
        let new = text(&after);
        for change in extract_changes(&old, &new) {
            if let (Some(line), Some(content)) = (change.before_line(), change.before_text()) {
                prop_assert_eq!(before[line as usize - 1].as_str(), content);
            }
            if let (Some(line), Some(content)) = (change.after_line(), change.after_text()) {
                prop_assert_eq!(after[line as usize - 1].as_str(), content);
            }
        }
    }

    /// Removed and added lines account for the length difference.
    #[test]
    fn change_counts_balance(before in lines(), after in lines()) {
        let counts = ChangeCounts::from_changes(&extract_changes(&text(&before), &text(&after)));
        prop_assert_eq!(
            before.len() as i64 - after.len() as i64,
            counts.removed as i64 - counts.added as i64
        );
        prop_assert_eq!(counts.total, counts.added + counts.removed + counts.modified);
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

proptest! {
    /// A fix compared with itself matches every pattern and every unit of
    /// complexity.
    #[test]
    fn self_comparison_is_perfect(before in lines(), after in lines()) {
        let fix = analyze(&text(&before), &text(&after));
        for kind in [MetricKind::Completeness, MetricKind::PatternMatch, MetricKind::Complexity] {
            let (score, _) = compute_metric(kind, &fix, &fix);
            prop_assert_eq!(score, 1.0, "{} scored {}", kind, score);
        }
    }

    /// Every metric stays within [0, 1] for arbitrary pairs of fixes.
    #[test]
    fn metric_scores_are_bounded(
        ref_before in lines(),
        ref_after in lines(),
        cand_after in lines(),
    ) {
        let reference = analyze(&text(&ref_before), &text(&ref_after));
        let candidate = analyze(&text(&ref_before), &text(&cand_after));
        for kind in MetricKind::ALL {
            let (score, _) = compute_metric(kind, &reference, &candidate);
            prop_assert!((0.0..=1.0).contains(&score), "{} scored {}", kind, score);
        }
    }

    /// The overall score is a 0..=100 weighted mean.
    #[test]
    fn overall_score_is_bounded(
        entries in prop::collection::vec((0.0f64..=1.0, 0.0f64..5.0), 0..6),
    ) {
        let empty = BugFixAnalysis::from_files(Vec::new());
        let mut metrics = BTreeMap::new();
        for (kind, (score, weight)) in MetricKind::ALL.into_iter().zip(entries) {
            let (_, details) = compute_metric(kind, &empty, &empty);
            metrics.insert(kind, MetricResult { score, weight, details });
        }

        let overall = overall_score(&metrics);
        prop_assert!((0.0..=100.0).contains(&overall));
        if metrics.values().all(|m| m.weight == 0.0) {
            prop_assert_eq!(overall, 0.0);
        }
    }
}
