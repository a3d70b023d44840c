//! Additive complexity estimate for one file's change set.
//!
//! Rules, all cumulative:
//!
//! | Rule | Points | Factor |
//! | --- | --- | --- |
//! | total changes <= 3 | 1 | `few_changes` |
//! | total changes 4-10 | 2 | `moderate_changes` |
//! | total changes > 10 | 3 | `many_changes` |
//! | path has no `.` | 2 | `multi_file` |
//! | each complex pattern tag | 1 | `complex_pattern_<tag>` |
//! | java, cpp or rust | 1 | `complex_language` |
//!
//! `multi_file` treats a path without a dot as a directory-level entry. This
//! also fires for extensionless files such as `Makefile`; that imprecision is
//! long-standing behavior and scores depend on it.

use std::collections::BTreeSet;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::core::{ChangeCounts, LanguageFamily};
use crate::patterns::PatternTag;

/// Heuristic complexity with the factors that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityScore {
    pub score: u32,
    pub factors: BTreeSet<String>,
}

impl ComplexityScore {
    fn add(&mut self, points: u32, factor: impl Into<String>) {
        self.score += points;
        self.factors.insert(factor.into());
    }
}

impl AddAssign<&ComplexityScore> for ComplexityScore {
    fn add_assign(&mut self, other: &ComplexityScore) {
        self.score += other.score;
        self.factors.extend(other.factors.iter().cloned());
    }
}

impl<'a> std::iter::Sum<&'a ComplexityScore> for ComplexityScore {
    fn sum<I: Iterator<Item = &'a ComplexityScore>>(iter: I) -> Self {
        let mut total = ComplexityScore::default();
        for score in iter {
            total += score;
        }
        total
    }
}

/// Estimate complexity of one file's changes.
pub fn estimate(
    path: &str,
    lang: LanguageFamily,
    counts: &ChangeCounts,
    patterns: &BTreeSet<PatternTag>,
) -> ComplexityScore {
    let mut complexity = ComplexityScore::default();

    match counts.total {
        0..=3 => complexity.add(1, "few_changes"),
        4..=10 => complexity.add(2, "moderate_changes"),
        _ => complexity.add(3, "many_changes"),
    }

    if !path.contains('.') {
        complexity.add(2, "multi_file");
    }

    for tag in patterns.iter().filter(|t| t.is_complex()) {
        complexity.add(1, format!("complex_pattern_{tag}"));
    }

    if lang.is_verbose() {
        complexity.add(1, "complex_language");
    }

    complexity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(total: usize) -> ChangeCounts {
        ChangeCounts {
            added: total,
            modified: 0,
            removed: 0,
            total,
        }
    }

    #[test]
    fn test_change_count_bands() {
        let none = BTreeSet::new();
        let few = estimate("a.py", LanguageFamily::Python, &counts(3), &none);
        assert_eq!(few.score, 1);
        assert!(few.factors.contains("few_changes"));

        let moderate = estimate("a.py", LanguageFamily::Python, &counts(4), &none);
        assert_eq!(moderate.score, 2);
        assert!(moderate.factors.contains("moderate_changes"));

        let moderate_top = estimate("a.py", LanguageFamily::Python, &counts(10), &none);
        assert_eq!(moderate_top.score, 2);

        let many = estimate("a.py", LanguageFamily::Python, &counts(11), &none);
        assert_eq!(many.score, 3);
        assert_eq!(many.factors.len(), 1);
    }

    #[test]
    fn test_multi_file_heuristic() {
        let none = BTreeSet::new();
        let score = estimate("Makefile", LanguageFamily::Unknown, &counts(1), &none);
        assert_eq!(score.score, 3);
        assert!(score.factors.contains("multi_file"));
    }

    #[test]
    fn test_complex_patterns_add_one_each() {
        let patterns = BTreeSet::from([
            PatternTag::Concurrency,
            PatternTag::ErrorHandling,
            PatternTag::OffByOne,
        ]);
        let score = estimate("A.java", LanguageFamily::Java, &counts(2), &patterns);
        // 1 (few) + 2 (patterns) + 1 (language)
        assert_eq!(score.score, 4);
        assert!(score.factors.contains("complex_pattern_concurrency"));
        assert!(score.factors.contains("complex_pattern_error_handling"));
        assert!(score.factors.contains("complex_language"));
    }

    #[test]
    fn test_sum_unions_factors() {
        let none = BTreeSet::new();
        let a = estimate("a.py", LanguageFamily::Python, &counts(1), &none);
        let b = estimate("b.rs", LanguageFamily::Rust, &counts(20), &none);
        let c = estimate("c.py", LanguageFamily::Python, &counts(2), &none);
        let total: ComplexityScore = [a, b, c].iter().sum();
        assert_eq!(total.score, 1 + 4 + 1);
        assert_eq!(
            total.factors,
            BTreeSet::from([
                "few_changes".to_string(),
                "many_changes".to_string(),
                "complex_language".to_string(),
            ])
        );
    }
}
