//! Language-agnostic detectors.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::{tag_if, Detector, PatternTag};
use crate::core::LanguageFamily;

/// A numeric literal moved by exactly one.
pub struct OffByOneDetector;

impl Detector for OffByOneDetector {
    fn name(&self) -> &'static str {
        "off_by_one"
    }

    fn description(&self) -> &'static str {
        "Numeric literal changed by exactly 1"
    }

    fn supports_language(&self, _lang: LanguageFamily) -> bool {
        true
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        let Some(before) = before else {
            return BTreeSet::new();
        };
        let hit = numbers(before)
            .zip(numbers(after))
            .any(|(b, a)| b.abs_diff(a) == 1);
        tag_if(hit, PatternTag::OffByOne)
    }
}

fn numbers(text: &str) -> impl Iterator<Item = u128> + '_ {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER
        .get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
}

/// A comparison flipped direction (`<` to `>`, `==` to `!=`, or back).
pub struct ConditionInversionDetector;

#[derive(Default)]
struct Comparisons {
    less: bool,
    greater: bool,
    equal: bool,
    not_equal: bool,
}

impl Comparisons {
    fn scan(text: &str) -> Self {
        static OPERATOR: OnceLock<Regex> = OnceLock::new();
        let re = OPERATOR
            .get_or_init(|| Regex::new(r"===|!==|==|!=|<=|>=|<|>").expect("valid regex"));

        // Arrows and shifts are not comparisons.
        let cleaned = text
            .replace("->", " ")
            .replace("=>", " ")
            .replace("<<", " ")
            .replace(">>", " ");

        let mut found = Self::default();
        for m in re.find_iter(&cleaned) {
            match m.as_str() {
                "<" | "<=" => found.less = true,
                ">" | ">=" => found.greater = true,
                "==" | "===" => found.equal = true,
                "!=" | "!==" => found.not_equal = true,
                _ => {}
            }
        }
        found
    }
}

impl Detector for ConditionInversionDetector {
    fn name(&self) -> &'static str {
        "condition_inversion"
    }

    fn description(&self) -> &'static str {
        "Comparison operator polarity flipped"
    }

    fn supports_language(&self, _lang: LanguageFamily) -> bool {
        true
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        let Some(before) = before else {
            return BTreeSet::new();
        };
        let b = Comparisons::scan(before);
        let a = Comparisons::scan(after);
        let hit = (b.greater && a.less)
            || (b.less && a.greater)
            || (b.equal && a.not_equal)
            || (b.not_equal && a.equal);
        tag_if(hit, PatternTag::ConditionInversion)
    }
}

/// A try/catch/except/finally construct that was not there before.
pub struct ErrorHandlingDetector;

impl Detector for ErrorHandlingDetector {
    fn name(&self) -> &'static str {
        "error_handling"
    }

    fn description(&self) -> &'static str {
        "Exception handling construct newly added"
    }

    fn supports_language(&self, _lang: LanguageFamily) -> bool {
        true
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        static KEYWORD: OnceLock<Regex> = OnceLock::new();
        let re = KEYWORD
            .get_or_init(|| Regex::new(r"\b(try|catch|except|finally)\b").expect("valid regex"));
        let hit = re.is_match(after) && !before.is_some_and(|b| re.is_match(b));
        tag_if(hit, PatternTag::ErrorHandling)
    }
}

/// A new or changed assignment.
pub struct InitializationDetector;

impl Detector for InitializationDetector {
    fn name(&self) -> &'static str {
        "initialization"
    }

    fn description(&self) -> &'static str {
        "Variable assignment added or changed"
    }

    fn supports_language(&self, _lang: LanguageFamily) -> bool {
        true
    }

    fn detect(&self, _before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        static ASSIGNMENT: OnceLock<Regex> = OnceLock::new();
        let re = ASSIGNMENT.get_or_init(|| Regex::new(r"\w+\s*=\s*[^=]+").expect("valid regex"));
        tag_if(re.is_match(after), PatternTag::Initialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(detector: &dyn Detector, before: Option<&str>, after: &str) -> bool {
        !detector.detect(before, after).is_empty()
    }

    #[test]
    fn test_off_by_one() {
        let d = OffByOneDetector;
        assert!(hits(&d, Some("for i in range(10):"), "for i in range(11):"));
        assert!(hits(&d, Some("x[len - 1]"), "x[len - 2]"));
        assert!(!hits(&d, Some("timeout = 30"), "timeout = 60"));
        assert!(!hits(&d, None, "x = 1"));
    }

    #[test]
    fn test_off_by_one_compares_positions() {
        let d = OffByOneDetector;
        // 5 -> 5 and 10 -> 20: no pair moved by one.
        assert!(!hits(&d, Some("f(5, 10)"), "f(5, 20)"));
        // Second pair 10 -> 9.
        assert!(hits(&d, Some("f(5, 10)"), "f(5, 9)"));
    }

    #[test]
    fn test_off_by_one_huge_literals() {
        let d = OffByOneDetector;
        assert!(!hits(
            &d,
            Some("k = 999999999999999999999999999999999999999999"),
            "k = 1"
        ));
    }

    #[test]
    fn test_condition_inversion() {
        let d = ConditionInversionDetector;
        assert!(hits(&d, Some("if a > b:"), "if a < b:"));
        assert!(hits(&d, Some("if (x <= 0) {"), "if (x >= 0) {"));
        assert!(hits(&d, Some("if x == y:"), "if x != y:"));
        assert!(hits(&d, Some("if (x !== y) {"), "if (x === y) {"));
        assert!(!hits(&d, Some("if a > b:"), "if a > c:"));
        assert!(!hits(&d, None, "if a < b:"));
    }

    #[test]
    fn test_condition_inversion_ignores_arrows() {
        let d = ConditionInversionDetector;
        assert!(!hits(&d, Some("ptr->next"), "x < y"));
        assert!(!hits(&d, Some("items.map(x => x)"), "a < b"));
    }

    #[test]
    fn test_error_handling_on_added_lines() {
        let d = ErrorHandlingDetector;
        assert!(hits(&d, None, "    try:"));
        assert!(hits(&d, None, "} catch (IOException e) {"));
        assert!(hits(&d, None, "finally {"));
        assert!(!hits(&d, None, "retry_count = 3"));
    }

    #[test]
    fn test_error_handling_must_be_new() {
        let d = ErrorHandlingDetector;
        assert!(!hits(&d, Some("except ValueError:"), "except (ValueError, KeyError):"));
        assert!(hits(&d, Some("result = call()"), "try: result = call()"));
    }

    #[test]
    fn test_initialization() {
        let d = InitializationDetector;
        assert!(hits(&d, None, "count = 0"));
        assert!(hits(&d, Some("x = 1"), "x = 2"));
        assert!(!hits(&d, None, "if a == b:"));
        assert!(!hits(&d, None, "return value"));
    }
}
