//! JavaScript/TypeScript-specific detectors.

use std::collections::BTreeSet;

use super::{tag_if, Detector, PatternTag};
use crate::core::LanguageFamily;

/// Loose `==` tightened to strict `===`.
pub struct LooseEqualityDetector;

impl Detector for LooseEqualityDetector {
    fn name(&self) -> &'static str {
        "loose_equality"
    }

    fn description(&self) -> &'static str {
        "Loose equality replaced by strict equality"
    }

    fn supports_language(&self, lang: LanguageFamily) -> bool {
        lang.is_js_like()
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        let hit = before
            .is_some_and(|b| b.contains("==") && !b.contains("===") && after.contains("==="));
        tag_if(hit, PatternTag::LooseEquality)
    }
}

/// Promise chains or callbacks reworked into `await` / `Promise`.
pub struct AsyncHandlingDetector;

impl Detector for AsyncHandlingDetector {
    fn name(&self) -> &'static str {
        "async_handling"
    }

    fn description(&self) -> &'static str {
        "Asynchronous control flow reworked"
    }

    fn supports_language(&self, lang: LanguageFamily) -> bool {
        lang.is_js_like()
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        let hit = before.is_some_and(|b| {
            (b.contains("then(") && after.contains("await"))
                || (b.contains("callback") && after.contains("Promise"))
        });
        tag_if(hit, PatternTag::AsyncHandling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_detectors_support_js_and_ts() {
        for lang in [LanguageFamily::JavaScript, LanguageFamily::TypeScript] {
            assert!(LooseEqualityDetector.supports_language(lang));
            assert!(AsyncHandlingDetector.supports_language(lang));
        }
        assert!(!LooseEqualityDetector.supports_language(LanguageFamily::Python));
        assert!(!AsyncHandlingDetector.supports_language(LanguageFamily::Java));
    }

    #[test]
    fn test_loose_equality() {
        let d = LooseEqualityDetector;
        assert!(!d.detect(Some("if (a == b) {"), "if (a === b) {").is_empty());
        assert!(d.detect(Some("if (a === b) {"), "if (a === c) {").is_empty());
        assert!(d.detect(None, "if (a === b) {").is_empty());
    }

    #[test]
    fn test_async_handling() {
        let d = AsyncHandlingDetector;
        assert!(!d
            .detect(Some("fetch(url).then(res => res.json())"), "const res = await fetch(url);")
            .is_empty());
        assert!(!d
            .detect(Some("load(callback);"), "return new Promise(resolve => load(resolve));")
            .is_empty());
        assert!(d.detect(Some("x = 1"), "x = await y").is_empty());
    }
}
