//! Java-specific detectors, plus the concurrency detector shared with Python.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::{tag_if, Detector, PatternTag};
use crate::core::LanguageFamily;

/// Manual `close()` replaced by try-with-resources.
pub struct ResourceHandlingDetector;

impl Detector for ResourceHandlingDetector {
    fn name(&self) -> &'static str {
        "resource_handling"
    }

    fn description(&self) -> &'static str {
        "Manual resource cleanup replaced by try-with-resources"
    }

    fn supports_language(&self, lang: LanguageFamily) -> bool {
        matches!(lang, LanguageFamily::Java)
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        let hit = before.is_some_and(|b| {
            b.contains("new ") && b.contains("close()") && after.contains("try (")
        });
        tag_if(hit, PatternTag::ResourceHandling)
    }
}

/// A synchronization construct that was not there before.
pub struct ConcurrencyDetector;

impl ConcurrencyDetector {
    fn keyword(lang: LanguageFamily) -> Option<&'static Regex> {
        static JAVA: OnceLock<Regex> = OnceLock::new();
        static PYTHON: OnceLock<Regex> = OnceLock::new();
        match lang {
            LanguageFamily::Java => Some(JAVA.get_or_init(|| {
                Regex::new(r"\bsynchronized\b").expect("valid regex")
            })),
            LanguageFamily::Python => Some(PYTHON.get_or_init(|| {
                Regex::new(r"\b(R?Lock|Semaphore|Condition)\(|\bwith\s+[\w.]*lock\b")
                    .expect("valid regex")
            })),
            _ => None,
        }
    }
}

impl Detector for ConcurrencyDetector {
    fn name(&self) -> &'static str {
        "concurrency"
    }

    fn description(&self) -> &'static str {
        "Synchronization keyword newly present"
    }

    fn supports_language(&self, lang: LanguageFamily) -> bool {
        Self::keyword(lang).is_some()
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        // Neither keyword occurs in the other language's source.
        let hit = [LanguageFamily::Java, LanguageFamily::Python]
            .into_iter()
            .filter_map(Self::keyword)
            .any(|re| re.is_match(after) && !before.is_some_and(|b| re.is_match(b)));
        tag_if(hit, PatternTag::Concurrency)
    }
}
