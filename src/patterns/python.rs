//! Python-specific detectors.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::{tag_if, Detector, PatternTag};
use crate::core::LanguageFamily;

/// Bare `except:` narrowed to a typed handler.
pub struct BareExceptDetector;

impl Detector for BareExceptDetector {
    fn name(&self) -> &'static str {
        "bare_except"
    }

    fn description(&self) -> &'static str {
        "Bare except clause replaced by a typed one"
    }

    fn supports_language(&self, lang: LanguageFamily) -> bool {
        matches!(lang, LanguageFamily::Python)
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        static BARE: OnceLock<Regex> = OnceLock::new();
        static TYPED: OnceLock<Regex> = OnceLock::new();
        let bare = BARE.get_or_init(|| Regex::new(r"\bexcept\s*:").expect("valid regex"));
        let typed = TYPED.get_or_init(|| {
            Regex::new(r"^\s*except\s+\(?\s*[A-Za-z_][\w.]*").expect("valid regex")
        });

        let hit = before.is_some_and(|b| bare.is_match(b)) && typed.is_match(after);
        tag_if(hit, PatternTag::BareExcept)
    }
}

/// Same statement, different indentation.
pub struct IndentationDetector;

impl Detector for IndentationDetector {
    fn name(&self) -> &'static str {
        "indentation_error"
    }

    fn description(&self) -> &'static str {
        "Line re-indented without other changes"
    }

    fn supports_language(&self, lang: LanguageFamily) -> bool {
        matches!(lang, LanguageFamily::Python)
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        let hit = before.is_some_and(|b| {
            let body = b.trim_start();
            !body.is_empty() && body == after.trim_start() && b.len() != after.len()
        });
        tag_if(hit, PatternTag::IndentationError)
    }
}

/// String concatenation or `%` formatting moved to `format()` or f-strings.
pub struct StringFormattingDetector;

impl Detector for StringFormattingDetector {
    fn name(&self) -> &'static str {
        "string_formatting"
    }

    fn description(&self) -> &'static str {
        "String formatting style changed"
    }

    fn supports_language(&self, lang: LanguageFamily) -> bool {
        matches!(lang, LanguageFamily::Python)
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        let Some(before) = before else {
            return BTreeSet::new();
        };
        let hit = (before.contains('%') && after.contains('{') && after.contains('}'))
            || (before.contains('+') && after.contains("format("))
            || (before.contains('+') && (after.contains("f\"") || after.contains("f'")));
        tag_if(hit, PatternTag::StringFormatting)
    }
}
