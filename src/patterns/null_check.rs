//! Null/undefined guard detection.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::{tag_if, Detector, PatternTag};
use crate::core::LanguageFamily;

/// A null or undefined guard newly introduced around a dereference.
pub struct NullCheckDetector;

struct Guards {
    member_access: Regex,
    js: Regex,
    java: Regex,
    python: Regex,
}

fn guards() -> &'static Guards {
    static GUARDS: OnceLock<Guards> = OnceLock::new();
    GUARDS.get_or_init(|| Guards {
        member_access: Regex::new(r"\w\.").expect("valid regex"),
        js: Regex::new(r"\w\s*(\?\.|&&)|[!=]==?\s*(null|undefined)\b").expect("valid regex"),
        java: Regex::new(r"\w\s*!=\s*null\b").expect("valid regex"),
        python: Regex::new(r"\bis\s+(not\s+)?None\b").expect("valid regex"),
    })
}

impl NullCheckDetector {
    fn guard_for(lang: LanguageFamily) -> Option<&'static Regex> {
        let g = guards();
        match lang {
            LanguageFamily::JavaScript | LanguageFamily::TypeScript => Some(&g.js),
            LanguageFamily::Java => Some(&g.java),
            LanguageFamily::Python => Some(&g.python),
            _ => None,
        }
    }
}

impl Detector for NullCheckDetector {
    fn name(&self) -> &'static str {
        "null_check"
    }

    fn description(&self) -> &'static str {
        "Null/undefined guard introduced"
    }

    fn supports_language(&self, lang: LanguageFamily) -> bool {
        Self::guard_for(lang).is_some()
    }

    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag> {
        let Some(before) = before else {
            return BTreeSet::new();
        };
        let g = guards();
        if !g.member_access.is_match(before) && !g.python.is_match(after) {
            return BTreeSet::new();
        }
        let hit = [&g.js, &g.java, &g.python]
            .into_iter()
            .any(|re| re.is_match(after) && !re.is_match(before));
        tag_if(hit, PatternTag::NullCheck)
    }
}
