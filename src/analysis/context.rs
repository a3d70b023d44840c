//! Summary and source snippets around the lines a fix touched.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::FileAnalysis;
use crate::patterns::PatternTag;

/// Lines kept before a changed line.
const LINES_BEFORE: usize = 2;
/// Lines kept after a changed line.
const LINES_AFTER: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixContext {
    /// One sentence per notable pattern, e.g. "Missing code. Off-by-one error."
    pub summary: String,
    pub file_contexts: BTreeMap<String, FileContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContext {
    pub path: String,
    /// Before-side line numbers that were removed or modified.
    pub changed_lines: Vec<u32>,
    pub context_lines: BTreeMap<u32, LineContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineContext {
    pub line: u32,
    pub content: String,
    pub before: Vec<String>,
    pub after: Vec<String>,
}

pub fn summarize(patterns: &BTreeSet<PatternTag>) -> String {
    patterns
        .iter()
        .filter_map(PatternTag::summary_phrase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Snippet window around each before-side line `file` touched.
///
/// Returns `None` when the before text is missing or empty.
pub fn file_context(file: &FileAnalysis, before_text: Option<&str>) -> Option<FileContext> {
    let text = before_text.filter(|t| !t.is_empty())?;
    let lines: Vec<&str> = text.lines().collect();

    let changed_lines: Vec<u32> = file
        .changes
        .iter()
        .filter_map(|c| c.before_line())
        .collect();

    let mut context_lines = BTreeMap::new();
    for &line in &changed_lines {
        let idx = line as usize - 1;
        let start = idx.saturating_sub(LINES_BEFORE);
        let end = (idx + 1 + LINES_AFTER).min(lines.len());
        let content = lines.get(idx).copied().unwrap_or_default();
        let before = lines
            .get(start..idx.min(lines.len()))
            .unwrap_or_default()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let after = lines
            .get((idx + 1).min(end)..end)
            .unwrap_or_default()
            .iter()
            .map(|s| s.to_string())
            .collect();
        context_lines.insert(
            line,
            LineContext {
                line,
                content: content.to_string(),
                before,
                after,
            },
        );
    }

    Some(FileContext {
        path: file.path.clone(),
        changed_lines,
        context_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::complexity::ComplexityScore;
    use crate::core::{Change, LanguageFamily};

    fn file_with(changes: Vec<Change>) -> FileAnalysis {
        FileAnalysis {
            path: "a.py".to_string(),
            language: LanguageFamily::Python,
            changes,
            patterns: BTreeSet::new(),
            complexity: ComplexityScore::default(),
        }
    }

    #[test]
    fn test_summary_follows_tag_order() {
        let tags = BTreeSet::from([PatternTag::OffByOne, PatternTag::MissingCode]);
        assert_eq!(summarize(&tags), "Missing code. Off-by-one error.");
        assert_eq!(summarize(&BTreeSet::from([PatternTag::Initialization])), "");
    }

    #[test]
    fn test_window_around_changed_line() {
        let file = file_with(vec![Change::Modified {
            before_line: 4,
            after_line: 4,
            before: "d".to_string(),
            after: "D".to_string(),
        }]);
        let ctx = file_context(&file, Some("a\nb\nc\nd\ne\nf\n")).unwrap();
        assert_eq!(ctx.changed_lines, vec![4]);
        let line = &ctx.context_lines[&4];
        assert_eq!(line.content, "d");
        assert_eq!(line.before, vec!["b", "c"]);
        assert_eq!(line.after, vec!["e", "f"]);
    }

    #[test]
    fn test_window_clamped_at_edges() {
        let file = file_with(vec![
            Change::Removed {
                before_line: 1,
                before: "a".to_string(),
            },
            Change::Removed {
                before_line: 2,
                before: "b".to_string(),
            },
        ]);
        let ctx = file_context(&file, Some("a\nb\n")).unwrap();
        assert!(ctx.context_lines[&1].before.is_empty());
        assert_eq!(ctx.context_lines[&1].after, vec!["b"]);
        assert_eq!(ctx.context_lines[&2].before, vec!["a"]);
        assert!(ctx.context_lines[&2].after.is_empty());
    }

    #[test]
    fn test_added_lines_have_no_before_context() {
        let file = file_with(vec![Change::Added {
            after_line: 1,
            after: "x".to_string(),
        }]);
        let ctx = file_context(&file, Some("y\n")).unwrap();
        assert!(ctx.changed_lines.is_empty());
        assert!(file_context(&file, None).is_none());
        assert!(file_context(&file, Some("")).is_none());
    }
}
