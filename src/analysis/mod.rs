//! Per-file and per-submission fix analysis.
//!
//! A [`FileAnalysis`] combines the change records, pattern tags and
//! complexity of one changed path. A [`BugFixAnalysis`] aggregates them for
//! a whole submission, so the reference and the candidate fix each get one.

pub mod complexity;
pub mod context;

use std::collections::BTreeSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};

pub use complexity::ComplexityScore;
pub use context::{FileContext, FixContext, LineContext};

use crate::core::{Change, ChangeCounts, Error, FileInput, LanguageFamily, Result, SubmissionInput};
use crate::diff;
use crate::patterns::{self, DetectorRegistry, PatternTag};

/// Analysis of one changed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: String,
    pub language: LanguageFamily,
    pub changes: Vec<Change>,
    pub patterns: BTreeSet<PatternTag>,
    pub complexity: ComplexityScore,
}

impl FileAnalysis {
    pub fn counts(&self) -> ChangeCounts {
        ChangeCounts::from_changes(&self.changes)
    }

    /// Before-side line numbers touched by removals and modifications.
    pub fn touched_before_lines(&self) -> BTreeSet<u32> {
        self.changes.iter().filter_map(Change::before_line).collect()
    }

    /// Text of every added or modified-after line.
    pub fn after_lines(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().filter_map(Change::after_text)
    }
}

/// Analysis of every file one submission changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BugFixAnalysis {
    pub changed_files: Vec<FileAnalysis>,
    /// Union of the file pattern sets.
    pub patterns: BTreeSet<PatternTag>,
    /// Sum of the file complexities.
    pub complexity: ComplexityScore,
    pub context: FixContext,
}

impl BugFixAnalysis {
    /// Aggregate file analyses, without snippet context.
    pub fn from_files(changed_files: Vec<FileAnalysis>) -> Self {
        let patterns: BTreeSet<PatternTag> = changed_files
            .iter()
            .flat_map(|f| f.patterns.iter().copied())
            .collect();
        let complexity: ComplexityScore = changed_files.iter().map(|f| &f.complexity).sum();
        let context = FixContext {
            summary: context::summarize(&patterns),
            ..Default::default()
        };
        Self {
            changed_files,
            patterns,
            complexity,
            context,
        }
    }

    pub fn file(&self, path: &str) -> Option<&FileAnalysis> {
        self.changed_files.iter().find(|f| f.path == path)
    }

    pub fn paths(&self) -> BTreeSet<&str> {
        self.changed_files.iter().map(|f| f.path.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.changed_files.is_empty()
    }
}

/// Turns a [`SubmissionInput`] into a [`BugFixAnalysis`].
#[derive(Default)]
pub struct Analyzer {
    registry: DetectorRegistry,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom detector registry.
    pub fn with_registry(registry: DetectorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    /// Analyze every file of a submission.
    ///
    /// Files missing either side are skipped with a warning, and files whose
    /// content did not change are not part of the result. An empty path is
    /// structurally invalid and aborts the analysis.
    pub fn analyze(&self, input: &SubmissionInput) -> Result<BugFixAnalysis> {
        let start = Instant::now();

        if input.files.keys().any(|p| p.trim().is_empty()) {
            return Err(Error::invalid_input("submission contains an empty file path"));
        }

        let mut changed_files = Vec::with_capacity(input.len());
        for (path, file) in &input.files {
            if !file.is_complete() {
                tracing::warn!("Skipping {}: before or after content missing", path);
                continue;
            }
            match self.analyze_file(path, file) {
                Some(analysis) => changed_files.push(analysis),
                None => tracing::debug!("Skipping {}: content unchanged", path),
            }
        }

        let mut analysis = BugFixAnalysis::from_files(changed_files);
        for file in &analysis.changed_files {
            let before = input
                .files
                .get(&file.path)
                .and_then(|f| f.before.as_deref())
                .and_then(diff::decode);
            if let Some(ctx) = context::file_context(file, before) {
                analysis.context.file_contexts.insert(file.path.clone(), ctx);
            }
        }

        tracing::info!(
            "Fix analysis completed in {:?}: {} files changed, {} patterns, complexity {}",
            start.elapsed(),
            analysis.changed_files.len(),
            analysis.patterns.len(),
            analysis.complexity.score
        );

        Ok(analysis)
    }

    /// Analyze one file. Returns `None` when the file is incomplete or has
    /// no line-level change (identical bytes, or only line endings differ).
    pub fn analyze_file(&self, path: &str, file: &FileInput) -> Option<FileAnalysis> {
        let before = file.before.as_deref()?;
        let after = file.after.as_deref()?;
        if before == after {
            return None;
        }

        let language = LanguageFamily::detect(path);
        let binary = file.diff.as_deref().is_some_and(diff::is_binary_diff);
        let texts = diff::decode(before).zip(diff::decode(after));

        let Some((before, after)) = texts.filter(|_| !binary) else {
            tracing::debug!("{}: binary or undecodable content", path);
            return Some(FileAnalysis {
                path: path.to_string(),
                language,
                changes: Vec::new(),
                patterns: BTreeSet::from([PatternTag::BinaryChange]),
                complexity: ComplexityScore::default(),
            });
        };

        let changes = diff::extract_changes(before, after);
        if changes.is_empty() {
            tracing::debug!("{}: only line endings changed", path);
            return None;
        }
        let patterns = patterns::classify(&changes, language, &self.registry);
        let complexity =
            complexity::estimate(path, language, &ChangeCounts::from_changes(&changes), &patterns);

        tracing::debug!(
            "{}: {} changes, patterns {:?}, complexity {}",
            path,
            changes.len(),
            patterns,
            complexity.score
        );

        Some(FileAnalysis {
            path: path.to_string(),
            language,
            changes,
            patterns,
            complexity,
        })
    }
}
