//! Defect-pattern classification.
//!
//! Two layers tag a file's change set:
//!
//! - Shape tags derived from change-kind counts alone. At most one fires:
//!   only additions is `missing_code`, only removals is `extraneous_code`,
//!   only modifications is `incorrect_logic`.
//! - Content tags from [`Detector`]s, pure functions of one change's before
//!   and after text. The [`DetectorRegistry`] selects detectors by language
//!   family, so adding a language means registering detectors, not branching.
//!
//! Tags are best-effort signals. False positives and negatives are expected.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::{Change, ChangeCounts, LanguageFamily};

mod common;
pub mod java;
pub mod javascript;
mod null_check;
pub mod python;

pub use common::{
    ConditionInversionDetector, ErrorHandlingDetector, InitializationDetector, OffByOneDetector,
};
pub use java::{ConcurrencyDetector, ResourceHandlingDetector};
pub use javascript::{AsyncHandlingDetector, LooseEqualityDetector};
pub use null_check::NullCheckDetector;
pub use python::{BareExceptDetector, IndentationDetector, StringFormattingDetector};

/// Heuristic label for the nature of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTag {
    MissingCode,
    ExtraneousCode,
    IncorrectLogic,
    BinaryChange,
    BareExcept,
    IndentationError,
    StringFormatting,
    LooseEquality,
    AsyncHandling,
    NullCheck,
    ResourceHandling,
    Concurrency,
    OffByOne,
    ConditionInversion,
    ErrorHandling,
    Initialization,
}

impl PatternTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCode => "missing_code",
            Self::ExtraneousCode => "extraneous_code",
            Self::IncorrectLogic => "incorrect_logic",
            Self::BinaryChange => "binary_change",
            Self::BareExcept => "bare_except",
            Self::IndentationError => "indentation_error",
            Self::StringFormatting => "string_formatting",
            Self::LooseEquality => "loose_equality",
            Self::AsyncHandling => "async_handling",
            Self::NullCheck => "null_check",
            Self::ResourceHandling => "resource_handling",
            Self::Concurrency => "concurrency",
            Self::OffByOne => "off_by_one",
            Self::ConditionInversion => "condition_inversion",
            Self::ErrorHandling => "error_handling",
            Self::Initialization => "initialization",
        }
    }

    /// Tags that make a fix harder to get right.
    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            Self::Concurrency | Self::AsyncHandling | Self::ErrorHandling | Self::ResourceHandling
        )
    }

    /// Sentence used in an analysis summary, for the tags that have one.
    pub fn summary_phrase(&self) -> Option<&'static str> {
        match self {
            Self::MissingCode => Some("Missing code."),
            Self::ExtraneousCode => Some("Extraneous code."),
            Self::IncorrectLogic => Some("Incorrect logic."),
            Self::OffByOne => Some("Off-by-one error."),
            Self::ConditionInversion => Some("Inverted condition."),
            Self::ErrorHandling => Some("Missing error handling."),
            Self::NullCheck => Some("Missing null check."),
            Self::Concurrency => Some("Concurrency issue."),
            _ => None,
        }
    }
}

impl std::fmt::Display for PatternTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A content heuristic over one change.
///
/// `before` is `None` for an added line and `Some` for a modified line.
/// Removed lines are never passed to detectors.
pub trait Detector: Send + Sync {
    /// Short identifier for the detector.
    fn name(&self) -> &'static str;

    /// Human-readable description of what the detector looks for.
    fn description(&self) -> &'static str;

    /// Check if this detector applies to the given language family.
    fn supports_language(&self, lang: LanguageFamily) -> bool;

    /// Tags suggested by this change. Must not depend on neighboring lines.
    fn detect(&self, before: Option<&str>, after: &str) -> BTreeSet<PatternTag>;
}

/// Ordered collection of detectors.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        default_registry()
    }
}

impl DetectorRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Register a detector after the existing ones.
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Get all registered detectors.
    pub fn detectors(&self) -> &[Box<dyn Detector>] {
        &self.detectors
    }

    /// Get detectors that apply to the given language family, in order.
    pub fn for_language(&self, lang: LanguageFamily) -> Vec<&dyn Detector> {
        self.detectors
            .iter()
            .filter(|d| d.supports_language(lang))
            .map(|d| d.as_ref())
            .collect()
    }
}

/// Registry with every built-in detector.
pub fn default_registry() -> DetectorRegistry {
    let mut registry = DetectorRegistry::empty();
    register_common_detectors(&mut registry);
    register_python_detectors(&mut registry);
    register_javascript_detectors(&mut registry);
    register_java_detectors(&mut registry);
    registry.register(Box::new(NullCheckDetector));
    registry
}

/// Register language-agnostic detectors.
pub fn register_common_detectors(registry: &mut DetectorRegistry) {
    registry.register(Box::new(OffByOneDetector));
    registry.register(Box::new(ConditionInversionDetector));
    registry.register(Box::new(ErrorHandlingDetector));
    registry.register(Box::new(InitializationDetector));
}

/// Register Python-specific detectors.
pub fn register_python_detectors(registry: &mut DetectorRegistry) {
    registry.register(Box::new(BareExceptDetector));
    registry.register(Box::new(IndentationDetector));
    registry.register(Box::new(StringFormattingDetector));
}

/// Register JavaScript/TypeScript-specific detectors.
pub fn register_javascript_detectors(registry: &mut DetectorRegistry) {
    registry.register(Box::new(LooseEqualityDetector));
    registry.register(Box::new(AsyncHandlingDetector));
}

/// Register Java-specific detectors.
pub fn register_java_detectors(registry: &mut DetectorRegistry) {
    registry.register(Box::new(ResourceHandlingDetector));
    registry.register(Box::new(ConcurrencyDetector));
}

/// Tag a file's change set.
pub fn classify(
    changes: &[Change],
    lang: LanguageFamily,
    registry: &DetectorRegistry,
) -> BTreeSet<PatternTag> {
    let mut tags = BTreeSet::new();
    tags.extend(shape_tag(&ChangeCounts::from_changes(changes)));

    let detectors = registry.for_language(lang);
    for change in changes {
        let (before, after) = match change {
            Change::Added { after, .. } => (None, after.as_str()),
            Change::Modified { before, after, .. } => (Some(before.as_str()), after.as_str()),
            Change::Removed { .. } => continue,
        };
        for detector in &detectors {
            tags.extend(detector.detect(before, after));
        }
    }

    tags
}

/// Shape tag for a change set, if exactly one change kind is present.
pub fn shape_tag(counts: &ChangeCounts) -> Option<PatternTag> {
    match (counts.added > 0, counts.removed > 0, counts.modified > 0) {
        (true, false, false) => Some(PatternTag::MissingCode),
        (false, true, false) => Some(PatternTag::ExtraneousCode),
        (false, false, true) => Some(PatternTag::IncorrectLogic),
        _ => None,
    }
}

/// Single-tag set, or empty when `hit` is false.
pub(crate) fn tag_if(hit: bool, tag: PatternTag) -> BTreeSet<PatternTag> {
    let mut tags = BTreeSet::new();
    if hit {
        tags.insert(tag);
    }
    tags
}
