//! Core types shared by every stage of an evaluation.

mod change;
mod error;
mod language;
mod submission;

pub use change::{Change, ChangeCounts, ChangeKind};
pub use error::{Error, Result};
pub use language::LanguageFamily;
pub use submission::{FileInput, ManifestFile, SubmissionInput, SubmissionManifest};
