//! Inputs describing one submission (reference or candidate fix).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Before/after snapshots of one path, as supplied by a collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    /// Content before the fix. `None` when the collaborator could not supply it.
    pub before: Option<Vec<u8>>,
    /// Content after the fix. `None` when the collaborator could not supply it.
    pub after: Option<Vec<u8>>,
    /// Unified diff text, only consulted to detect binary changes.
    pub diff: Option<String>,
}

impl FileInput {
    /// Create from two text snapshots.
    pub fn from_text(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: Some(before.into().into_bytes()),
            after: Some(after.into().into_bytes()),
            diff: None,
        }
    }

    /// Create from raw bytes.
    pub fn from_bytes(before: Option<Vec<u8>>, after: Option<Vec<u8>>) -> Self {
        Self {
            before,
            after,
            diff: None,
        }
    }

    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = Some(diff.into());
        self
    }

    /// Both sides present.
    pub fn is_complete(&self) -> bool {
        self.before.is_some() && self.after.is_some()
    }
}

/// All files one submission touched, keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionInput {
    pub files: BTreeMap<String, FileInput>,
}

impl SubmissionInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one file.
    pub fn with_file(mut self, path: impl Into<String>, file: FileInput) -> Self {
        self.files.insert(path.into(), file);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, file: FileInput) {
        self.files.insert(path.into(), file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// JSON manifest form of a submission, text only.
///
/// ```json
/// { "files": { "src/a.py": { "before": "...", "after": "..." } } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionManifest {
    pub files: BTreeMap<String, ManifestFile>,
}

/// One file entry of a [`SubmissionManifest`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub diff: Option<String>,
}

impl From<SubmissionManifest> for SubmissionInput {
    fn from(manifest: SubmissionManifest) -> Self {
        let files = manifest
            .files
            .into_iter()
            .map(|(path, file)| {
                let input = FileInput {
                    before: file.before.map(String::into_bytes),
                    after: file.after.map(String::into_bytes),
                    diff: file.diff,
                };
                (path, input)
            })
            .collect();
        Self { files }
    }
}
