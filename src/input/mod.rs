//! Collaborators that turn files on disk into a [`SubmissionInput`].
//!
//! Two forms are supported: a pair of directories holding the code before and
//! after the fix, and a JSON manifest carrying the texts inline.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::config::InputConfig;
use crate::core::{Error, FileInput, Result, SubmissionInput, SubmissionManifest};

/// Relative paths of the regular files under a directory.
#[derive(Debug, Clone)]
pub struct FileTree {
    root: PathBuf,
    files: BTreeSet<String>,
}

impl FileTree {
    /// Walk `root`, skipping hidden entries, ignored files and `exclude` matches.
    pub fn walk(root: impl AsRef<Path>, config: &InputConfig) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        let exclude = build_exclude_set(&config.exclude)?;

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(config.respect_gitignore)
            .git_global(config.respect_gitignore)
            .git_exclude(config.respect_gitignore)
            .require_git(false)
            .build();

        let mut files = BTreeSet::new();
        for entry in walker.flatten() {
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Some(relative) = relative_path(root, entry.path()) else {
                continue;
            };
            if exclude.is_match(&relative) {
                tracing::debug!("Excluded {}", relative);
                continue;
            }
            files.insert(relative);
        }

        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &BTreeSet<String> {
        &self.files
    }

    pub fn contains(&self, relative: &str) -> bool {
        self.files.contains(relative)
    }

    fn read(&self, relative: &str) -> Result<Option<Vec<u8>>> {
        if !self.contains(relative) {
            return Ok(None);
        }
        Ok(Some(fs::read(self.root.join(relative))?))
    }
}

/// Build a submission from a directory before the fix and one after it.
///
/// Only paths whose content differs are included. A path present on one side
/// only is kept with the other side `None`, which the analyzer skips.
pub fn from_directories(
    before: impl AsRef<Path>,
    after: impl AsRef<Path>,
    config: &InputConfig,
) -> Result<SubmissionInput> {
    let before = FileTree::walk(before, config)?;
    let after = FileTree::walk(after, config)?;

    let mut submission = SubmissionInput::new();
    for path in before.files().union(after.files()) {
        let old = before.read(path)?;
        let new = after.read(path)?;
        if old == new {
            continue;
        }
        submission.insert(path.clone(), FileInput::from_bytes(old, new));
    }

    tracing::info!(
        "Collected {} changed files from {} and {}",
        submission.len(),
        before.root().display(),
        after.root().display()
    );
    Ok(submission)
}

/// Load a submission from a JSON manifest file.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<SubmissionInput> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    decode_manifest(&text)
        .map_err(|e| Error::invalid_input(format!("{}: {}", path.display(), e)))
}

/// Parse manifest JSON. Malformed JSON and a missing `files` collection are
/// invalid input.
pub fn parse_manifest(json: &str) -> Result<SubmissionInput> {
    decode_manifest(json).map_err(|e| Error::invalid_input(e.to_string()))
}

fn decode_manifest(json: &str) -> serde_json::Result<SubmissionInput> {
    let manifest: SubmissionManifest = serde_json::from_str(json)?;
    Ok(manifest.into())
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::config(format!("invalid exclude pattern {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::config(format!("invalid exclude patterns: {e}")))
}

/// `/`-separated path of `path` relative to `root`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn pair() -> (TempDir, TempDir) {
        let before = TempDir::new().unwrap();
        let after = TempDir::new().unwrap();
        write(before.path(), "src/a.py", "x = 1\n");
        write(after.path(), "src/a.py", "x = 2\n");
        write(before.path(), "same.py", "y = 1\n");
        write(after.path(), "same.py", "y = 1\n");
        write(after.path(), "new.py", "z = 1\n");
        (before, after)
    }

    #[test]
    fn test_from_directories_keeps_changed_paths() {
        let (before, after) = pair();
        let submission =
            from_directories(before.path(), after.path(), &InputConfig::default()).unwrap();
        let paths: Vec<_> = submission.files.keys().cloned().collect();
        assert_eq!(paths, vec!["new.py", "src/a.py"]);
        assert!(submission.files["src/a.py"].is_complete());
        assert!(submission.files["new.py"].before.is_none());
    }

    #[test]
    fn test_exclude_patterns() {
        let (before, after) = pair();
        let config = InputConfig {
            exclude: vec!["src/**".to_string()],
            ..Default::default()
        };
        let submission = from_directories(before.path(), after.path(), &config).unwrap();
        assert!(!submission.files.contains_key("src/a.py"));
        assert!(submission.files.contains_key("new.py"));
    }

    #[test]
    fn test_hidden_files_are_skipped() {
        let (before, after) = pair();
        write(after.path(), ".secret", "token");
        let tree = FileTree::walk(after.path(), &InputConfig::default()).unwrap();
        assert!(!tree.contains(".secret"));
        assert!(tree.contains("src/a.py"));
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = FileTree::walk(dir.path().join("nope"), &InputConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let dir = TempDir::new().unwrap();
        let config = InputConfig {
            exclude: vec!["a[".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            FileTree::walk(dir.path(), &config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_manifest() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "fix.json",
            r#"{"files": {"a.py": {"before": "x = 1\n", "after": "x = 2\n", "diff": "@@ -1 +1 @@"}}}"#,
        );
        let submission = load_manifest(dir.path().join("fix.json")).unwrap();
        let file = &submission.files["a.py"];
        assert_eq!(file.after.as_deref(), Some(b"x = 2\n".as_slice()));
        assert_eq!(file.diff.as_deref(), Some("@@ -1 +1 @@"));
    }

    #[test]
    fn test_parse_manifest_errors_are_invalid_input() {
        let err = parse_manifest(r#"{"changes": {}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("files"));
        assert!(matches!(parse_manifest("{"), Err(Error::InvalidInput(_))));

        let submission = parse_manifest(r#"{"files": {}}"#).unwrap();
        assert!(submission.is_empty());
    }

    #[test]
    fn test_manifest_without_files_is_invalid() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "fix.json", r#"{"changes": {}}"#);
        let err = load_manifest(dir.path().join("fix.json")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("files"));
    }
}
