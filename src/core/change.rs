//! Line-level change records.

use serde::{Deserialize, Serialize};

/// Kind of a line-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// One line-level change between a before and after snapshot.
///
/// Line numbers are 1-indexed. `0` means the position is unknown, which
/// happens when the hunk header it came from could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Change {
    /// Line present only in the after snapshot.
    Added { after_line: u32, after: String },
    /// Line present only in the before snapshot.
    Removed { before_line: u32, before: String },
    /// A removed line immediately followed by an added line.
    Modified {
        before_line: u32,
        after_line: u32,
        before: String,
        after: String,
    },
}

impl Change {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added { .. } => ChangeKind::Added,
            Self::Removed { .. } => ChangeKind::Removed,
            Self::Modified { .. } => ChangeKind::Modified,
        }
    }

    /// Line number on the before side, if this change touches it and the
    /// position is known.
    pub fn before_line(&self) -> Option<u32> {
        match self {
            Self::Removed { before_line, .. } | Self::Modified { before_line, .. } => {
                Some(*before_line).filter(|&n| n > 0)
            }
            Self::Added { .. } => None,
        }
    }

    /// Line number on the after side, if this change touches it and the
    /// position is known.
    pub fn after_line(&self) -> Option<u32> {
        match self {
            Self::Added { after_line, .. } | Self::Modified { after_line, .. } => {
                Some(*after_line).filter(|&n| n > 0)
            }
            Self::Removed { .. } => None,
        }
    }

    pub fn before_text(&self) -> Option<&str> {
        match self {
            Self::Removed { before, .. } | Self::Modified { before, .. } => Some(before),
            Self::Added { .. } => None,
        }
    }

    /// Text the change leaves behind: the added line or the modified-after line.
    pub fn after_text(&self) -> Option<&str> {
        match self {
            Self::Added { after, .. } | Self::Modified { after, .. } => Some(after),
            Self::Removed { .. } => None,
        }
    }
}

/// Per-kind totals for a change sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
    pub total: usize,
}

impl ChangeCounts {
    pub fn from_changes(changes: &[Change]) -> Self {
        let mut counts = Self::default();
        for change in changes {
            match change.kind() {
                ChangeKind::Added => counts.added += 1,
                ChangeKind::Removed => counts.removed += 1,
                ChangeKind::Modified => counts.modified += 1,
            }
        }
        counts.total = counts.added + counts.removed + counts.modified;
        counts
    }
}
