//! Line-level diff extraction.
//!
//! Two whole-file snapshots go through three steps:
//!
//! 1. An LCS line alignment rendered as a zero-context unified diff.
//! 2. A hunk walk over that diff text, which is the only source of line
//!    numbers. Running before/after counters restart at every hunk header.
//! 3. A pairing pass that folds a `Removed` immediately followed by an
//!    `Added` into one `Modified` record.
//!
//! The pairing is order-sensitive: `-a -b +c +d` becomes `-a ~b/c +d`, not
//! two modifications. Non-adjacent changes are never paired.

use std::fmt::Write as _;
use std::sync::OnceLock;

use bstr::ByteSlice;
use regex::Regex;

use crate::core::Change;

/// Upper bound on the LCS table size. Larger middles are treated as a full
/// replacement of the differing region.
const MAX_LCS_CELLS: usize = 8_000_000;

/// Extract the ordered change records between two text snapshots.
///
/// Identical inputs yield an empty sequence, an empty `before` yields only
/// `Added` records and an empty `after` only `Removed` records.
pub fn extract_changes(before: &str, after: &str) -> Vec<Change> {
    let unified = unified_diff(before, after);
    pair_modifications(parse_changes(&unified))
}

/// Decode file content for line analysis.
///
/// Returns `None` for content that is not valid UTF-8 or contains a NUL byte.
pub fn decode(content: &[u8]) -> Option<&str> {
    if content.find_byte(0).is_some() {
        return None;
    }
    content.to_str().ok()
}

/// Whether a unified diff announces a binary change instead of line hunks.
pub fn is_binary_diff(diff: &str) -> bool {
    diff.contains("GIT binary patch")
        || diff
            .lines()
            .any(|line| line.starts_with("Binary files ") && line.trim_end().ends_with(" differ"))
}

/// Render a zero-context unified diff with generic file labels.
pub fn unified_diff(before: &str, after: &str) -> String {
    unified_diff_with_labels(before, after, "before", "after")
}

/// Render a zero-context unified diff.
///
/// Returns an empty string when the two sides have the same lines.
pub fn unified_diff_with_labels(before: &str, after: &str, from: &str, to: &str) -> String {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();
    let hunks = collect_hunks(&old, &new);
    if hunks.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let _ = writeln!(out, "--- {from}");
    let _ = writeln!(out, "+++ {to}");
    for hunk in &hunks {
        let _ = writeln!(
            out,
            "@@ -{} +{} @@",
            format_range(hunk.old_start, hunk.removed.len()),
            format_range(hunk.new_start, hunk.added.len())
        );
        for line in &hunk.removed {
            let _ = writeln!(out, "-{line}");
        }
        for line in &hunk.added {
            let _ = writeln!(out, "+{line}");
        }
    }
    out
}

/// Walk the hunks of a unified diff and emit one record per removed or
/// added line.
///
/// A hunk header that cannot be parsed resets both counters to `0`, meaning
/// "position unknown", for every line until the next valid header.
pub fn parse_changes(unified: &str) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut in_hunks = false;
    let mut next_before: u32 = 0;
    let mut next_after: u32 = 0;

    for line in unified.lines() {
        if line.starts_with("@@") {
            in_hunks = true;
            match parse_hunk_header(line) {
                Some((before_start, after_start)) => {
                    next_before = before_start;
                    next_after = after_start;
                }
                None => {
                    tracing::debug!("Malformed hunk header: {}", line);
                    next_before = 0;
                    next_after = 0;
                }
            }
            continue;
        }

        // File headers, `diff --git` and `index` lines precede the first hunk.
        if !in_hunks {
            continue;
        }

        if let Some(text) = line.strip_prefix('-') {
            changes.push(Change::Removed {
                before_line: next_before,
                before: text.to_string(),
            });
            advance(&mut next_before);
        } else if let Some(text) = line.strip_prefix('+') {
            changes.push(Change::Added {
                after_line: next_after,
                after: text.to_string(),
            });
            advance(&mut next_after);
        } else if line.starts_with(' ') {
            advance(&mut next_before);
            advance(&mut next_after);
        }
    }

    changes
}

/// Merge each `Removed` immediately followed by an `Added` into `Modified`.
pub fn pair_modifications(changes: Vec<Change>) -> Vec<Change> {
    let mut paired = Vec::with_capacity(changes.len());
    let mut iter = changes.into_iter().peekable();

    while let Some(change) = iter.next() {
        if let Change::Removed {
            before_line,
            before,
        } = change
        {
            if let Some(Change::Added { .. }) = iter.peek() {
                if let Some(Change::Added { after_line, after }) = iter.next() {
                    paired.push(Change::Modified {
                        before_line,
                        after_line,
                        before,
                        after,
                    });
                    continue;
                }
            }
            paired.push(Change::Removed {
                before_line,
                before,
            });
        } else {
            paired.push(change);
        }
    }

    paired
}

/// Counters stay at `0` once the position is unknown.
fn advance(counter: &mut u32) {
    if *counter > 0 {
        *counter += 1;
    }
}

fn hunk_header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("valid regex")
    })
}

/// Returns the first before and after line numbers of a hunk.
fn parse_hunk_header(line: &str) -> Option<(u32, u32)> {
    let caps = hunk_header_regex().captures(line)?;
    let before = caps.get(1)?.as_str().parse().ok()?;
    let after = caps.get(2)?.as_str().parse().ok()?;
    Some((before, after))
}

/// GNU unified range: `start,len`, `start` alone for one line, and the line
/// before the gap for an empty range.
fn format_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

struct Hunk<'a> {
    old_start: usize,
    new_start: usize,
    removed: Vec<&'a str>,
    added: Vec<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Delete,
    Insert,
}

fn collect_hunks<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<Hunk<'a>> {
    let ops = line_ops(old, new);
    let mut hunks = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    let mut k = 0usize;

    while k < ops.len() {
        if ops[k] == Op::Equal {
            i += 1;
            j += 1;
            k += 1;
            continue;
        }

        let mut hunk = Hunk {
            old_start: i,
            new_start: j,
            removed: Vec::new(),
            added: Vec::new(),
        };
        while k < ops.len() && ops[k] != Op::Equal {
            match ops[k] {
                Op::Delete => {
                    hunk.removed.push(old[i]);
                    i += 1;
                }
                Op::Insert => {
                    hunk.added.push(new[j]);
                    j += 1;
                }
                Op::Equal => unreachable!(),
            }
            k += 1;
        }
        hunks.push(hunk);
    }

    hunks
}

/// Align two line sequences by longest common subsequence.
///
/// Deletions are preferred over insertions on ties so each hunk lists its
/// removed lines first.
fn line_ops(old: &[&str], new: &[&str]) -> Vec<Op> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let a = &old[prefix..old.len() - suffix];
    let b = &new[prefix..new.len() - suffix];

    let mut ops = Vec::with_capacity(old.len() + new.len());
    ops.extend(std::iter::repeat(Op::Equal).take(prefix));

    if (a.len() + 1).saturating_mul(b.len() + 1) > MAX_LCS_CELLS {
        tracing::debug!(
            "Diff region too large for LCS ({}x{} lines), treating as replacement",
            a.len(),
            b.len()
        );
        ops.extend(std::iter::repeat(Op::Delete).take(a.len()));
        ops.extend(std::iter::repeat(Op::Insert).take(b.len()));
    } else {
        ops.extend(lcs_ops(a, b));
    }

    ops.extend(std::iter::repeat(Op::Equal).take(suffix));
    ops
}

fn lcs_ops(a: &[&str], b: &[&str]) -> Vec<Op> {
    let (n, m) = (a.len(), b.len());
    let width = m + 1;
    // table[i * width + j] = LCS length of a[i..] and b[j..]
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if a[i] == b[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            ops.push(Op::Equal);
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            ops.push(Op::Delete);
            i += 1;
        } else {
            ops.push(Op::Insert);
            j += 1;
        }
    }
    ops.extend(std::iter::repeat(Op::Delete).take(n - i));
    ops.extend(std::iter::repeat(Op::Insert).take(m - j));
    ops
}
