use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A commit reachable from the working branch but not from the base.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Abbreviated commit hash (e.g., "a1b2c3d")
    pub short_hash: String,
    /// Commit subject line
    pub message: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    /// Author date, with the author's UTC offset preserved
    pub date: DateTime<FixedOffset>,
}

/// Per-file change counts between the base and the working branch.
/// Binary files are reported with zero counts rather than omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDelta {
    pub path: String,
    pub total_changes: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl FileDelta {
    pub fn new(path: impl Into<String>, insertions: usize, deletions: usize) -> Self {
        Self {
            path: path.into(),
            total_changes: insertions + deletions,
            insertions,
            deletions,
        }
    }
}

/// Author identity of one commit in a file's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub author_name: String,
    pub author_email: String,
}

impl HistoryEntry {
    pub fn new(author_name: impl Into<String>, author_email: impl Into<String>) -> Self {
        Self {
            author_name: author_name.into(),
            author_email: author_email.into(),
        }
    }
}
