use std::collections::BTreeSet;

use serde::Serialize;

use crate::git::{CommitRecord, FileDelta};

/// Coarse classification of a commit by its leading word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitTag {
    Fix,
    Feat,
    Refactor,
    Docs,
    Test,
    Other,
}

impl CommitTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitTag::Fix => "fix",
            CommitTag::Feat => "feat",
            CommitTag::Refactor => "refactor",
            CommitTag::Docs => "docs",
            CommitTag::Test => "test",
            CommitTag::Other => "other",
        }
    }
}

impl std::fmt::Display for CommitTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything known about the divergence between a working branch and its base.
/// Built fresh for every invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub current_branch: String,
    pub base_branch: String,
    pub total_commits: usize,
    /// Newest first
    pub commits: Vec<CommitRecord>,
    /// Always equal to `files.len()`
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub files: Vec<FileDelta>,
    /// Distinct tags seen across `commits`; empty when there are none
    pub commit_type_tags: BTreeSet<CommitTag>,
    pub raw_diff_stat: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_breaking_change: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_tests: Option<bool>,
}

impl ChangeSummary {
    /// Assemble a summary, deriving the totals from `files` and the tags from `commits`.
    pub fn new(
        current_branch: String,
        base_branch: String,
        commits: Vec<CommitRecord>,
        files: Vec<FileDelta>,
        raw_diff_stat: String,
    ) -> Self {
        let commit_type_tags = commits
            .iter()
            .map(|c| super::classify_commit(&c.message))
            .collect();

        Self {
            current_branch,
            base_branch,
            total_commits: commits.len(),
            files_changed: files.len(),
            insertions: files.iter().map(|f| f.insertions).sum(),
            deletions: files.iter().map(|f| f.deletions).sum(),
            commits,
            files,
            commit_type_tags,
            raw_diff_stat,
            has_breaking_change: None,
            has_tests: None,
        }
    }

    pub fn commit_messages(&self) -> Vec<&str> {
        self.commits.iter().map(|c| c.message.as_str()).collect()
    }

    pub fn file_paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }
}
