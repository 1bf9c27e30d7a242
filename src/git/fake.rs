use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::DateTime;

use super::{CommitRecord, FileDelta, GitError, HistoryEntry, Repository};

/// In-memory repository for tests; no git binary involved.
#[derive(Default)]
pub struct FakeRepository {
    pub current_branch: String,
    /// Revisions `verify_revision` accepts
    pub revisions: Vec<String>,
    pub commits: Vec<CommitRecord>,
    pub files: Vec<FileDelta>,
    pub diff_stat: String,
    pub diff: String,
    pub histories: HashMap<String, Vec<HistoryEntry>>,
    /// Paths whose history lookup fails
    pub failing_histories: Vec<String>,
    pub local_branches: Vec<String>,
    pub remote_branches: Vec<String>,
    pub default_branch: Option<String>,
    pub remote_url: Option<String>,
    pub calls: CallLog,
}

/// Shared log of (method, args) pairs; clones see the same entries, so a
/// test can keep one after the repository moves into a context.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(String, String)>>>);

impl CallLog {
    /// Arguments of every recorded call to `method`, in order.
    pub fn to(&self, method: &str) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, args)| args.clone())
            .collect()
    }

    fn push(&self, method: &str, args: String) {
        self.0.lock().unwrap().push((method.to_string(), args));
    }
}

impl FakeRepository {
    /// A repository on `branch` with `base` available locally.
    pub fn on_branch(branch: &str, base: &str) -> Self {
        Self {
            current_branch: branch.to_string(),
            revisions: vec![branch.to_string(), base.to_string()],
            local_branches: vec![branch.to_string(), base.to_string()],
            ..Default::default()
        }
    }

    pub fn with_commits(mut self, messages: &[&str]) -> Self {
        self.commits = messages.iter().enumerate().map(|(i, m)| commit(i, m)).collect();
        self
    }

    pub fn with_files(mut self, files: &[(&str, usize, usize)]) -> Self {
        self.files = files
            .iter()
            .map(|(path, ins, del)| FileDelta::new(*path, *ins, *del))
            .collect();
        self
    }

    pub fn with_history(mut self, path: &str, authors: &[(&str, &str)]) -> Self {
        self.histories.insert(
            path.to_string(),
            authors.iter().map(|(n, e)| HistoryEntry::new(*n, *e)).collect(),
        );
        self
    }

    fn record(&self, method: &str, args: String) {
        self.calls.push(method, args);
    }

    fn check_range(&self, base: &str, head: &str) -> Result<(), GitError> {
        for rev in [base, head] {
            if !self.revisions.iter().any(|r| r == rev) {
                return Err(GitError::RevisionNotFound(rev.to_string()));
            }
        }
        Ok(())
    }
}

pub fn commit(index: usize, message: &str) -> CommitRecord {
    CommitRecord {
        short_hash: format!("{:07x}", 0xabc0000 + index),
        message: message.to_string(),
        author_name: "Alice".to_string(),
        author_email: Some("alice@example.com".to_string()),
        date: DateTime::parse_from_rfc3339("2024-05-01T12:00:00+00:00").unwrap(),
    }
}

#[async_trait]
impl Repository for FakeRepository {
    async fn current_branch(&self) -> Result<String, GitError> {
        Ok(self.current_branch.clone())
    }

    async fn verify_revision(&self, rev: &str) -> Result<bool, GitError> {
        Ok(self.revisions.iter().any(|r| r == rev))
    }

    async fn log_range(&self, base: &str, head: &str) -> Result<Vec<CommitRecord>, GitError> {
        self.record("log_range", format!("{base}..{head}"));
        self.check_range(base, head)?;
        Ok(self.commits.clone())
    }

    async fn diff_numstat(&self, base: &str, head: &str) -> Result<Vec<FileDelta>, GitError> {
        self.record("diff_numstat", format!("{base}...{head}"));
        self.check_range(base, head)?;
        Ok(self.files.clone())
    }

    async fn diff_stat(&self, base: &str, head: &str) -> Result<String, GitError> {
        self.check_range(base, head)?;
        Ok(self.diff_stat.clone())
    }

    async fn diff_full(&self, base: &str, head: &str) -> Result<String, GitError> {
        self.record("diff_full", format!("{base}...{head}"));
        self.check_range(base, head)?;
        Ok(self.diff.clone())
    }

    async fn file_history(&self, path: &str) -> Result<Vec<HistoryEntry>, GitError> {
        self.record("file_history", path.to_string());
        if self.failing_histories.iter().any(|p| p == path) {
            return Err(GitError::CommandFailed {
                command: format!("log --follow -- {path}"),
                stderr: "fatal: simulated failure".to_string(),
            });
        }
        Ok(self.histories.get(path).cloned().unwrap_or_default())
    }

    async fn local_branches(&self) -> Result<Vec<String>, GitError> {
        Ok(self.local_branches.clone())
    }

    async fn remote_branches(&self) -> Result<Vec<String>, GitError> {
        Ok(self.remote_branches.clone())
    }

    async fn remote_default_branch(&self) -> Result<Option<String>, GitError> {
        Ok(self.default_branch.clone())
    }

    async fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        self.remote_url.clone().ok_or_else(|| GitError::CommandFailed {
            command: format!("remote get-url {remote}"),
            stderr: format!("error: No such remote '{remote}'"),
        })
    }
}
