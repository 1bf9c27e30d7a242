pub mod base;
pub mod cli;
#[cfg(test)]
pub mod fake;
pub mod types;

pub use cli::GitCli;
pub use types::{CommitRecord, FileDelta, HistoryEntry};

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Remote consulted for default branches, remote-only bases and the repo URL.
pub const DEFAULT_REMOTE: &str = "origin";

#[derive(Debug, Error)]
pub enum GitError {
    #[error("Not a git repository: {}", .0.display())]
    NotAGitRepository(PathBuf),

    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    #[error("`git {command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Failed to run git: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only queries against a local repository.
///
/// Ranges follow git semantics: `log_range` lists `base..head`, the
/// `diff_*` methods compare `base...head` (against the merge base).
#[async_trait]
pub trait Repository: Send + Sync {
    /// Symbolic name of HEAD (e.g., "feature/login").
    async fn current_branch(&self) -> Result<String, GitError>;

    /// Whether `rev` names an existing commit.
    async fn verify_revision(&self, rev: &str) -> Result<bool, GitError>;

    /// Commits reachable from `head` but not `base`, newest first.
    async fn log_range(&self, base: &str, head: &str) -> Result<Vec<CommitRecord>, GitError>;

    async fn diff_numstat(&self, base: &str, head: &str) -> Result<Vec<FileDelta>, GitError>;

    async fn diff_stat(&self, base: &str, head: &str) -> Result<String, GitError>;

    async fn diff_full(&self, base: &str, head: &str) -> Result<String, GitError>;

    /// Authors of every commit touching `path`, following renames.
    async fn file_history(&self, path: &str) -> Result<Vec<HistoryEntry>, GitError>;

    async fn local_branches(&self) -> Result<Vec<String>, GitError>;

    /// Remote-tracking branches in `remote/name` form.
    async fn remote_branches(&self) -> Result<Vec<String>, GitError>;

    /// Branch the remote's HEAD points at, if the remote advertises one.
    async fn remote_default_branch(&self) -> Result<Option<String>, GitError>;

    async fn remote_url(&self, remote: &str) -> Result<String, GitError>;
}

/// Repository handle for one invocation chain, plus the configured
/// base-branch override (config file or environment).
pub struct RepoContext {
    repo: Box<dyn Repository>,
    configured_base: Option<String>,
}

impl RepoContext {
    pub fn new(repo: impl Repository + 'static, configured_base: Option<String>) -> Self {
        Self {
            repo: Box::new(repo),
            configured_base,
        }
    }

    pub fn repo(&self) -> &dyn Repository {
        self.repo.as_ref()
    }

    /// Base branch for this invocation: the explicit argument when given,
    /// otherwise the resolver's answer.
    pub async fn base_branch(&self, explicit: Option<&str>) -> Result<String, GitError> {
        match explicit.map(str::trim).filter(|b| !b.is_empty()) {
            Some(base) => Ok(base.to_string()),
            None => base::resolve_base_branch(self.repo(), self.configured_base.as_deref()).await,
        }
    }

    /// Map a branch name to a revision usable in a range, accepting
    /// branches that only exist on the default remote.
    pub async fn resolve_revision(&self, name: &str) -> Result<String, GitError> {
        if self.repo.verify_revision(name).await? {
            return Ok(name.to_string());
        }
        let remote_ref = format!("{DEFAULT_REMOTE}/{name}");
        if self.repo.verify_revision(&remote_ref).await? {
            debug!(branch = %name, revision = %remote_ref, "using remote-tracking branch");
            return Ok(remote_ref);
        }
        Err(GitError::RevisionNotFound(name.to_string()))
    }
}
