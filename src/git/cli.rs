use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::DateTime;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::{CommitRecord, FileDelta, GitError, HistoryEntry, Repository, DEFAULT_REMOTE};

const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';

/// `git log` format: hash, subject, author name, author email, ISO date.
const LOG_FORMAT: &str = "--format=%h%x1f%s%x1f%an%x1f%ae%x1f%aI%x1e";

/// Repository access backed by the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Resolve the top-level directory of the repository containing `dir`.
    #[instrument]
    pub async fn open(dir: &Path) -> Result<Self, GitError> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(dir)
            .output()
            .await?;

        if !output.status.success() {
            return Err(GitError::NotAGitRepository(dir.to_path_buf()));
        }

        let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        debug!(root = %root.display(), "opened repository");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.output(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure(&self.root, args, stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a command whose non-zero exit is an answer, not an error.
    async fn run_optional(&self, args: &[&str]) -> Result<Option<String>, GitError> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }

    async fn output(&self, args: &[&str]) -> Result<std::process::Output, GitError> {
        debug!(args = ?args, "running git");
        Ok(Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .await?)
    }
}

fn classify_failure(root: &Path, args: &[&str], stderr: String) -> GitError {
    if stderr.contains("not a git repository") {
        return GitError::NotAGitRepository(root.to_path_buf());
    }
    if stderr.contains("unknown revision") || stderr.contains("bad revision") {
        let rev = args
            .iter()
            .find(|a| a.contains(".."))
            .or_else(|| args.last())
            .copied()
            .unwrap_or_default();
        return GitError::RevisionNotFound(rev.to_string());
    }
    GitError::CommandFailed {
        command: args.join(" "),
        stderr,
    }
}

#[async_trait]
impl Repository for GitCli {
    async fn current_branch(&self) -> Result<String, GitError> {
        Ok(self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await?.trim().to_string())
    }

    async fn verify_revision(&self, rev: &str) -> Result<bool, GitError> {
        let spec = format!("{rev}^{{commit}}");
        Ok(self
            .run_optional(&["rev-parse", "--verify", "--quiet", &spec])
            .await?
            .is_some())
    }

    async fn log_range(&self, base: &str, head: &str) -> Result<Vec<CommitRecord>, GitError> {
        let range = format!("{base}..{head}");
        let out = self.run(&["log", LOG_FORMAT, &range]).await?;
        Ok(parse_log(&out))
    }

    async fn diff_numstat(&self, base: &str, head: &str) -> Result<Vec<FileDelta>, GitError> {
        let range = format!("{base}...{head}");
        let out = self.run(&["diff", "--numstat", "-z", &range]).await?;
        Ok(parse_numstat(&out))
    }

    async fn diff_stat(&self, base: &str, head: &str) -> Result<String, GitError> {
        let range = format!("{base}...{head}");
        self.run(&["diff", "--stat", &range]).await
    }

    async fn diff_full(&self, base: &str, head: &str) -> Result<String, GitError> {
        let range = format!("{base}...{head}");
        self.run(&["diff", &range]).await
    }

    async fn file_history(&self, path: &str) -> Result<Vec<HistoryEntry>, GitError> {
        let out = self
            .run(&["log", "--follow", "--format=%an%x1f%ae", "--", path])
            .await?;
        Ok(parse_history(&out))
    }

    async fn local_branches(&self) -> Result<Vec<String>, GitError> {
        let out = self
            .run(&["branch", "--list", "--format=%(refname:short)"])
            .await?;
        Ok(parse_branch_list(&out))
    }

    async fn remote_branches(&self) -> Result<Vec<String>, GitError> {
        let out = self
            .run(&["branch", "--remotes", "--format=%(refname:short)"])
            .await?;
        Ok(parse_branch_list(&out)
            .into_iter()
            .filter(|b| b.contains('/') && !b.ends_with("/HEAD"))
            .collect())
    }

    async fn remote_default_branch(&self) -> Result<Option<String>, GitError> {
        let head_ref = format!("refs/remotes/{DEFAULT_REMOTE}/HEAD");
        let out = self
            .run_optional(&["symbolic-ref", "--quiet", "--short", &head_ref])
            .await?;
        Ok(out.as_deref().and_then(strip_remote_prefix))
    }

    async fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        Ok(self.run(&["remote", "get-url", remote]).await?.trim().to_string())
    }
}

/// Parse `git log` output produced with [`LOG_FORMAT`].
pub fn parse_log(output: &str) -> Vec<CommitRecord> {
    output
        .split(RECORD_SEP)
        .map(str::trim)
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let fields: Vec<&str> = record.split(FIELD_SEP).collect();
            let [hash, message, name, email, date] = fields.as_slice() else {
                debug!(record = %record, "skipping malformed log record");
                return None;
            };
            let date = DateTime::parse_from_rfc3339(date).ok()?;
            Some(CommitRecord {
                short_hash: hash.to_string(),
                message: message.to_string(),
                author_name: name.to_string(),
                author_email: Some(email.to_string()).filter(|e| !e.is_empty()),
                date,
            })
        })
        .collect()
}

/// Parse `git diff --numstat -z`. Binary files (`-\t-`) count as zero.
///
/// Renames come out as `ins\tdel\t\0old\0new\0`; the new path is kept so
/// later history lookups can follow it back.
pub fn parse_numstat(output: &str) -> Vec<FileDelta> {
    let mut files = Vec::new();
    let mut tokens = output.split('\0');

    while let Some(record) = tokens.next() {
        let record = record.trim_start_matches('\n');
        if record.is_empty() {
            continue;
        }
        let mut parts = record.splitn(3, '\t');
        let (Some(insertions), Some(deletions), Some(path)) = (parts.next(), parts.next(), parts.next())
        else {
            debug!(record = %record, "skipping malformed numstat record");
            continue;
        };

        let path = if path.is_empty() {
            let _old = tokens.next();
            match tokens.next() {
                Some(new) if !new.is_empty() => new,
                _ => continue,
            }
        } else {
            path
        };

        files.push(FileDelta::new(
            path,
            insertions.parse().unwrap_or(0),
            deletions.parse().unwrap_or(0),
        ));
    }
    files
}

pub fn parse_history(output: &str) -> Vec<HistoryEntry> {
    output
        .lines()
        .filter_map(|line| {
            let (name, email) = line.split_once(FIELD_SEP)?;
            Some(HistoryEntry::new(name.trim(), email.trim()))
        })
        .collect()
}

fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_remote_prefix(short_ref: &str) -> Option<String> {
    let branch = short_ref
        .strip_prefix(&format!("{DEFAULT_REMOTE}/"))
        .unwrap_or(short_ref);
    Some(branch.to_string()).filter(|b| !b.is_empty())
}
