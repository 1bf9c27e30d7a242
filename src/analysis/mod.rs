pub mod types;

pub use types::{ChangeSummary, CommitTag};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::git::{FileDelta, GitError, RepoContext};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to analyze branch changes: {0}")]
    Git(#[from] GitError),
}

/// Leading words checked in order; the first match classifies the commit.
const COMMIT_TAG_PREFIXES: [(&str, CommitTag); 5] = [
    ("fix", CommitTag::Fix),
    ("feat", CommitTag::Feat),
    ("refactor", CommitTag::Refactor),
    ("docs", CommitTag::Docs),
    ("test", CommitTag::Test),
];

pub const BREAKING_CHANGE_MARKER: &str = "BREAKING CHANGE";

/// Classify a commit message by its (case-insensitive) leading word.
pub fn classify_commit(message: &str) -> CommitTag {
    let lowered = message.to_lowercase();
    COMMIT_TAG_PREFIXES
        .iter()
        .find(|(prefix, _)| lowered.starts_with(prefix))
        .map(|(_, tag)| *tag)
        .unwrap_or(CommitTag::Other)
}

pub fn has_breaking_change(diff: &str) -> bool {
    diff.contains(BREAKING_CHANGE_MARKER)
}

/// Crude on purpose: any path containing "test" or "spec" counts.
pub fn touches_tests(files: &[FileDelta]) -> bool {
    files
        .iter()
        .any(|f| f.path.contains("test") || f.path.contains("spec"))
}

/// Summarize how the current branch diverges from its base.
///
/// `detailed` additionally reads the full diff to set
/// `has_breaking_change` and `has_tests`.
#[instrument(skip(ctx))]
pub async fn analyze(
    ctx: &RepoContext,
    base_override: Option<&str>,
    detailed: bool,
) -> Result<ChangeSummary, AnalysisError> {
    let repo = ctx.repo();
    let base_branch = ctx.base_branch(base_override).await?;
    let current_branch = repo.current_branch().await?;
    debug!(base = %base_branch, current = %current_branch, "resolved branches");

    let base_rev = ctx.resolve_revision(&base_branch).await?;
    let head_rev = ctx.resolve_revision(&current_branch).await?;

    let commits = repo.log_range(&base_rev, &head_rev).await?;
    let files = repo.diff_numstat(&base_rev, &head_rev).await?;
    let raw_diff_stat = repo.diff_stat(&base_rev, &head_rev).await?;

    let mut summary = ChangeSummary::new(current_branch, base_branch, commits, files, raw_diff_stat);

    if detailed {
        let diff = repo.diff_full(&base_rev, &head_rev).await?;
        summary.has_breaking_change = Some(has_breaking_change(&diff));
        summary.has_tests = Some(touches_tests(&summary.files));
    }

    info!(
        commits = summary.total_commits,
        files = summary.files_changed,
        insertions = summary.insertions,
        deletions = summary.deletions,
        "analyzed branch"
    );
    Ok(summary)
}
