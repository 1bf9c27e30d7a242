//! Base-branch resolution.
//!
//! Order: explicit override, the remote's symbolic default branch, the
//! first of [`PREFERRED_BASE_BRANCHES`] present locally or on the remote,
//! then [`FALLBACK_BASE_BRANCH`].

use tracing::{debug, instrument, warn};

use super::{GitError, Repository, DEFAULT_REMOTE};

pub const PREFERRED_BASE_BRANCHES: [&str; 3] = ["dev", "main", "master"];

pub const FALLBACK_BASE_BRANCH: &str = "main";

#[instrument(skip(repo))]
pub async fn resolve_base_branch(
    repo: &dyn Repository,
    explicit: Option<&str>,
) -> Result<String, GitError> {
    if let Some(base) = explicit.map(str::trim).filter(|b| !b.is_empty()) {
        debug!(base = %base, "using explicit base branch");
        return Ok(base.to_string());
    }

    match repo.remote_default_branch().await {
        Ok(Some(base)) => {
            debug!(base = %base, "using remote default branch");
            return Ok(base);
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "could not read remote default branch"),
    }

    let local = repo.local_branches().await.unwrap_or_else(|e| {
        warn!(error = %e, "could not list local branches");
        Vec::new()
    });
    let remote = repo.remote_branches().await.unwrap_or_else(|e| {
        warn!(error = %e, "could not list remote branches");
        Vec::new()
    });

    for candidate in PREFERRED_BASE_BRANCHES {
        let remote_name = format!("{DEFAULT_REMOTE}/{candidate}");
        if local.iter().any(|b| b == candidate) || remote.iter().any(|b| *b == remote_name) {
            debug!(base = %candidate, "using preferred base branch");
            return Ok(candidate.to_string());
        }
    }

    debug!(base = FALLBACK_BASE_BRANCH, "falling back to default base branch");
    Ok(FALLBACK_BASE_BRANCH.to_string())
}
