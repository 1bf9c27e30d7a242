pub mod types;

pub use types::{PrAction, PrLifecycleResult, PrOptions, ReviewerAssignment};

use std::cmp::Reverse;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::analysis::{self, AnalysisError, ChangeSummary};
use crate::git::{GitError, RepoContext, DEFAULT_REMOTE};
use crate::github::{
    self, GitHubError, HostingApi, NewPullRequest, PrState, PullRequest, PullRequestUpdate,
    RemoteRepo,
};
use crate::reviewers;
use crate::template;
use crate::title;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub token not found. Pass --token, set github.token in .prflow.toml, or export GITHUB_TOKEN")]
    MissingCredential,

    #[error("Cannot determine the GitHub repository from remote URL: {0}")]
    InvalidRemoteUrl(String),

    #[error("Branch '{branch}' does not exist on the remote. Push it first: {push_command}")]
    BranchNotOnRemote { branch: String, push_command: String },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),
}

/// Create the pull request for the current branch, or update (and reopen)
/// the one that already exists. Reviewer assignment problems are reported
/// in the result and never fail the call.
///
/// `connect` opens the hosting API session once the remote and token are
/// known.
#[instrument(skip_all)]
pub async fn create_or_update_pr<F>(
    ctx: &RepoContext,
    options: &PrOptions,
    connect: F,
) -> Result<PrLifecycleResult, PrError>
where
    F: FnOnce(&RemoteRepo, &str) -> Result<Box<dyn HostingApi>, GitHubError>,
{
    let token = options
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(PrError::MissingCredential)?;

    let repo = ctx.repo();
    let remote_url = repo.remote_url(DEFAULT_REMOTE).await?;
    let remote = github::parse_remote_url(&remote_url)
        .ok_or_else(|| PrError::InvalidRemoteUrl(remote_url.clone()))?;

    let current_branch = repo.current_branch().await?;
    let base_branch = ctx.base_branch(options.base_branch.as_deref()).await?;
    info!(remote = %remote, head = %current_branch, base = %base_branch, "preparing pull request");

    let api = connect(&remote, token)?;

    match api.get_branch(&remote, &current_branch).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            return Err(PrError::BranchNotOnRemote {
                push_command: format!("git push -u {DEFAULT_REMOTE} {current_branch}"),
                branch: current_branch,
            });
        }
        Err(e) => return Err(e.into()),
    }

    let summary = analysis::analyze(ctx, Some(&base_branch), true).await?;

    let title = match options.title.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(title) => title.to_string(),
        None => title::title_for(&summary, options.max_title_length).rendered,
    };

    let review = options.review.as_deref().filter(|r| !r.trim().is_empty());
    let body = match options.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(description) => match review {
            Some(review) => template::splice_review(description, review, false),
            None => description.to_string(),
        },
        None => {
            let rendered = template::render_description(&summary, &title, &options.template);
            match review {
                Some(review) => template::splice_review(&rendered, review, true),
                None => rendered,
            }
        }
    };

    let head = format!("{}:{}", remote.owner, current_branch);
    let existing = api.list_pull_requests(&remote, &head, &base_branch).await?;
    let canonical = select_existing(&existing);

    let (pr, action) = match canonical {
        None => {
            let new_pr = NewPullRequest {
                title: title.clone(),
                head: current_branch.clone(),
                base: base_branch.clone(),
                body,
                draft: options.draft,
            };
            (api.create_pull_request(&remote, &new_pr).await?, PrAction::Created)
        }
        Some(found) => {
            let reopen = found.state == PrState::Closed;
            let update = PullRequestUpdate {
                title: Some(title.clone()),
                body: Some(body),
                state: reopen.then_some(PrState::Open),
            };
            let pr = api.update_pull_request(&remote, found.number, &update).await?;
            let action = if reopen {
                PrAction::Reopened
            } else {
                PrAction::Updated
            };
            (pr, action)
        }
    };
    info!(number = pr.number, action = %action, url = %pr.html_url, "pull request ready");

    let assignment = if options.assign_reviewers {
        assign_reviewers(ctx, &summary, api.as_ref(), &remote, &pr, options.reviewer_limit).await
    } else {
        ReviewerAssignment::Disabled
    };

    Ok(PrLifecycleResult {
        url: pr.html_url,
        number: pr.number,
        title,
        state: pr.state,
        action,
        reviewers_added: assignment.added().to_vec(),
        reviewers_requested: assignment.requested(),
        reviewer_note: assignment.note().map(str::to_string),
    })
}

/// Pick the pull request to update among those matching head and base.
/// Merged ones cannot be reopened and are ignored; open beats closed,
/// then the most recently updated wins.
pub fn select_existing(pulls: &[PullRequest]) -> Option<&PullRequest> {
    pulls
        .iter()
        .filter(|pr| pr.merged_at.is_none())
        .min_by_key(|pr| (pr.state != PrState::Open, Reverse(pr.updated_at)))
}

/// Suggest reviewers, drop the caller and request the rest.
async fn assign_reviewers(
    ctx: &RepoContext,
    summary: &ChangeSummary,
    api: &dyn HostingApi,
    remote: &RemoteRepo,
    pr: &PullRequest,
    limit: usize,
) -> ReviewerAssignment {
    let report = reviewers::suggest_reviewers_for(ctx, summary, limit).await;
    if report.suggestions.is_empty() {
        let reason = match report.error {
            Some(error) => format!("No reviewers suggested: {error}"),
            None => "No reviewers suggested".to_string(),
        };
        return degraded(Vec::new(), 0, reason);
    }

    let caller = match api.authenticated_user().await {
        Ok(user) => Some(user.login),
        Err(e) => {
            warn!(error = %e, "could not identify the authenticated user");
            None
        }
    };

    let candidates = exclude_caller(
        report.suggestions.into_iter().map(|s| s.author),
        caller.as_deref(),
    );
    if candidates.is_empty() {
        return degraded(
            Vec::new(),
            0,
            "No reviewers to request: the only suggested reviewer is you".to_string(),
        );
    }
    debug!(candidates = ?candidates, "requesting reviewers");

    let accepted_by_remote = match api.request_reviewers(remote, pr.number, &candidates).await {
        Ok(updated) => updated.requested_reviewers,
        Err(e) => {
            return degraded(
                Vec::new(),
                candidates.len(),
                format!("Reviewer request for {} failed: {e}", candidates.join(", ")),
            );
        }
    };

    let (added, rejected): (Vec<String>, Vec<String>) = candidates.iter().cloned().partition(|c| {
        accepted_by_remote
            .iter()
            .any(|u| u.login.eq_ignore_ascii_case(c))
    });

    if rejected.is_empty() {
        info!(reviewers = ?added, "reviewers assigned");
        return ReviewerAssignment::Assigned { added };
    }

    let reason = format!(
        "Requested {} reviewer(s) but only {} accepted; not accepted: {} (usernames are guessed from commit emails)",
        candidates.len(),
        added.len(),
        rejected.join(", ")
    );
    degraded(added, candidates.len(), reason)
}

/// Candidates without the caller (case-insensitive) or repeats.
fn exclude_caller(candidates: impl Iterator<Item = String>, caller: Option<&str>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for candidate in candidates {
        let is_caller = caller.is_some_and(|c| c.eq_ignore_ascii_case(&candidate));
        let seen = kept.iter().any(|k| k.eq_ignore_ascii_case(&candidate));
        if !is_caller && !seen {
            kept.push(candidate);
        }
    }
    kept
}

fn degraded(added: Vec<String>, requested: usize, reason: String) -> ReviewerAssignment {
    warn!(reason = %reason, "reviewer assignment incomplete");
    ReviewerAssignment::Degraded {
        added,
        requested,
        reason,
    }
}
