pub mod types;
pub mod username;

pub use types::{ReviewerCandidate, ReviewerReport, ReviewerSuggestion};
pub use username::resolve_username;

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use crate::analysis::{self, ChangeSummary};
use crate::git::{HistoryEntry, RepoContext};

/// Only the first files of the diff are sampled for history.
pub const MAX_FILES_SAMPLED: usize = 10;

pub const NO_FILES_BASIS: &str = "No files were modified in this branch";

/// Rank probable reviewers for the current branch from the history of the
/// files it touches. Never fails: problems are reported in `error`.
#[instrument(skip(ctx))]
pub async fn suggest_reviewers(
    ctx: &RepoContext,
    limit: usize,
    base_override: Option<&str>,
) -> ReviewerReport {
    let summary = match analysis::analyze(ctx, base_override, false).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(error = %e, "reviewer resolution could not analyze branch");
            return ReviewerReport::degraded("Unable to analyze branch changes", e.to_string());
        }
    };
    suggest_reviewers_for(ctx, &summary, limit).await
}

/// Rank reviewers for a branch that has already been analyzed.
#[instrument(skip(ctx, summary), fields(files = summary.files.len()))]
pub async fn suggest_reviewers_for(
    ctx: &RepoContext,
    summary: &ChangeSummary,
    limit: usize,
) -> ReviewerReport {
    if summary.files.is_empty() {
        return ReviewerReport::degraded(
            NO_FILES_BASIS,
            format!(
                "No changed files between {} and {}, so there is no history to suggest reviewers from",
                summary.base_branch, summary.current_branch
            ),
        );
    }

    let sampled: Vec<&str> = summary
        .file_paths()
        .into_iter()
        .take(MAX_FILES_SAMPLED)
        .collect();

    let mut histories = Vec::with_capacity(sampled.len());
    for path in &sampled {
        match ctx.repo().file_history(path).await {
            Ok(history) => histories.push(history),
            Err(e) => warn!(path = %path, error = %e, "skipping file history"),
        }
    }

    let total_commits: usize = histories.iter().map(Vec::len).sum();
    let based_on = format!(
        "Analyzed {} {} across {} {}",
        total_commits,
        plural(total_commits, "commit"),
        sampled.len(),
        plural(sampled.len(), "file")
    );

    if total_commits == 0 {
        return ReviewerReport::degraded(
            based_on,
            format!(
                "No commit history found for the {} modified {}; they are likely new files",
                sampled.len(),
                plural(sampled.len(), "file")
            ),
        );
    }

    let candidates = rank_contributors(&histories, limit);
    debug!(candidates = candidates.len(), "ranked contributors");

    let suggestions: Vec<ReviewerSuggestion> = candidates
        .into_iter()
        .map(|c| ReviewerSuggestion {
            author: resolve_username(&c.email, &c.display_name),
            contributions: c.contribution_count,
            reason: format!(
                "{} {} to the modified files ({})",
                c.contribution_count,
                plural(c.contribution_count, "commit"),
                c.email
            ),
        })
        .collect();

    info!(suggestions = suggestions.len(), "suggested reviewers");
    ReviewerReport {
        suggestions,
        based_on,
        error: None,
    }
}

/// Count commits per exact (name, email) pair, then keep the `limit` most
/// active, ties in first-seen order.
pub fn rank_contributors(histories: &[Vec<HistoryEntry>], limit: usize) -> Vec<ReviewerCandidate> {
    let mut candidates: Vec<ReviewerCandidate> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for entry in histories.iter().flatten() {
        let (name, email) = (entry.author_name.as_str(), entry.author_email.as_str());
        if name.is_empty() || email.is_empty() {
            continue;
        }
        match index.get(&(name, email)) {
            Some(&i) => candidates[i].contribution_count += 1,
            None => {
                index.insert((name, email), candidates.len());
                candidates.push(ReviewerCandidate {
                    display_name: name.to_string(),
                    email: email.to_string(),
                    contribution_count: 1,
                });
            }
        }
    }

    candidates.sort_by(|a, b| b.contribution_count.cmp(&a.contribution_count));
    candidates.truncate(limit);
    candidates
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
