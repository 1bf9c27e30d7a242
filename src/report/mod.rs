use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::analysis::ChangeSummary;
use crate::pr::{PrAction, PrLifecycleResult};
use crate::reviewers::ReviewerReport;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pretty JSON for `--json` output.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write a rendered markdown document to `path`.
#[instrument(skip(markdown), fields(path = %path.display(), len = markdown.len()))]
pub fn write_markdown(markdown: &str, path: &Path) -> Result<(), ReportError> {
    debug!("writing markdown file");
    let mut contents = markdown.trim_end().to_string();
    contents.push('\n');
    std::fs::write(path, contents)?;
    Ok(())
}

/// Terminal view of a branch analysis.
///
/// feature/login → main
/// 3 commits | 5 files changed | +120 -14
///
/// ═══ Commits ═══
///   abc1234 feat(auth): add OAuth (Alice)
pub fn render_summary(summary: &ChangeSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{} → {}\n",
        summary.current_branch.bold(),
        summary.base_branch.bold()
    ));
    out.push_str(&format!(
        "{} commits | {} files changed | {} {}\n",
        summary.total_commits,
        summary.files_changed,
        format!("+{}", summary.insertions).green(),
        format!("-{}", summary.deletions).red()
    ));

    if !summary.commit_type_tags.is_empty() {
        let tags: Vec<&str> = summary.commit_type_tags.iter().map(|t| t.as_str()).collect();
        out.push_str(&format!("Types: {}\n", tags.join(", ")));
    }
    if let Some(breaking) = summary.has_breaking_change {
        let value = if breaking { "yes".red().bold() } else { "no".normal() };
        out.push_str(&format!("Breaking change: {value}\n"));
    }
    if let Some(tests) = summary.has_tests {
        let value = if tests { "yes".green() } else { "no".yellow() };
        out.push_str(&format!("Tests touched: {value}\n"));
    }

    out.push_str(&format!("\n═══ {} ═══\n", "Commits".bold()));
    if summary.commits.is_empty() {
        out.push_str("  No commits between the branches.\n");
    }
    for commit in &summary.commits {
        out.push_str(&format!(
            "  {} {} ({})\n",
            commit.short_hash.yellow(),
            commit.message,
            commit.author_name.dimmed()
        ));
    }

    if !summary.files.is_empty() {
        out.push_str(&format!("\n═══ {} ═══\n", "Files".bold()));
        for file in &summary.files {
            out.push_str(&format!(
                "  {} {} {}\n",
                file.path,
                format!("+{}", file.insertions).green(),
                format!("-{}", file.deletions).red()
            ));
        }
    }
    out
}

/// Terminal view of reviewer suggestions.
pub fn render_reviewers(report: &ReviewerReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n═══ {} ═══\n", "Suggested reviewers".bold()));
    out.push_str(&format!("{}\n", report.based_on.dimmed()));

    if report.suggestions.is_empty() {
        out.push_str("  No reviewers found.\n");
    }
    for (rank, suggestion) in report.suggestions.iter().enumerate() {
        out.push_str(&format!(
            "  {}. @{} ({})\n",
            rank + 1,
            suggestion.author.cyan().bold(),
            suggestion.reason
        ));
    }
    if let Some(error) = &report.error {
        out.push_str(&format!("{} {}\n", "warning:".yellow().bold(), error));
    }
    out
}

/// Terminal view of a create-or-update run.
pub fn render_pr_result(result: &PrLifecycleResult) -> String {
    let action = match result.action {
        PrAction::Created => "Created".green().bold(),
        PrAction::Updated => "Updated".cyan().bold(),
        PrAction::Reopened => "Reopened".yellow().bold(),
    };

    let mut out = String::new();
    out.push_str(&format!(
        "\n{action} PR #{}: \"{}\" ({})\n",
        result.number, result.title, result.state
    ));
    out.push_str(&format!("{}\n", result.url.underline()));

    if !result.reviewers_added.is_empty() {
        let added: Vec<String> = result.reviewers_added.iter().map(|r| format!("@{r}")).collect();
        out.push_str(&format!(
            "Reviewers: {} ({} requested)\n",
            added.join(", "),
            result.reviewers_requested
        ));
    }
    if let Some(note) = &result.reviewer_note {
        out.push_str(&format!("{} {}\n", "note:".yellow().bold(), note));
    }
    out
}
