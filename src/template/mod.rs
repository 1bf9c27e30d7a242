pub mod headings;
pub mod humanize;

pub use humanize::humanize_commit;

use clap::ValueEnum;
use tracing::debug;

use crate::analysis::ChangeSummary;

/// Where illustrative media starts in a rendered description. Review
/// sections are spliced in just before it.
pub const MEDIA_MARKER: &str = "<!-- prflow:media -->";

pub const REVIEW_START: &str = "<!-- prflow:review:start -->";
pub const REVIEW_END: &str = "<!-- prflow:review:end -->";

/// Layout of a generated pull request description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TemplateStyle {
    /// Summary, commit list and statistics
    #[default]
    Standard,
    /// Summary and commit list only
    Minimal,
    /// Standard plus changed files and notes
    Detailed,
}

#[derive(Debug, Clone)]
pub struct TemplateOptions {
    pub style: TemplateStyle,
    /// Language tag for headings (en, es, fr, de)
    pub language: String,
    pub include_stats: bool,
    /// Image or recording shown under the media marker
    pub media_url: Option<String>,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            style: TemplateStyle::Standard,
            language: "en".to_string(),
            include_stats: true,
            media_url: None,
        }
    }
}

/// Render a markdown description for a branch.
pub fn render_description(summary: &ChangeSummary, title: &str, options: &TemplateOptions) -> String {
    let h = headings::for_language(&options.language);
    let mut md = String::new();

    md.push_str(&format!("## {}\n\n{title}\n\n", h.summary));
    md.push_str(&format!(
        "{} `{}` → `{}`\n\n",
        h.merges, summary.current_branch, summary.base_branch
    ));

    md.push_str(&format!("## {}\n\n", h.changes));
    if summary.commits.is_empty() {
        md.push_str(&format!("_{}_\n", h.no_commits));
    }
    for commit in &summary.commits {
        md.push_str(&format!(
            "- {} (`{}`)\n",
            humanize_commit(&commit.message),
            commit.short_hash
        ));
    }

    if options.style != TemplateStyle::Minimal && options.include_stats {
        md.push_str(&format!("\n## {}\n\n", h.statistics));
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n|---|---|---|---|\n",
            h.commits, h.files_changed, h.insertions, h.deletions
        ));
        md.push_str(&format!(
            "| {} | {} | +{} | -{} |\n",
            summary.total_commits, summary.files_changed, summary.insertions, summary.deletions
        ));
    }

    if options.style == TemplateStyle::Detailed {
        if !summary.files.is_empty() {
            md.push_str(&format!("\n## {}\n\n", h.files));
            for file in &summary.files {
                md.push_str(&format!(
                    "- `{}` (+{} -{})\n",
                    file.path, file.insertions, file.deletions
                ));
            }
        }

        let mut notes = Vec::new();
        if summary.has_breaking_change == Some(true) {
            notes.push(format!("⚠️ {}", h.breaking_change));
        }
        match summary.has_tests {
            Some(true) => notes.push(format!("✅ {}", h.includes_tests)),
            Some(false) => notes.push(h.no_tests.to_string()),
            None => {}
        }
        if !notes.is_empty() {
            md.push_str(&format!("\n## {}\n\n", h.notes));
            for note in notes {
                md.push_str(&format!("- {note}\n"));
            }
        }
    }

    if let Some(url) = options.media_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        md.push_str(&format!("\n{MEDIA_MARKER}\n## {}\n\n![{}]({url})\n", h.media, h.media));
    }

    debug!(style = ?options.style, language = %options.language, len = md.len(), "rendered description");
    md.trim_end().to_string()
}

/// A caller-supplied review wrapped in delimiters so it can be found again.
pub fn review_section(review: &str) -> String {
    format!("{REVIEW_START}\n## Review\n\n{}\n{REVIEW_END}", review.trim())
}

/// Add a review section to `description`. When `spliceable`, the section
/// goes right before the media marker if there is one; otherwise, and
/// always for caller-written descriptions, it is appended.
pub fn splice_review(description: &str, review: &str, spliceable: bool) -> String {
    let section = review_section(review);
    if spliceable {
        if let Some(at) = description.find(MEDIA_MARKER) {
            let (before, after) = description.split_at(at);
            return format!("{}\n\n{section}\n\n{after}", before.trim_end());
        }
    }
    append_review(description, &section)
}

fn append_review(description: &str, section: &str) -> String {
    let description = description.trim_end();
    if description.is_empty() {
        section.to_string()
    } else {
        format!("{description}\n\n{section}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::commit;
    use crate::git::FileDelta;

    fn summary() -> ChangeSummary {
        let mut summary = ChangeSummary::new(
            "feature/login".into(),
            "main".into(),
            vec![commit(0, "feat(auth): add OAuth"), commit(1, "fix: token refresh")],
            vec![FileDelta::new("src/auth.rs", 10, 2), FileDelta::new("tests/auth_test.rs", 5, 0)],
            String::new(),
        );
        summary.has_breaking_change = Some(true);
        summary.has_tests = Some(true);
        summary
    }

    #[test]
    fn test_standard_description() {
        let body = render_description(&summary(), "feat(auth): add OAuth", &TemplateOptions::default());
        assert!(body.starts_with("## Summary\n\nfeat(auth): add OAuth"));
        assert!(body.contains("`feature/login` → `main`"));
        assert!(body.contains("- ✨ Add OAuth (`abc0000`)"));
        assert!(body.contains("- 🐛 Token refresh (`abc0001`)"));
        assert!(body.contains("| 2 | 2 | +15 | -2 |"));
        assert!(!body.contains("## Files changed"));
        assert!(!body.contains(MEDIA_MARKER));
    }

    #[test]
    fn test_minimal_description_has_no_stats() {
        let options = TemplateOptions {
            style: TemplateStyle::Minimal,
            ..Default::default()
        };
        let body = render_description(&summary(), "t", &options);
        assert!(!body.contains("## Statistics"));
        assert!(body.contains("## Changes"));
    }

    #[test]
    fn test_detailed_description_lists_files_and_notes() {
        let options = TemplateOptions {
            style: TemplateStyle::Detailed,
            include_stats: false,
            ..Default::default()
        };
        let body = render_description(&summary(), "t", &options);
        assert!(!body.contains("## Statistics"));
        assert!(body.contains("- `src/auth.rs` (+10 -2)"));
        assert!(body.contains("Contains a breaking change"));
        assert!(body.contains("Includes test changes"));
    }

    #[test]
    fn test_localized_headings() {
        let options = TemplateOptions {
            language: "de".into(),
            ..Default::default()
        };
        let body = render_description(&summary(), "t", &options);
        assert!(body.starts_with("## Zusammenfassung"));
        assert!(body.contains("## Änderungen"));
    }

    #[test]
    fn test_empty_branch_description() {
        let empty = ChangeSummary::new("f".into(), "main".into(), vec![], vec![], String::new());
        let body = render_description(&empty, "chore: update", &TemplateOptions::default());
        assert!(body.contains("_No commits yet_"));
    }

    #[test]
    fn test_review_spliced_before_media() {
        let options = TemplateOptions {
            media_url: Some("https://example.com/demo.gif".into()),
            ..Default::default()
        };
        let body = render_description(&summary(), "t", &options);
        let spliced = splice_review(&body, "Looks good.", true);

        let review_at = spliced.find(REVIEW_START).unwrap();
        let media_at = spliced.find(MEDIA_MARKER).unwrap();
        assert!(review_at < media_at);
        assert!(spliced.contains("Looks good."));
        assert!(spliced.trim_end().ends_with("(https://example.com/demo.gif)"));
    }

    #[test]
    fn test_review_appended_without_marker() {
        let spliced = splice_review("Body", "Nice.", true);
        assert_eq!(spliced, format!("Body\n\n{}", review_section("Nice.")));
    }

    #[test]
    fn test_caller_description_is_never_spliced() {
        let description = format!("Intro\n\n{MEDIA_MARKER}\n![x](y)");
        let result = splice_review(&description, "Nice.", false);
        assert!(result.find(REVIEW_START).unwrap() > result.find(MEDIA_MARKER).unwrap());
        assert!(result.ends_with(REVIEW_END));
    }
}
