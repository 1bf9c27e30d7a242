//! Conventional-commit style PR titles inferred from commits and paths.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::analysis::ChangeSummary;

/// Types recognised as a conventional prefix, in priority order.
pub const CONVENTIONAL_TYPES: [&str; 10] = [
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore",
];

/// Top-level directories whose children name the affected package.
pub const MONOREPO_ROOTS: [&str; 5] = ["packages", "apps", "libs", "modules", "services"];

const REJECTED_SCOPES: [&str; 2] = ["src", "lib"];

const DEFAULT_TYPE: &str = "chore";
const DEFAULT_SUBJECT: &str = "update";
const ELLIPSIS: &str = "...";

/// Fallback keyword pass: (pattern, type), checked in order over all messages.
static KEYWORD_TYPES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)fix|bug", "fix"),
        (r"(?i)feat|feature", "feat"),
        (r"(?i)refactor", "refactor"),
        (r"(?i)test", "test"),
    ]
    .into_iter()
    .map(|(pattern, ty)| (Regex::new(pattern).expect("valid keyword pattern"), ty))
    .collect()
});

static CONVENTIONAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)^({})(\([^)]*\))?!?:", CONVENTIONAL_TYPES.join("|"));
    Regex::new(&pattern).expect("valid conventional prefix pattern")
});

static FEATURE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^feature\b").expect("valid feature pattern"));

/// Any `type(scope)!: ` prefix, stripped from the subject.
static SUBJECT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z]+(\([^)]*\))?!?:\s*").expect("valid subject prefix pattern")
});

static SCOPE_INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("valid scope pattern"));

/// A rendered PR title split into its conventional parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConventionalTitle {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub subject: String,
    pub rendered: String,
}

impl std::fmt::Display for ConventionalTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Infer a title from commit messages (newest first) and changed paths.
pub fn infer_title<S, P>(commit_messages: &[S], file_paths: &[P], max_length: Option<usize>) -> ConventionalTitle
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    let kind = infer_type(commit_messages);
    let scope = infer_scope(file_paths);
    let subject = infer_subject(commit_messages);

    let rendered = match &scope {
        Some(scope) => format!("{kind}({scope}): {subject}"),
        None => format!("{kind}: {subject}"),
    };
    let rendered = match max_length {
        Some(max) => truncate(&rendered, max),
        None => rendered,
    };

    ConventionalTitle {
        kind,
        scope,
        subject,
        rendered,
    }
}

/// Infer a title for an analyzed branch.
pub fn title_for(summary: &ChangeSummary, max_length: Option<usize>) -> ConventionalTitle {
    infer_title(&summary.commit_messages(), &summary.file_paths(), max_length)
}

pub fn infer_type<S: AsRef<str>>(commit_messages: &[S]) -> String {
    for message in commit_messages {
        let message = message.as_ref().trim_start();
        if let Some(caps) = CONVENTIONAL_PREFIX.captures(message) {
            return caps[1].to_lowercase();
        }
        if FEATURE_WORD.is_match(message) {
            return "feat".to_string();
        }
    }

    let messages: Vec<&str> = commit_messages.iter().map(|m| m.as_ref()).collect();
    let all = messages.join("\n");
    KEYWORD_TYPES
        .iter()
        .find(|(pattern, _)| pattern.is_match(&all))
        .map(|(_, ty)| ty.to_string())
        .unwrap_or_else(|| DEFAULT_TYPE.to_string())
}

/// The first path with a directory decides the scope; `src`/`lib` mean none.
pub fn infer_scope<P: AsRef<str>>(file_paths: &[P]) -> Option<String> {
    for path in file_paths {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        if segments.len() < 2 {
            continue;
        }

        let candidate = if MONOREPO_ROOTS.contains(&segments[0]) {
            sanitize_scope(segments[1])
        } else {
            sanitize_scope(segments[0])
        };
        if candidate.is_empty() {
            continue;
        }
        if REJECTED_SCOPES.contains(&candidate.as_str()) {
            return None;
        }
        return Some(candidate);
    }
    None
}

pub fn infer_subject<S: AsRef<str>>(commit_messages: &[S]) -> String {
    let Some(first) = commit_messages.first() else {
        return DEFAULT_SUBJECT.to_string();
    };
    let stripped = SUBJECT_PREFIX.replace(first.as_ref().trim(), "");
    let stripped = stripped.trim();

    let mut chars = stripped.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => DEFAULT_SUBJECT.to_string(),
    }
}

fn sanitize_scope(segment: &str) -> String {
    SCOPE_INVALID_CHARS.replace_all(segment, "").to_lowercase()
}

/// Shorten `rendered` to at most `max` characters, ending in "...".
pub fn truncate(rendered: &str, max: usize) -> String {
    if rendered.chars().count() <= max {
        return rendered.to_string();
    }
    if max < ELLIPSIS.len() {
        return ELLIPSIS[..max].to_string();
    }
    let keep = max - ELLIPSIS.len();
    let head: String = rendered.chars().take(keep).collect();
    format!("{}{ELLIPSIS}", head.trim_end())
}
