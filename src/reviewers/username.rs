//! Guess a hosting-platform login from a commit author identity.
//!
//! The guess is never validated against the hosting API; callers must be
//! ready for the remote to reject it.

use std::sync::LazyLock;

use regex::Regex;

/// `[digits+]login@users.noreply.<host>`
static NOREPLY_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\d+\+)?([^@+]+)@users\.noreply\.[^@]+$").expect("valid noreply pattern")
});

static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid separator pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

const MIN_GUESS_LEN: usize = 3;

/// Resolve a probable username, trying each rule in priority order.
pub fn resolve_username(email: &str, name: &str) -> String {
    from_noreply(email)
        .or_else(|| from_local_part_stripped(email))
        .or_else(|| from_local_part_hyphenated(email))
        .or_else(|| from_name_compact(name))
        .unwrap_or_else(|| from_name_hyphenated(name))
}

fn from_noreply(email: &str) -> Option<String> {
    NOREPLY_EMAIL
        .captures(email.trim())
        .map(|caps| caps[1].to_string())
}

fn local_part(email: &str) -> Option<&str> {
    email
        .trim()
        .split_once('@')
        .map(|(local, _)| local)
        .filter(|local| !local.is_empty())
}

fn from_local_part_stripped(email: &str) -> Option<String> {
    let stripped: String = local_part(email)?
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();
    (stripped.len() >= MIN_GUESS_LEN).then_some(stripped)
}

fn from_local_part_hyphenated(email: &str) -> Option<String> {
    let hyphenated = NON_ALNUM_RUN
        .replace_all(local_part(email)?, "-")
        .to_lowercase();
    Some(hyphenated).filter(|h| !h.is_empty())
}

fn from_name_compact(name: &str) -> Option<String> {
    let compact: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    (compact.chars().count() >= MIN_GUESS_LEN).then_some(compact)
}

fn from_name_hyphenated(name: &str) -> String {
    WHITESPACE_RUN.replace_all(name.trim(), "-").to_lowercase()
}
