use regex::Regex;
use std::sync::LazyLock;

/// Conventional prefixes and the marker that replaces them, checked in
/// order. Only the first matching rule is applied.
static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)^feat(?:ure)?(?:\([^)]*\))?!?:\s*", "✨"),
        (r"(?i)^fix(?:\([^)]*\))?!?:\s*", "🐛"),
        (r"(?i)^docs?(?:\([^)]*\))?!?:\s*", "📝"),
        (r"(?i)^refactor(?:\([^)]*\))?!?:\s*", "♻️"),
        (r"(?i)^tests?(?:\([^)]*\))?!?:\s*", "✅"),
        (r"(?i)^perf(?:\([^)]*\))?!?:\s*", "⚡"),
        (r"(?i)^chore(?:\([^)]*\))?!?:\s*", "🔧"),
    ]
    .into_iter()
    .map(|(pattern, marker)| (Regex::new(pattern).expect("valid humanize pattern"), marker))
    .collect()
});

/// Turn a commit subject into a changelog line: the conventional prefix
/// becomes an emoji and the remainder is capitalized.
pub fn humanize_commit(message: &str) -> String {
    let message = message.lines().next().unwrap_or_default().trim();

    for (pattern, marker) in RULES.iter() {
        if let Some(found) = pattern.find(message) {
            let rest = capitalize(message[found.end()..].trim());
            return if rest.is_empty() {
                marker.to_string()
            } else {
                format!("{marker} {rest}")
            };
        }
    }

    capitalize(message)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
