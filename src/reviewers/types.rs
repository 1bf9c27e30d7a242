use serde::Serialize;

/// A commit author aggregated over the sampled file histories.
/// Identity is the exact (name, email) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerCandidate {
    pub display_name: String,
    pub email: String,
    pub contribution_count: usize,
}

/// A probable reviewer, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerSuggestion {
    /// Guessed hosting-platform username
    pub author: String,
    pub contributions: usize,
    pub reason: String,
}

/// Outcome of reviewer resolution. `error` is set when the suggestions
/// are empty because resolution degraded, never because of a panic or a
/// propagated failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerReport {
    pub suggestions: Vec<ReviewerSuggestion>,
    pub based_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReviewerReport {
    pub fn degraded(based_on: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            suggestions: Vec::new(),
            based_on: based_on.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
