use serde::Serialize;

use crate::github::PrState;
use crate::template::TemplateOptions;

/// Inputs for one create-or-update run.
#[derive(Debug, Clone)]
pub struct PrOptions {
    /// Base branch; resolved from the repository when absent
    pub base_branch: Option<String>,
    pub template: TemplateOptions,
    pub max_title_length: Option<usize>,
    /// Used verbatim when present
    pub title: Option<String>,
    /// Used verbatim when present
    pub description: Option<String>,
    /// Review text added as its own section of the description
    pub review: Option<String>,
    pub draft: bool,
    pub token: Option<String>,
    pub assign_reviewers: bool,
    pub reviewer_limit: usize,
}

impl Default for PrOptions {
    fn default() -> Self {
        Self {
            base_branch: None,
            template: TemplateOptions::default(),
            max_title_length: None,
            title: None,
            description: None,
            review: None,
            draft: false,
            token: None,
            assign_reviewers: true,
            reviewer_limit: 3,
        }
    }
}

/// What happened to the pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrAction {
    Created,
    Updated,
    Reopened,
}

impl std::fmt::Display for PrAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrAction::Created => write!(f, "created"),
            PrAction::Updated => write!(f, "updated"),
            PrAction::Reopened => write!(f, "reopened"),
        }
    }
}

/// Outcome of the reviewer step. Never an error: anything short of full
/// success is `Degraded` with the reason spelled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewerAssignment {
    /// Assignment was not requested
    Disabled,
    /// Every requested reviewer was accepted
    Assigned { added: Vec<String> },
    Degraded {
        added: Vec<String>,
        requested: usize,
        reason: String,
    },
}

impl ReviewerAssignment {
    pub fn added(&self) -> &[String] {
        match self {
            ReviewerAssignment::Disabled => &[],
            ReviewerAssignment::Assigned { added } | ReviewerAssignment::Degraded { added, .. } => added,
        }
    }

    pub fn requested(&self) -> usize {
        match self {
            ReviewerAssignment::Disabled => 0,
            ReviewerAssignment::Assigned { added } => added.len(),
            ReviewerAssignment::Degraded { requested, .. } => *requested,
        }
    }

    pub fn note(&self) -> Option<&str> {
        match self {
            ReviewerAssignment::Degraded { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrLifecycleResult {
    pub url: String,
    pub number: u64,
    pub title: String,
    pub state: PrState,
    pub action: PrAction,
    pub reviewers_added: Vec<String>,
    pub reviewers_requested: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_note: Option<String>,
}
