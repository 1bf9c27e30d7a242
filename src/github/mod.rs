pub mod client;
#[cfg(test)]
pub mod fake;
pub mod types;

pub use client::GitHubClient;
pub use types::{NewPullRequest, PrState, PullRequest, PullRequestUpdate, RemoteRepo, User};

use async_trait::async_trait;
use thiserror::Error;

pub const GITHUB_HOST: &str = "github.com";
pub const GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid GitHub API URL: {0}")]
    InvalidApiUrl(String),
}

impl GitHubError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitHubError::Status { status: 404, .. })
    }
}

/// Calls made against the code-hosting service.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Succeeds when `branch` exists on the remote; 404 otherwise.
    async fn get_branch(&self, repo: &RemoteRepo, branch: &str) -> Result<(), GitHubError>;

    /// Open and closed pull requests from `head` (`owner:branch`) into `base`.
    async fn list_pull_requests(
        &self,
        repo: &RemoteRepo,
        head: &str,
        base: &str,
    ) -> Result<Vec<PullRequest>, GitHubError>;

    async fn create_pull_request(
        &self,
        repo: &RemoteRepo,
        pr: &NewPullRequest,
    ) -> Result<PullRequest, GitHubError>;

    async fn update_pull_request(
        &self,
        repo: &RemoteRepo,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<PullRequest, GitHubError>;

    /// Returns the pull request as the remote sees it after the request.
    async fn request_reviewers(
        &self,
        repo: &RemoteRepo,
        number: u64,
        reviewers: &[String],
    ) -> Result<PullRequest, GitHubError>;

    async fn authenticated_user(&self) -> Result<User, GitHubError>;
}

/// Parse a git remote URL into host, owner and repository name.
///
/// Accepts `git@host:owner/repo(.git)`, `ssh://git@host[:port]/owner/repo(.git)`
/// and `http(s)://host/owner/repo(.git)`.
pub fn parse_remote_url(url: &str) -> Option<RemoteRepo> {
    let url = url.trim();

    let (host, path) = if url.contains("://") {
        let parsed = reqwest::Url::parse(url).ok()?;
        if !matches!(parsed.scheme(), "https" | "http" | "ssh" | "git") {
            return None;
        }
        (parsed.host_str()?.to_string(), parsed.path().to_string())
    } else {
        let (user_host, path) = url.split_once(':')?;
        let host = user_host.rsplit('@').next()?;
        (host.to_string(), path.to_string())
    };

    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let [owner, repo] = segments.as_slice() else {
        return None;
    };
    let repo = repo.strip_suffix(".git").unwrap_or(*repo);
    if host.is_empty() || owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some(RemoteRepo {
        host,
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// REST root for a remote: api.github.com, or `/api/v3` on Enterprise hosts.
pub fn api_url_for(remote: &RemoteRepo) -> String {
    if remote.host.eq_ignore_ascii_case(GITHUB_HOST) {
        GITHUB_API_URL.to_string()
    } else {
        format!("https://{}/api/v3", remote.host)
    }
}
