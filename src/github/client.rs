use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::types::{NewPullRequest, PullRequest, PullRequestUpdate, RemoteRepo, User};
use super::{GitHubError, HostingApi};

const API_VERSION: &str = "2022-11-28";

/// GitHub REST v3 client authenticated with a caller-supplied token.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: Url,
    token: String,
}

/// Error payload returned by the GitHub API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ApiErrorBody {
    fn describe(&self) -> String {
        let details: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|e| e.message.as_deref().or(e.code.as_deref()))
            .collect();
        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, details.join("; "))
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct ReviewerRequest<'a> {
    reviewers: &'a [String],
}

impl GitHubClient {
    pub fn new(token: &str, api_url: &str) -> Result<Self, GitHubError> {
        let api_url =
            Url::parse(api_url).map_err(|_| GitHubError::InvalidApiUrl(api_url.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("prflow"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            api_url,
            token: token.to_string(),
        })
    }

    /// Build `{api_url}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GitHubError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::InvalidApiUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_endpoint(&self, repo: &RemoteRepo, rest: &[&str]) -> Result<Url, GitHubError> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.repo.as_str()];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GitHubError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "GitHub API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.describe())
                .unwrap_or_else(|_| body.trim().to_string());
            return Err(GitHubError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn get_branch(&self, repo: &RemoteRepo, branch: &str) -> Result<(), GitHubError> {
        let url = self.repo_endpoint(repo, &["branches", branch])?;
        self.send::<serde_json::Value>(self.http.get(url)).await?;
        Ok(())
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn list_pull_requests(
        &self,
        repo: &RemoteRepo,
        head: &str,
        base: &str,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        let url = self.repo_endpoint(repo, &["pulls"])?;
        let request = self.http.get(url).query(&[
            ("head", head),
            ("base", base),
            ("state", "all"),
            ("per_page", "100"),
        ]);
        self.send(request).await
    }

    #[instrument(skip(self, repo, pr), fields(repo = %repo, head = %pr.head, base = %pr.base))]
    async fn create_pull_request(
        &self,
        repo: &RemoteRepo,
        pr: &NewPullRequest,
    ) -> Result<PullRequest, GitHubError> {
        let url = self.repo_endpoint(repo, &["pulls"])?;
        self.send(self.http.post(url).json(pr)).await
    }

    #[instrument(skip(self, repo, update), fields(repo = %repo))]
    async fn update_pull_request(
        &self,
        repo: &RemoteRepo,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<PullRequest, GitHubError> {
        let number = number.to_string();
        let url = self.repo_endpoint(repo, &["pulls", &number])?;
        self.send(self.http.patch(url).json(update)).await
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn request_reviewers(
        &self,
        repo: &RemoteRepo,
        number: u64,
        reviewers: &[String],
    ) -> Result<PullRequest, GitHubError> {
        let number = number.to_string();
        let url = self.repo_endpoint(repo, &["pulls", &number, "requested_reviewers"])?;
        self.send(self.http.post(url).json(&ReviewerRequest { reviewers }))
            .await
    }

    async fn authenticated_user(&self) -> Result<User, GitHubError> {
        let url = self.endpoint(&["user"])?;
        self.send(self.http.get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteRepo {
        RemoteRepo {
            host: "github.com".into(),
            owner: "org".into(),
            repo: "repo".into(),
        }
    }

    #[test]
    fn test_repo_endpoint_encodes_branch_slashes() {
        let client = GitHubClient::new("t", "https://api.github.com").unwrap();
        let url = client
            .repo_endpoint(&remote(), &["branches", "feature/login"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/org/repo/branches/feature%2Flogin"
        );
    }

    #[test]
    fn test_endpoint_keeps_enterprise_prefix() {
        let client = GitHubClient::new("t", "https://ghe.corp.io/api/v3/").unwrap();
        let url = client.endpoint(&["user"]).unwrap();
        assert_eq!(url.as_str(), "https://ghe.corp.io/api/v3/user");
    }

    #[test]
    fn test_invalid_api_url() {
        assert!(matches!(
            GitHubClient::new("t", "not a url"),
            Err(GitHubError::InvalidApiUrl(_))
        ));
    }

    #[test]
    fn test_error_body_description() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"message":"Validation Failed","errors":[{"message":"Reviews may only be requested from collaborators."}]}"#,
        )
        .unwrap();
        assert_eq!(
            body.describe(),
            "Validation Failed (Reviews may only be requested from collaborators.)"
        );
        let body: ApiErrorBody = serde_json::from_str(r#"{"message":"Branch not found"}"#).unwrap();
        assert_eq!(body.describe(), "Branch not found");
    }
}
