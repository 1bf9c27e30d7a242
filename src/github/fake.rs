use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::types::{NewPullRequest, PrState, PullRequest, PullRequestUpdate, RemoteRepo, User};
use super::{GitHubError, HostingApi};

/// A pull request as stored by the fake remote.
#[derive(Debug, Clone)]
pub struct FakePull {
    pub head: String,
    pub base: String,
    pub body: String,
    pub pr: PullRequest,
}

/// Shared state behind [`FakeHosting`]; clones observe the same remote.
#[derive(Default)]
pub struct FakeRemote {
    /// Branches that exist on the remote
    pub branches: Vec<String>,
    pub pulls: Vec<FakePull>,
    pub login: String,
    /// Logins the remote accepts as reviewers; `None` accepts everyone
    pub assignable: Option<Vec<String>>,
    /// Forced failure for reviewer requests
    pub reviewer_error: Option<(u16, String)>,
    /// Forced failure for the branch lookup
    pub branch_error: Option<(u16, String)>,
    pub user_error: bool,
    pub calls: Vec<String>,
}

/// In-memory GitHub for tests.
#[derive(Clone, Default)]
pub struct FakeHosting {
    pub state: Arc<Mutex<FakeRemote>>,
}

impl FakeHosting {
    pub fn with_branches(login: &str, branches: &[&str]) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            state.login = login.to_string();
            state.branches = branches.iter().map(|b| b.to_string()).collect();
        }
        fake
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn pulls(&self) -> Vec<FakePull> {
        self.state.lock().unwrap().pulls.clone()
    }

    /// Current body of pull request `number`.
    pub fn body(&self, number: u64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .pulls
            .iter()
            .find(|p| p.pr.number == number)
            .map(|p| p.body.clone())
    }

    pub fn set_state(&self, number: u64, state: PrState) {
        let mut remote = self.state.lock().unwrap();
        if let Some(p) = remote.pulls.iter_mut().find(|p| p.pr.number == number) {
            p.pr.state = state;
        }
    }

    /// Seed a pull request that already exists on the remote.
    pub fn add_pull(&self, head: &str, base: &str, pr: PullRequest) {
        self.state.lock().unwrap().pulls.push(FakePull {
            head: head.to_string(),
            base: base.to_string(),
            body: String::new(),
            pr,
        });
    }
}

fn status(code: u16, message: &str) -> GitHubError {
    GitHubError::Status {
        status: code,
        message: message.to_string(),
    }
}

#[async_trait]
impl HostingApi for FakeHosting {
    async fn get_branch(&self, _repo: &RemoteRepo, branch: &str) -> Result<(), GitHubError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("get_branch {branch}"));
        if let Some((code, message)) = &state.branch_error {
            return Err(status(*code, message));
        }
        if state.branches.iter().any(|b| b == branch) {
            Ok(())
        } else {
            Err(status(404, "Branch not found"))
        }
    }

    async fn list_pull_requests(
        &self,
        repo: &RemoteRepo,
        head: &str,
        base: &str,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list_pull_requests {head} {base}"));
        let branch = head
            .strip_prefix(&format!("{}:", repo.owner))
            .unwrap_or(head);
        Ok(state
            .pulls
            .iter()
            .filter(|p| p.head == branch && p.base == base)
            .map(|p| p.pr.clone())
            .collect())
    }

    async fn create_pull_request(
        &self,
        repo: &RemoteRepo,
        pr: &NewPullRequest,
    ) -> Result<PullRequest, GitHubError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create_pull_request {}", pr.head));
        let number = state.pulls.len() as u64 + 1;
        let created = PullRequest {
            number,
            html_url: format!("https://github.com/{}/{}/pull/{number}", repo.owner, repo.repo),
            title: pr.title.clone(),
            state: PrState::Open,
            draft: pr.draft,
            merged_at: None,
            updated_at: None,
            requested_reviewers: Vec::new(),
        };
        state.pulls.push(FakePull {
            head: pr.head.clone(),
            base: pr.base.clone(),
            body: pr.body.clone(),
            pr: created.clone(),
        });
        Ok(created)
    }

    async fn update_pull_request(
        &self,
        _repo: &RemoteRepo,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<PullRequest, GitHubError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update_pull_request {number} state={:?}", update.state));
        let stored = state
            .pulls
            .iter_mut()
            .find(|p| p.pr.number == number)
            .ok_or_else(|| status(404, "Not Found"))?;
        if let Some(title) = &update.title {
            stored.pr.title = title.clone();
        }
        if let Some(body) = &update.body {
            stored.body = body.clone();
        }
        if let Some(new_state) = update.state {
            stored.pr.state = new_state;
        }
        Ok(stored.pr.clone())
    }

    async fn request_reviewers(
        &self,
        _repo: &RemoteRepo,
        number: u64,
        reviewers: &[String],
    ) -> Result<PullRequest, GitHubError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("request_reviewers {number} {}", reviewers.join(",")));
        if let Some((code, message)) = &state.reviewer_error {
            return Err(status(*code, message));
        }
        let accepted: Vec<User> = reviewers
            .iter()
            .filter(|r| {
                state
                    .assignable
                    .as_ref()
                    .map_or(true, |ok| ok.iter().any(|a| a.eq_ignore_ascii_case(r)))
            })
            .map(|r| User { login: r.clone() })
            .collect();
        let stored = state
            .pulls
            .iter_mut()
            .find(|p| p.pr.number == number)
            .ok_or_else(|| status(404, "Not Found"))?;
        stored.pr.requested_reviewers = accepted;
        Ok(stored.pr.clone())
    }

    async fn authenticated_user(&self) -> Result<User, GitHubError> {
        let state = self.state.lock().unwrap();
        if state.user_error {
            return Err(status(401, "Bad credentials"));
        }
        Ok(User {
            login: state.login.clone(),
        })
    }
}
