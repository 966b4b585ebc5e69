//! GitHub REST client.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::convert::{
    to_commit_summary, to_issue_summary, to_pull_request_summary, to_snapshot,
};
use super::types::{
    GitHubCommit, GitHubErrorBody, GitHubIssue, GitHubPullRequest, GitHubRateLimitResponse,
    GitHubRepo,
};
use crate::reference::{is_valid_segment, RepoRef};
use crate::remote::http::{
    header_get, HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    ReqwestTransport,
};
use crate::remote::{RemoteError, RepositoryClient};
use crate::snapshot::{
    CommitSummary, IssueSummary, ListState, PullRequestSummary, RateBudget, RepositorySnapshot,
};

/// Public GitHub API endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Network-layer timeout; the only bound on how long a refresh can wait.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const JSON_ACCEPT: &str = "application/vnd.github+json";
const DIFF_ACCEPT: &str = "application/vnd.github.diff";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("hubnotes/", env!("CARGO_PKG_VERSION"));

/// Page size for listing endpoints.
const LIST_PAGE_SIZE: u32 = 30;
const OWNER_REPOS_PAGE_SIZE: u32 = 100;

/// GitHub API client bound to one token.
///
/// The token is fixed at construction; a token change builds a new client
/// (see [`crate::remote::CurrentClient`]).
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    token: Option<String>,
    last_budget: Mutex<Option<RateBudget>>,
}

impl GitHubClient {
    /// Create a client using the reqwest transport.
    ///
    /// An empty `token` means unauthenticated access.
    pub fn new(base_url: &str, token: &str) -> Result<Self, RemoteError> {
        let transport = ReqwestTransport::with_timeout(REQUEST_TIMEOUT)
            .map_err(|e| RemoteError::other(e.to_string()))?;
        Ok(Self::new_with_transport(base_url, token, Arc::new(transport)))
    }

    /// Create a client and erase it behind the [`RepositoryClient`] trait.
    pub fn shared(base_url: &str, token: &str) -> Result<Arc<dyn RepositoryClient>, RemoteError> {
        Ok(Arc::new(Self::new(base_url, token)?))
    }

    pub fn new_with_transport(
        base_url: &str,
        token: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let token = token.trim();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: (!token.is_empty()).then(|| token.to_string()),
            last_budget: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Extract the call budget from `x-ratelimit-*` headers.
    fn parse_rate_limit_headers(headers: &HttpHeaders) -> Option<RateBudget> {
        let limit = header_get(headers, "x-ratelimit-limit")?.parse::<u64>().ok()?;
        let remaining = header_get(headers, "x-ratelimit-remaining")?
            .parse::<u64>()
            .ok()?;
        let reset_epoch = header_get(headers, "x-ratelimit-reset")?
            .parse::<i64>()
            .ok()?;
        let reset_at = DateTime::from_timestamp(reset_epoch, 0).unwrap_or_else(Utc::now);
        Some(RateBudget {
            limit,
            remaining,
            reset_at,
        })
    }

    fn record_budget(&self, headers: &HttpHeaders) {
        if let Some(budget) = Self::parse_rate_limit_headers(headers) {
            debug!(
                remaining = budget.remaining,
                limit = budget.limit,
                "GitHub call budget"
            );
            *self
                .last_budget
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(budget);
        }
    }

    /// Map a non-2xx response onto the failure taxonomy.
    fn classify(response: &HttpResponse, resource: &str) -> RemoteError {
        let message = serde_json::from_slice::<GitHubErrorBody>(&response.body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| String::from_utf8_lossy(&response.body).trim().to_string());
        let reset_at = Self::parse_rate_limit_headers(&response.headers).map(|b| b.reset_at);
        let budget_exhausted = response.header("x-ratelimit-remaining") == Some("0");

        match response.status {
            404 => RemoteError::not_found(resource),
            429 => RemoteError::RateLimited { reset_at },
            403 if budget_exhausted || message.to_lowercase().contains("rate limit") => {
                RemoteError::RateLimited { reset_at }
            }
            status => RemoteError::Other {
                status: Some(status),
                message: format!("GitHub returned {status} for {resource}: {message}"),
            },
        }
    }

    async fn send(&self, path: &str, accept: &str, resource: &str) -> Result<HttpResponse, RemoteError> {
        let url = format!("{}{path}", self.base_url);
        let mut headers = vec![
            ("Accept".to_string(), accept.to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
            ("X-GitHub-Api-Version".to_string(), API_VERSION.to_string()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url,
                headers,
            })
            .await
            .map_err(|e| RemoteError::other(e.to_string()))?;

        self.record_budget(&response.headers);

        if response.is_success() {
            Ok(response)
        } else {
            let error = Self::classify(&response, resource);
            warn!(status = response.status, %resource, "GitHub request failed: {error}");
            Err(error)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T, RemoteError> {
        let response = self.send(path, JSON_ACCEPT, resource).await?;
        serde_json::from_slice(&response.body)
            .map_err(|e| RemoteError::other(format!("Malformed response for {resource}: {e}")))
    }

    async fn latest_commit(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
    ) -> Result<Option<GitHubCommit>, RemoteError> {
        let path = commits_path(repo, branch, 1);
        let resource = branch.map_or_else(
            || format!("commits of {repo}"),
            |b| format!("branch {b} of {repo}"),
        );
        match self.get_json::<Vec<GitHubCommit>>(&path, &resource).await {
            Ok(commits) => Ok(commits.into_iter().next()),
            // Empty repositories answer 409 on the commits endpoint.
            Err(RemoteError::Other {
                status: Some(409), ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn commits_path(repo: &RepoRef, branch: Option<&str>, per_page: u32) -> String {
    let mut path = format!("/repos/{}/{}/commits?per_page={per_page}", repo.owner, repo.name);
    if let Some(branch) = branch {
        path.push_str("&sha=");
        path.push_str(&encode_query_value(branch));
    }
    path
}

/// Percent-encode a query value, keeping unreserved characters and `/`.
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~' | b'/') {
            encoded.push(char::from(byte));
        } else {
            // Writing to a String cannot fail.
            let _ignored = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    async fn fetch_snapshot(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
    ) -> Result<RepositorySnapshot, RemoteError> {
        let payload: GitHubRepo = self
            .get_json(
                &format!("/repos/{}/{}", repo.owner, repo.name),
                &format!("repository {repo}"),
            )
            .await?;
        let latest = self.latest_commit(repo, branch).await?;
        Ok(to_snapshot(payload, latest, repo))
    }

    async fn list_tracked_set(&self, owner: &str) -> Result<Vec<RepositorySnapshot>, RemoteError> {
        if !is_valid_segment(owner) {
            return Err(RemoteError::not_found(format!("owner {owner}")));
        }
        let repos: Vec<GitHubRepo> = self
            .get_json(
                &format!("/users/{owner}/repos?per_page={OWNER_REPOS_PAGE_SIZE}&sort=updated"),
                &format!("owner {owner}"),
            )
            .await?;
        Ok(repos
            .into_iter()
            .filter_map(|payload| {
                let name = payload.name.clone()?;
                Some(to_snapshot(payload, None, &RepoRef::new(owner, name)))
            })
            .collect())
    }

    async fn fetch_issues(
        &self,
        repo: &RepoRef,
        state: ListState,
    ) -> Result<Vec<IssueSummary>, RemoteError> {
        let issues: Vec<GitHubIssue> = self
            .get_json(
                &format!(
                    "/repos/{}/{}/issues?state={state}&per_page={LIST_PAGE_SIZE}",
                    repo.owner, repo.name
                ),
                &format!("issues of {repo}"),
            )
            .await?;
        Ok(issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .map(to_issue_summary)
            .collect())
    }

    async fn fetch_pull_requests(
        &self,
        repo: &RepoRef,
        state: ListState,
    ) -> Result<Vec<PullRequestSummary>, RemoteError> {
        let pulls: Vec<GitHubPullRequest> = self
            .get_json(
                &format!(
                    "/repos/{}/{}/pulls?state={state}&per_page={LIST_PAGE_SIZE}",
                    repo.owner, repo.name
                ),
                &format!("pull requests of {repo}"),
            )
            .await?;
        Ok(pulls.into_iter().map(to_pull_request_summary).collect())
    }

    async fn fetch_pull_request_diff(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<String, RemoteError> {
        let response = self
            .send(
                &format!("/repos/{}/{}/pulls/{number}", repo.owner, repo.name),
                DIFF_ACCEPT,
                &format!("pull request #{number} of {repo}"),
            )
            .await?;
        Ok(String::from_utf8_lossy(&response.body).into_owned())
    }

    async fn fetch_commits(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
    ) -> Result<Vec<CommitSummary>, RemoteError> {
        let resource = branch.map_or_else(
            || format!("commits of {repo}"),
            |b| format!("branch {b} of {repo}"),
        );
        let commits: Vec<GitHubCommit> = self
            .get_json(&commits_path(repo, branch, LIST_PAGE_SIZE), &resource)
            .await?;
        Ok(commits.into_iter().map(to_commit_summary).collect())
    }

    async fn rate_budget(&self) -> Result<RateBudget, RemoteError> {
        let response: GitHubRateLimitResponse =
            self.get_json("/rate_limit", "rate limit status").await?;
        let core = response
            .resources
            .and_then(|r| r.core)
            .or(response.rate)
            .ok_or_else(|| RemoteError::other("Rate limit response had no core budget"))?;
        Ok(RateBudget {
            limit: core.limit.unwrap_or(0),
            remaining: core.remaining.unwrap_or(0),
            reset_at: core
                .reset
                .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
                .unwrap_or_else(Utc::now),
        })
    }

    fn last_rate_budget(&self) -> Option<RateBudget> {
        self.last_budget
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
