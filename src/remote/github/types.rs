//! Wire shapes of the GitHub REST responses we consume.
//!
//! Every field is optional; normalization into the snapshot types happens in
//! `convert`.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubUser {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubRepo {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub owner: Option<GitHubUser>,
    pub description: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub created_at: Option<String>,
    pub language: Option<String>,
    pub open_issues_count: Option<u64>,
    pub html_url: Option<String>,
    pub homepage: Option<String>,
    pub default_branch: Option<String>,
    pub topics: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubCommitAuthor {
    pub name: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubCommitDetail {
    pub message: Option<String>,
    pub author: Option<GitHubCommitAuthor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubCommit {
    pub sha: Option<String>,
    pub html_url: Option<String>,
    pub commit: Option<GitHubCommitDetail>,
    /// The linked GitHub account, used when the git author name is missing
    pub author: Option<GitHubUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubLabel {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubIssue {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub state: Option<String>,
    pub user: Option<GitHubUser>,
    pub comments: Option<u64>,
    pub labels: Option<Vec<GitHubLabel>>,
    pub created_at: Option<String>,
    pub html_url: Option<String>,
    /// Present only when the "issue" is really a pull request
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubBranchRef {
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubPullRequest {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub state: Option<String>,
    pub user: Option<GitHubUser>,
    pub draft: Option<bool>,
    pub head: Option<GitHubBranchRef>,
    pub base: Option<GitHubBranchRef>,
    pub created_at: Option<String>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubRateResource {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    pub reset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubRateResources {
    pub core: Option<GitHubRateResource>,
}

/// Response of `GET /rate_limit`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubRateLimitResponse {
    pub resources: Option<GitHubRateResources>,
    pub rate: Option<GitHubRateResource>,
}

/// Error body GitHub returns alongside non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubErrorBody {
    pub message: Option<String>,
}
