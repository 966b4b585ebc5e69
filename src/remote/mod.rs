//! Remote repository access.
//!
//! Callers depend on [`RepositoryClient`] and branch only on [`RemoteError`];
//! HTTP statuses never leave the GitHub implementation.

mod current;
mod error;
mod github;
pub mod http;

pub use current::CurrentClient;
pub use error::RemoteError;
pub use github::{headline, short_sha, GitHubClient, GITHUB_API_URL, SHORT_SHA_LEN};

use async_trait::async_trait;

use crate::reference::RepoRef;
use crate::snapshot::{
    CommitSummary, IssueSummary, ListState, PullRequestSummary, RateBudget, RepositorySnapshot,
};

/// Read-only operations against a code-hosting API.
///
/// Implementations are immutable once built; a credential change produces a
/// new instance instead of mutating an existing one.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Fetch the current state of one repository, optionally pinned to a branch.
    async fn fetch_snapshot(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
    ) -> Result<RepositorySnapshot, RemoteError>;

    /// List the repositories owned by `owner`.
    async fn list_tracked_set(&self, owner: &str) -> Result<Vec<RepositorySnapshot>, RemoteError>;

    async fn fetch_issues(
        &self,
        repo: &RepoRef,
        state: ListState,
    ) -> Result<Vec<IssueSummary>, RemoteError>;

    async fn fetch_pull_requests(
        &self,
        repo: &RepoRef,
        state: ListState,
    ) -> Result<Vec<PullRequestSummary>, RemoteError>;

    /// Unified diff of one pull request.
    async fn fetch_pull_request_diff(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<String, RemoteError>;

    async fn fetch_commits(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
    ) -> Result<Vec<CommitSummary>, RemoteError>;

    /// Ask the remote for the current call budget.
    async fn rate_budget(&self) -> Result<RateBudget, RemoteError>;

    /// Budget reported by the most recent response, if any carried one.
    fn last_rate_budget(&self) -> Option<RateBudget>;
}
