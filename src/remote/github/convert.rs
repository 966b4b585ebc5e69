//! Normalization of GitHub payloads into snapshot types.

use super::types::{GitHubCommit, GitHubIssue, GitHubPullRequest, GitHubRepo, GitHubUser};
use crate::reference::RepoRef;
use crate::snapshot::{
    CommitSummary, IssueSummary, LatestCommit, PullRequestSummary, RepositorySnapshot,
};

/// Length of abbreviated commit hashes.
pub const SHORT_SHA_LEN: usize = 7;

fn text(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn login(user: Option<GitHubUser>) -> String {
    text(user.and_then(|u| u.login))
}

/// First line of a commit message.
#[must_use]
pub fn headline(message: &str) -> String {
    message.lines().next().unwrap_or_default().trim().to_string()
}

#[must_use]
pub fn short_sha(sha: &str) -> String {
    sha.chars().take(SHORT_SHA_LEN).collect()
}

/// Build a snapshot from the repository payload and the newest commit, if any.
///
/// `requested` fills identity fields the payload leaves out.
#[must_use]
pub fn to_snapshot(
    repo: GitHubRepo,
    latest: Option<GitHubCommit>,
    requested: &RepoRef,
) -> RepositorySnapshot {
    let owner = {
        let from_payload = login(repo.owner);
        if from_payload.is_empty() {
            requested.owner.clone()
        } else {
            from_payload
        }
    };
    let name = {
        let from_payload = text(repo.name);
        if from_payload.is_empty() {
            requested.name.clone()
        } else {
            from_payload
        }
    };
    let full_name = {
        let from_payload = text(repo.full_name);
        if from_payload.is_empty() {
            format!("{owner}/{name}")
        } else {
            from_payload
        }
    };

    RepositorySnapshot {
        owner,
        name,
        full_name,
        description: text(repo.description),
        stars: repo.stargazers_count.unwrap_or(0),
        forks: repo.forks_count.unwrap_or(0),
        created_at: text(repo.created_at),
        language: text(repo.language),
        open_issues: repo.open_issues_count.unwrap_or(0),
        url: text(repo.html_url),
        homepage: text(repo.homepage),
        default_branch: text(repo.default_branch),
        topics: repo
            .topics
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        latest_commit: latest.map(to_latest_commit).unwrap_or_default(),
    }
}

#[must_use]
pub fn to_latest_commit(commit: GitHubCommit) -> LatestCommit {
    let summary = to_commit_summary(commit);
    LatestCommit {
        message: summary.message,
        author: summary.author,
        date: summary.date,
        sha: summary.sha,
    }
}

#[must_use]
pub fn to_commit_summary(commit: GitHubCommit) -> CommitSummary {
    let detail = commit.commit.unwrap_or_default();
    let git_author = detail.author.unwrap_or_default();
    let author = {
        let name = text(git_author.name);
        if name.is_empty() {
            login(commit.author)
        } else {
            name
        }
    };

    CommitSummary {
        sha: short_sha(&text(commit.sha)),
        message: headline(&detail.message.unwrap_or_default()),
        author,
        date: text(git_author.date),
        url: text(commit.html_url),
    }
}

#[must_use]
pub fn to_issue_summary(issue: GitHubIssue) -> IssueSummary {
    IssueSummary {
        number: issue.number.unwrap_or(0),
        title: text(issue.title),
        state: text(issue.state),
        author: login(issue.user),
        comments: issue.comments.unwrap_or(0),
        labels: issue
            .labels
            .unwrap_or_default()
            .into_iter()
            .filter_map(|l| l.name)
            .collect(),
        created_at: text(issue.created_at),
        url: text(issue.html_url),
    }
}

#[must_use]
pub fn to_pull_request_summary(pull: GitHubPullRequest) -> PullRequestSummary {
    PullRequestSummary {
        number: pull.number.unwrap_or(0),
        title: text(pull.title),
        state: text(pull.state),
        author: login(pull.user),
        draft: pull.draft.unwrap_or(false),
        head_branch: text(pull.head.and_then(|h| h.ref_name)),
        base_branch: text(pull.base.and_then(|b| b.ref_name)),
        created_at: text(pull.created_at),
        url: text(pull.html_url),
    }
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
