//! Read-only listings printed by the CLI.

use std::fmt::Write as _;

use super::error::CommandError;
use crate::reference::{parse_reference, RepoRef};
use crate::remote::{headline, short_sha, CurrentClient};
use crate::snapshot::{CommitSummary, IssueSummary, ListState, PullRequestSummary};

fn resolve(reference: &str) -> Result<RepoRef, CommandError> {
    parse_reference(reference).ok_or_else(|| CommandError::InvalidReference(reference.to_string()))
}

fn day(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

pub async fn list_issues(
    client: &CurrentClient,
    reference: &str,
    state: ListState,
) -> Result<Vec<IssueSummary>, CommandError> {
    let repo = resolve(reference)?;
    Ok(client.current().fetch_issues(&repo, state).await?)
}

pub async fn list_pull_requests(
    client: &CurrentClient,
    reference: &str,
    state: ListState,
) -> Result<Vec<PullRequestSummary>, CommandError> {
    let repo = resolve(reference)?;
    Ok(client.current().fetch_pull_requests(&repo, state).await?)
}

pub async fn pull_request_diff(
    client: &CurrentClient,
    reference: &str,
    number: u64,
) -> Result<String, CommandError> {
    let repo = resolve(reference)?;
    Ok(client
        .current()
        .fetch_pull_request_diff(&repo, number)
        .await?)
}

pub async fn list_commits(
    client: &CurrentClient,
    reference: &str,
    branch: Option<&str>,
) -> Result<Vec<CommitSummary>, CommandError> {
    let repo = resolve(reference)?;
    Ok(client.current().fetch_commits(&repo, branch).await?)
}

// Writing to a String cannot fail, so the write results below are ignored.

#[must_use]
pub fn format_issues(issues: &[IssueSummary]) -> String {
    if issues.is_empty() {
        return "No issues.\n".to_string();
    }
    let mut out = String::new();
    for issue in issues {
        let _ignored = write!(
            out,
            "#{:<5} {} [{}] by {} on {}, {} comments",
            issue.number,
            headline(&issue.title),
            issue.state,
            issue.author,
            day(&issue.created_at),
            issue.comments
        );
        if !issue.labels.is_empty() {
            let _ignored = write!(out, " ({})", issue.labels.join(", "));
        }
        out.push('\n');
    }
    out
}

#[must_use]
pub fn format_pull_requests(pulls: &[PullRequestSummary]) -> String {
    if pulls.is_empty() {
        return "No pull requests.\n".to_string();
    }
    let mut out = String::new();
    for pr in pulls {
        let draft = if pr.draft { " draft" } else { "" };
        let _ignored = writeln!(
            out,
            "#{:<5} {} [{}{draft}] {} -> {} by {} on {}",
            pr.number,
            headline(&pr.title),
            pr.state,
            pr.head_branch,
            pr.base_branch,
            pr.author,
            day(&pr.created_at)
        );
    }
    out
}

#[must_use]
pub fn format_commits(commits: &[CommitSummary]) -> String {
    if commits.is_empty() {
        return "No commits.\n".to_string();
    }
    let mut out = String::new();
    for commit in commits {
        let _ignored = writeln!(
            out,
            "{} {} ({}, {})",
            short_sha(&commit.sha),
            headline(&commit.message),
            commit.author,
            day(&commit.date)
        );
    }
    out
}
