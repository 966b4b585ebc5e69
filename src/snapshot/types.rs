use crate::reference::RepoRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Headline data about the most recent commit on the tracked branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestCommit {
    /// First line of the commit message
    pub message: String,
    pub author: String,
    /// RFC 3339 commit timestamp
    pub date: String,
    /// Abbreviated (7 character) hash
    pub sha: String,
}

impl LatestCommit {
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.sha.is_empty() && self.message.is_empty()
    }
}

/// The remote state of one repository at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub owner: String,
    pub name: String,
    /// `owner/name` as reported by the remote
    pub full_name: String,
    pub description: String,
    pub stars: u64,
    pub forks: u64,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    pub language: String,
    pub open_issues: u64,
    pub url: String,
    pub homepage: String,
    pub default_branch: String,
    /// Topic tags; ordering carries no meaning
    pub topics: BTreeSet<String>,
    pub latest_commit: LatestCommit,
}

impl RepositorySnapshot {
    #[must_use]
    pub fn reference(&self) -> RepoRef {
        RepoRef::new(self.owner.clone(), self.name.clone())
    }

    /// Calendar date of the latest commit (`YYYY-MM-DD`), empty when unknown.
    #[must_use]
    pub fn latest_commit_day(&self) -> String {
        DateTime::parse_from_rfc3339(&self.latest_commit.date)
            .map(|d| d.with_timezone(&Utc).format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Issue or pull request state filter for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListState {
    #[default]
    Open,
    Closed,
    All,
}

impl ListState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for ListState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "all" => Ok(Self::All),
            other => Err(format!("unknown state '{other}' (expected open, closed or all)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub author: String,
    pub comments: u64,
    pub labels: Vec<String>,
    pub created_at: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub author: String,
    pub draft: bool,
    pub head_branch: String,
    pub base_branch: String,
    pub created_at: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: String,
    pub url: String,
}

/// Remaining API call budget as last reported by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBudget {
    pub limit: u64,
    pub remaining: u64,
    pub reset_at: DateTime<Utc>,
}

impl RateBudget {
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
