//! Common test utilities

#![allow(dead_code)] // Not every test binary uses every helper

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::DateTime;
use hubnotes::refresh::{MemoryNotifier, Orchestrator};
use hubnotes::remote::{CurrentClient, RemoteError, RepositoryClient};
use hubnotes::snapshot::{
    CommitSummary, IssueSummary, LatestCommit, ListState, PullRequestSummary, RateBudget,
    RepositorySnapshot,
};
use hubnotes::template::TemplateOptions;
use hubnotes::vault::Vault;
use hubnotes::RepoRef;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A snapshot with every field a note renders filled in
pub fn snapshot(owner: &str, name: &str, stars: u64) -> RepositorySnapshot {
    RepositorySnapshot {
        owner: owner.to_string(),
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        description: format!("The {name} project"),
        stars,
        forks: 2,
        created_at: "2020-05-06T07:08:09Z".to_string(),
        language: "Rust".to_string(),
        open_issues: 1,
        url: format!("https://github.com/{owner}/{name}"),
        default_branch: "main".to_string(),
        latest_commit: LatestCommit {
            message: "Initial commit".to_string(),
            author: "Ada".to_string(),
            date: "2024-01-02T03:04:05Z".to_string(),
            sha: "abc1234".to_string(),
        },
        ..RepositorySnapshot::default()
    }
}

/// In-memory remote keyed by lowercase full name
#[derive(Default)]
pub struct FakeClient {
    repos: Mutex<HashMap<String, RepositorySnapshot>>,
    branches: Mutex<Vec<String>>,
    owners: Mutex<HashMap<String, Vec<RepositorySnapshot>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn add(&self, snapshot: RepositorySnapshot) {
        self.repos
            .lock()
            .unwrap()
            .insert(snapshot.full_name.to_lowercase(), snapshot);
    }

    pub fn add_branch(&self, branch: &str) {
        self.branches.lock().unwrap().push(branch.to_string());
    }

    pub fn set_owner(&self, owner: &str, repos: Vec<RepositorySnapshot>) {
        self.owners.lock().unwrap().insert(owner.to_string(), repos);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn known(&self, repo: &RepoRef) -> Result<RepositorySnapshot, RemoteError> {
        self.repos
            .lock()
            .unwrap()
            .get(&repo.full_name().to_lowercase())
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("repository {repo}")))
    }
}

#[async_trait]
impl RepositoryClient for FakeClient {
    async fn fetch_snapshot(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
    ) -> Result<RepositorySnapshot, RemoteError> {
        self.record(format!("snapshot {repo} {}", branch.unwrap_or("-")));
        let snapshot = self.known(repo)?;
        match branch {
            Some(b) if !self.branches.lock().unwrap().iter().any(|k| k == b) => {
                Err(RemoteError::not_found(format!("branch {b} of {repo}")))
            }
            _ => Ok(snapshot),
        }
    }

    async fn list_tracked_set(&self, owner: &str) -> Result<Vec<RepositorySnapshot>, RemoteError> {
        self.record(format!("list {owner}"));
        self.owners
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("owner {owner}")))
    }

    async fn fetch_issues(
        &self,
        repo: &RepoRef,
        state: ListState,
    ) -> Result<Vec<IssueSummary>, RemoteError> {
        self.record(format!("issues {repo} {state}"));
        self.known(repo)?;
        Ok(vec![IssueSummary {
            number: 7,
            title: "Crash on start\nstack trace below".to_string(),
            state: "open".to_string(),
            author: "bob".to_string(),
            comments: 3,
            labels: vec!["bug".to_string()],
            created_at: "2024-02-03T00:00:00Z".to_string(),
            url: format!("{}/issues/7", repo.canonical_url()),
        }])
    }

    async fn fetch_pull_requests(
        &self,
        repo: &RepoRef,
        state: ListState,
    ) -> Result<Vec<PullRequestSummary>, RemoteError> {
        self.record(format!("pulls {repo} {state}"));
        self.known(repo)?;
        Ok(Vec::new())
    }

    async fn fetch_pull_request_diff(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<String, RemoteError> {
        self.record(format!("diff {repo} {number}"));
        self.known(repo)?;
        Ok("diff --git a/x b/x\n".to_string())
    }

    async fn fetch_commits(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
    ) -> Result<Vec<CommitSummary>, RemoteError> {
        self.record(format!("commits {repo} {}", branch.unwrap_or("-")));
        self.known(repo)?;
        Ok(vec![CommitSummary {
            sha: "0123456789abcdef".to_string(),
            message: "Fix parser\n\nLonger body".to_string(),
            author: "Ada".to_string(),
            date: "2024-01-02T03:04:05Z".to_string(),
            url: String::new(),
        }])
    }

    async fn rate_budget(&self) -> Result<RateBudget, RemoteError> {
        Ok(RateBudget {
            limit: 60,
            remaining: 59,
            reset_at: DateTime::from_timestamp(1_706_400_000, 0).unwrap(),
        })
    }

    fn last_rate_budget(&self) -> Option<RateBudget> {
        None
    }
}

/// A vault in a temp dir driven by a [`FakeClient`]
pub struct TestVault {
    pub temp: TempDir,
    pub fake: Arc<FakeClient>,
    pub client: Arc<CurrentClient>,
    pub notifier: Arc<MemoryNotifier>,
    pub orchestrator: Arc<Orchestrator>,
}

impl TestVault {
    pub fn new() -> Self {
        let temp = create_test_dir();
        let fake = Arc::new(FakeClient::default());
        let client = Arc::new(CurrentClient::new("https://api.test", fake.clone()));
        let notifier = Arc::new(MemoryNotifier::new());
        let orchestrator = Arc::new(Orchestrator::new(
            Vault::new(temp.path()),
            Arc::clone(&client),
            TemplateOptions::default(),
            notifier.clone(),
        ));
        Self {
            temp,
            fake,
            client,
            notifier,
            orchestrator,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, rel: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.root().join(rel)).unwrap()
    }
}
