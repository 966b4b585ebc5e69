use super::*;
use crate::reference::RepoRef;
use crate::refresh::MemoryNotifier;
use crate::remote::RepositoryClient;
use crate::snapshot::{
    CommitSummary, IssueSummary, LatestCommit, ListState, PullRequestSummary, RateBudget,
};
use crate::sync::{split, SENTINEL};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tempfile::TempDir;

#[derive(Default)]
struct FakeClient {
    responses: Mutex<HashMap<String, Result<RepositorySnapshot, RemoteError>>>,
    calls: Mutex<Vec<(String, Option<String>)>>,
    /// Removed from disk while a snapshot is being fetched
    removed_during_fetch: Mutex<Option<std::path::PathBuf>>,
}

impl FakeClient {
    fn set(&self, owner: &str, name: &str, stars: u64) {
        let snapshot = RepositorySnapshot {
            owner: owner.to_string(),
            name: name.to_string(),
            full_name: format!("{owner}/{name}"),
            stars,
            language: "Rust".to_string(),
            url: format!("https://github.com/{owner}/{name}"),
            latest_commit: LatestCommit {
                message: "Initial commit".to_string(),
                author: "Ada".to_string(),
                date: "2024-01-02T03:04:05Z".to_string(),
                sha: "abc1234".to_string(),
            },
            ..RepositorySnapshot::default()
        };
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{owner}/{name}"), Ok(snapshot));
    }

    fn fail(&self, owner: &str, name: &str, error: RemoteError) {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{owner}/{name}"), Err(error));
    }

    fn remove_during_fetch(&self, path: &Path) {
        *self.removed_during_fetch.lock().unwrap() = Some(path.to_path_buf());
    }

    fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryClient for FakeClient {
    async fn fetch_snapshot(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
    ) -> Result<RepositorySnapshot, RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push((repo.full_name(), branch.map(str::to_string)));
        if let Some(path) = self.removed_during_fetch.lock().unwrap().take() {
            if path.is_dir() {
                std::fs::remove_dir_all(&path).unwrap();
            } else {
                std::fs::remove_file(&path).unwrap();
            }
        }
        self.responses
            .lock()
            .unwrap()
            .get(&repo.full_name())
            .cloned()
            .unwrap_or_else(|| Err(RemoteError::not_found(format!("repository {repo}"))))
    }

    async fn list_tracked_set(&self, _owner: &str) -> Result<Vec<RepositorySnapshot>, RemoteError> {
        Ok(Vec::new())
    }

    async fn fetch_issues(
        &self,
        _repo: &RepoRef,
        _state: ListState,
    ) -> Result<Vec<IssueSummary>, RemoteError> {
        Ok(Vec::new())
    }

    async fn fetch_pull_requests(
        &self,
        _repo: &RepoRef,
        _state: ListState,
    ) -> Result<Vec<PullRequestSummary>, RemoteError> {
        Ok(Vec::new())
    }

    async fn fetch_pull_request_diff(
        &self,
        _repo: &RepoRef,
        _number: u64,
    ) -> Result<String, RemoteError> {
        Ok(String::new())
    }

    async fn fetch_commits(
        &self,
        _repo: &RepoRef,
        _branch: Option<&str>,
    ) -> Result<Vec<CommitSummary>, RemoteError> {
        Ok(Vec::new())
    }

    async fn rate_budget(&self) -> Result<RateBudget, RemoteError> {
        Err(RemoteError::other("not used"))
    }

    fn last_rate_budget(&self) -> Option<RateBudget> {
        None
    }
}

struct Fixture {
    temp: TempDir,
    client: Arc<FakeClient>,
    notifier: Arc<MemoryNotifier>,
    orchestrator: Orchestrator,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(FakeClient::default());
        let notifier = Arc::new(MemoryNotifier::new());
        let orchestrator = Orchestrator::new(
            Vault::new(temp.path()),
            Arc::new(CurrentClient::new("https://api.test", client.clone())),
            TemplateOptions::default(),
            notifier.clone(),
        );
        Self {
            temp,
            client,
            notifier,
            orchestrator,
        }
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.temp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.temp.path().join(rel)).unwrap()
    }
}

fn tracked_note(url: &str) -> String {
    format!("---\nrepo_url: {url}\n---\n# old note\nmy thoughts")
}

#[tokio::test]
async fn test_first_refresh_replaces_legacy_body() {
    let fx = Fixture::new();
    fx.client.set("acme", "widget", 42);
    fx.write("widget.md", &tracked_note("https://example-host/acme/widget"));

    let outcome = fx
        .orchestrator
        .refresh_one(Path::new("widget.md"), false)
        .await;

    assert_eq!(outcome.status, RefreshStatus::Synced);
    let content = fx.read("widget.md");
    assert!(content.contains("stars: 42"));
    assert!(content.contains("language: Rust"));
    assert!(content.contains("repo_url: https://example-host/acme/widget"));
    assert!(content.ends_with(&format!("{SENTINEL}\n")));
    assert!(!content.contains("old note"));
    assert!(!content.contains("my thoughts"));
    assert_eq!(
        fx.notifier.messages(),
        vec![(NoticeLevel::Info, "widget.md: refreshed".to_string())]
    );
}

#[tokio::test]
async fn test_second_refresh_keeps_user_section() {
    let fx = Fixture::new();
    fx.client.set("acme", "widget", 42);
    fx.write("widget.md", &tracked_note("https://example-host/acme/widget"));
    fx.orchestrator
        .refresh_one(Path::new("widget.md"), true)
        .await;

    let mut content = fx.read("widget.md");
    content.push_str("\n\n## my thoughts\nkeep this");
    fx.write("widget.md", &content);
    fx.client.set("acme", "widget", 43);

    let outcome = fx.orchestrator.refresh_one(Path::new("widget.md"), true).await;

    assert!(outcome.is_success());
    let content = fx.read("widget.md");
    assert!(content.contains("stars: 43"));
    assert!(!content.contains("stars: 42"));
    assert!(content.ends_with("\n\n## my thoughts\nkeep this"));
    assert_eq!(split(&content).unwrap().1, "\n\n## my thoughts\nkeep this");
}

#[tokio::test]
async fn test_untracked_note_is_left_alone() {
    let fx = Fixture::new();
    let original = "---\ntitle: Groceries\n---\n- milk\n";
    fx.write("list.md", original);

    let outcome = fx.orchestrator.refresh_one(Path::new("list.md"), false).await;

    assert_eq!(outcome.status, RefreshStatus::Untracked);
    assert_eq!(fx.read("list.md"), original);
    assert!(fx.client.calls().is_empty());
    assert_eq!(fx.notifier.messages()[0].0, NoticeLevel::Warning);
}

#[tokio::test]
async fn test_invalid_reference_is_reported() {
    let fx = Fixture::new();
    let original = tracked_note("not a url");
    fx.write("bad.md", &original);

    let outcome = fx.orchestrator.refresh_one(Path::new("bad.md"), false).await;

    assert_eq!(
        outcome.status,
        RefreshStatus::InvalidReference("not a url".to_string())
    );
    assert_eq!(fx.read("bad.md"), original);
    assert_eq!(fx.notifier.messages()[0].0, NoticeLevel::Error);
}

#[tokio::test]
async fn test_fetch_failure_leaves_note_and_silent_mutes_notice() {
    let fx = Fixture::new();
    fx.client.fail("acme", "gone", RemoteError::not_found("repository acme/gone"));
    let original = tracked_note("https://github.com/acme/gone");
    fx.write("gone.md", &original);

    let outcome = fx.orchestrator.refresh_one(Path::new("gone.md"), true).await;

    assert!(matches!(outcome.status, RefreshStatus::FetchFailed(ref e) if e.is_not_found()));
    assert_eq!(fx.read("gone.md"), original);
    assert!(fx.notifier.messages().is_empty());

    fx.orchestrator.refresh_one(Path::new("gone.md"), false).await;
    assert_eq!(
        fx.notifier.messages(),
        vec![(
            NoticeLevel::Error,
            "gone.md: Not found: repository acme/gone".to_string()
        )]
    );
}

#[tokio::test]
async fn test_branch_is_passed_to_client() {
    let fx = Fixture::new();
    fx.client.set("acme", "widget", 1);
    fx.write(
        "widget.md",
        "---\nrepo_url: https://github.com/acme/widget\nbranch: dev\n---\n",
    );

    fx.orchestrator.refresh_one(Path::new("widget.md"), true).await;

    assert_eq!(
        fx.client.calls(),
        vec![("acme/widget".to_string(), Some("dev".to_string()))]
    );
    assert!(fx.read("widget.md").contains("branch: dev"));
}

#[tokio::test]
async fn test_missing_note_is_read_failure() {
    let fx = Fixture::new();
    let outcome = fx.orchestrator.refresh_one(Path::new("nope.md"), true).await;
    assert!(matches!(outcome.status, RefreshStatus::ReadFailed(_)));
}

#[tokio::test]
async fn test_note_deleted_during_fetch_stays_deleted() {
    let fx = Fixture::new();
    fx.client.set("acme", "widget", 42);
    fx.write("GitHub/acme-widget.md", &tracked_note("https://github.com/acme/widget"));
    fx.client.remove_during_fetch(&fx.temp.path().join("GitHub/acme-widget.md"));

    let outcome = fx
        .orchestrator
        .refresh_one(Path::new("GitHub/acme-widget.md"), false)
        .await;

    assert!(matches!(outcome.status, RefreshStatus::WriteFailed(_)));
    assert!(!fx.temp.path().join("GitHub/acme-widget.md").exists());
    let messages = fx.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, NoticeLevel::Error);
}

#[tokio::test]
async fn test_folder_deleted_during_fetch_is_not_recreated() {
    let fx = Fixture::new();
    fx.client.set("acme", "widget", 42);
    fx.write("GitHub/acme-widget.md", &tracked_note("https://github.com/acme/widget"));
    fx.client.remove_during_fetch(&fx.temp.path().join("GitHub"));

    let outcome = fx
        .orchestrator
        .refresh_one(Path::new("GitHub/acme-widget.md"), true)
        .await;

    assert!(matches!(outcome.status, RefreshStatus::WriteFailed(_)));
    assert!(!fx.temp.path().join("GitHub").exists());
}

#[tokio::test]
async fn test_refresh_all_continues_past_failure() {
    let fx = Fixture::new();
    fx.client.set("acme", "one", 1);
    fx.client.set("acme", "two", 2);
    fx.client.fail("acme", "three", RemoteError::other("boom"));
    fx.write("GitHub/one.md", &tracked_note("https://github.com/acme/one"));
    fx.write("GitHub/three.md", &tracked_note("https://github.com/acme/three"));
    fx.write("GitHub/two.md", &tracked_note("https://github.com/acme/two"));
    fx.write("journal.md", "today I wrote code\n");
    let failing_before = fx.read("GitHub/three.md");

    let outcomes = fx.orchestrator.refresh_all().await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 2);
    let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].path, Path::new("GitHub/three.md"));

    assert!(fx.read("GitHub/one.md").contains("stars: 1"));
    assert!(fx.read("GitHub/two.md").contains("stars: 2"));
    assert_eq!(fx.read("GitHub/three.md"), failing_before);
    assert_eq!(fx.read("journal.md"), "today I wrote code\n");
    assert!(fx.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_dashboard_lists_tracked_repositories() {
    let fx = Fixture::new();
    fx.client.set("acme", "one", 10);
    fx.client.set("acme", "two", 20);
    fx.write("GitHub/one.md", &tracked_note("https://github.com/acme/one"));
    fx.write("GitHub/two.md", &tracked_note("https://github.com/acme/two"));
    fx.write("GitHub/missing.md", &tracked_note("https://github.com/acme/missing"));
    fx.write(
        "Dashboard.md",
        &format!("---\ntags: [hubnotes, hubnotes-dashboard]\n---\nold\n{SENTINEL}\nmine\n"),
    );

    let outcome = fx
        .orchestrator
        .refresh_one(Path::new("Dashboard.md"), true)
        .await;

    assert_eq!(outcome.status, RefreshStatus::Synced);
    let content = fx.read("Dashboard.md");
    assert!(content.contains("[acme/two](GitHub/two.md) | 20"));
    assert!(content.contains("[acme/one](GitHub/one.md) | 10"));
    assert!(content.find("acme/two").unwrap() < content.find("acme/one").unwrap());
    assert!(content.contains("Not refreshed this time: acme/missing"));
    assert!(content.ends_with(&format!("{SENTINEL}\nmine\n")));
    assert!(!content.contains("old\n"));
    assert_eq!(
        TrackedMetadata::from_document(&content).kind(),
        DocumentKind::Dashboard
    );
}

#[tokio::test]
async fn test_dashboard_rate_limited_keeps_old_content() {
    let fx = Fixture::new();
    fx.client
        .fail("acme", "one", RemoteError::RateLimited { reset_at: None });
    fx.write("GitHub/one.md", &tracked_note("https://github.com/acme/one"));
    let original = "---\ntags:\n  - hubnotes-dashboard\n---\nold table\n";
    fx.write("Dashboard.md", original);

    let outcome = fx
        .orchestrator
        .refresh_one(Path::new("Dashboard.md"), true)
        .await;

    assert!(matches!(outcome.status, RefreshStatus::FetchFailed(ref e) if e.is_rate_limited()));
    assert_eq!(fx.read("Dashboard.md"), original);
}
