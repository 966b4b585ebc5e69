//! Selecting notes, fetching snapshots and writing merged results.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;
use tracing::{debug, error, info, instrument, warn};

use super::locks::DocumentLocks;
use super::notifier::{NoticeLevel, Notifier};
use super::outcome::{tally, RefreshOutcome, RefreshStatus};
use crate::reference::parse_reference;
use crate::remote::{CurrentClient, RemoteError};
use crate::snapshot::RepositorySnapshot;
use crate::sync::merge;
use crate::template::{
    DashboardRow, DashboardTemplateContext, RepositoryFrontmatter, RepositoryTemplateContext,
    SummaryFrontmatter, TemplateEngine, TemplateError, TemplateOptions, TemplateType,
};
use crate::utils::now_iso;
use crate::vault::{DocumentKind, TrackedMetadata, Vault, DASHBOARD_TAG, MANAGED_TAG};

/// Drives refreshes of repository notes and dashboards in one vault.
///
/// Notes are processed one at a time; each note is guarded by its own lock
/// for the whole read, fetch, merge and write sequence.
pub struct Orchestrator {
    vault: Vault,
    client: Arc<CurrentClient>,
    engine: TemplateEngine,
    options: TemplateOptions,
    locks: DocumentLocks,
    notifier: Arc<dyn Notifier>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        vault: Vault,
        client: Arc<CurrentClient>,
        options: TemplateOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            vault,
            client,
            engine: TemplateEngine::new(),
            options,
            locks: DocumentLocks::new(),
            notifier,
        }
    }

    #[must_use]
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    #[must_use]
    pub fn client(&self) -> &Arc<CurrentClient> {
        &self.client
    }

    #[must_use]
    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    #[must_use]
    pub fn options(&self) -> TemplateOptions {
        self.options
    }

    pub fn notify(&self, level: NoticeLevel, message: &str) {
        self.notifier.notify(level, message);
    }

    /// Exclusive access to one note, shared with refreshes of the same note.
    pub async fn lock(&self, path: &Path) -> OwnedMutexGuard<()> {
        self.locks.acquire(&self.vault.resolve(path)).await
    }

    /// Render a complete repository note for `snapshot`.
    pub fn render_repository_note(
        &self,
        template: &str,
        snapshot: &RepositorySnapshot,
        repo_url: &str,
        branch: Option<&str>,
        updated: &str,
    ) -> Result<String, TemplateError> {
        let frontmatter = RepositoryFrontmatter::new(snapshot, repo_url, branch, updated);
        let context = RepositoryTemplateContext::new(snapshot, branch, self.options, updated);
        self.engine.render_repository(template, &frontmatter, &context)
    }

    /// Refresh one note.
    ///
    /// The note is left untouched on every failure. `silent` only suppresses
    /// notices; the outcome and the write-or-skip decision are the same.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn refresh_one(&self, path: &Path, silent: bool) -> RefreshOutcome {
        let status = {
            let _guard = self.lock(path).await;
            self.refresh_locked(path).await
        };
        self.report(path, &status, silent);
        RefreshOutcome {
            path: path.to_path_buf(),
            status,
        }
    }

    /// Refresh every repository note and dashboard in the vault.
    ///
    /// Runs sequentially, never stops at a failed note, and returns one
    /// outcome per sync target. Untracked notes produce no outcome.
    pub async fn refresh_all(&self) -> Vec<RefreshOutcome> {
        let notes = match self.vault.list_notes() {
            Ok(notes) => notes,
            Err(e) => {
                error!("Could not list notes: {e}");
                return Vec::new();
            }
        };

        let mut outcomes = Vec::new();
        for note in notes {
            let outcome = self.refresh_one(&note, true).await;
            if outcome.status != RefreshStatus::Untracked {
                outcomes.push(outcome);
            }
        }

        let (synced, failed) = tally(&outcomes);
        let remaining = self
            .client
            .current()
            .last_rate_budget()
            .map(|b| b.remaining);
        info!(synced, failed, ?remaining, "Refresh cycle finished");
        outcomes
    }

    async fn refresh_locked(&self, path: &Path) -> RefreshStatus {
        let content = match self.vault.read(path).await {
            Ok(content) => content,
            Err(e) => return RefreshStatus::ReadFailed(e.to_string()),
        };

        match TrackedMetadata::from_document(&content).kind() {
            DocumentKind::Untracked => RefreshStatus::Untracked,
            DocumentKind::Repository { repo_url, branch } => {
                self.sync_repository(path, &content, &repo_url, branch.as_deref())
                    .await
            }
            DocumentKind::Dashboard => self.sync_dashboard(path, &content).await,
        }
    }

    async fn sync_repository(
        &self,
        path: &Path,
        content: &str,
        repo_url: &str,
        branch: Option<&str>,
    ) -> RefreshStatus {
        let Some(repo) = parse_reference(repo_url) else {
            return RefreshStatus::InvalidReference(repo_url.to_string());
        };

        let client = self.client.current();
        let snapshot = match client.fetch_snapshot(&repo, branch).await {
            Ok(snapshot) => snapshot,
            Err(e) => return RefreshStatus::FetchFailed(e),
        };

        let template = match self
            .engine
            .load_template(self.vault.root(), TemplateType::Repository)
            .await
        {
            Ok(template) => template,
            Err(e) => return RefreshStatus::RenderFailed(e.to_string()),
        };

        let updated = now_iso();
        let merged = merge(content, &snapshot, |s| {
            self.render_repository_note(&template, s, repo_url, branch, &updated)
        });
        match merged {
            Ok(merged) => self.write(path, &merged).await,
            Err(e) => RefreshStatus::RenderFailed(e.to_string()),
        }
    }

    async fn sync_dashboard(&self, path: &Path, content: &str) -> RefreshStatus {
        let notes = match self.vault.list_notes() {
            Ok(notes) => notes,
            Err(e) => return RefreshStatus::ReadFailed(e.to_string()),
        };
        let own_path = self.vault.resolve(path);
        let client = self.client.current();

        let mut rows = Vec::new();
        let mut failed = Vec::new();
        for note in notes {
            if self.vault.resolve(&note) == own_path {
                continue;
            }
            let Ok(text) = self.vault.read(&note).await else {
                continue;
            };
            let DocumentKind::Repository { repo_url, branch } =
                TrackedMetadata::from_document(&text).kind()
            else {
                continue;
            };
            let Some(repo) = parse_reference(&repo_url) else {
                failed.push(repo_url);
                continue;
            };
            match client.fetch_snapshot(&repo, branch.as_deref()).await {
                Ok(snapshot) => rows.push(DashboardRow::new(&snapshot, &note.to_string_lossy())),
                // Every further call would fail the same way; keep the old dashboard.
                Err(e @ RemoteError::RateLimited { .. }) => return RefreshStatus::FetchFailed(e),
                Err(e) => {
                    warn!(repo = %repo, "Dashboard entry not refreshed: {e}");
                    failed.push(repo.full_name());
                }
            }
        }
        rows.sort_by(|a, b| b.stars.cmp(&a.stars));

        let template = match self
            .engine
            .load_template(self.vault.root(), TemplateType::Dashboard)
            .await
        {
            Ok(template) => template,
            Err(e) => return RefreshStatus::RenderFailed(e.to_string()),
        };

        let updated = now_iso();
        let frontmatter = SummaryFrontmatter {
            updated: updated.clone(),
            tags: vec![MANAGED_TAG.to_string(), DASHBOARD_TAG.to_string()],
            repositories: Vec::new(),
        };
        let context = DashboardTemplateContext::new(rows, failed, &updated);
        let merged = merge(content, &context, |ctx| {
            self.engine.render_dashboard(&template, &frontmatter, ctx)
        });
        match merged {
            Ok(merged) => self.write(path, &merged).await,
            Err(e) => RefreshStatus::RenderFailed(e.to_string()),
        }
    }

    /// Replace an existing note. A note removed while its snapshot was being
    /// fetched stays removed.
    async fn write(&self, path: &Path, content: &str) -> RefreshStatus {
        match self.vault.replace(path, content).await {
            Ok(()) => RefreshStatus::Synced,
            Err(e) => RefreshStatus::WriteFailed(e.to_string()),
        }
    }

    fn report(&self, path: &Path, status: &RefreshStatus, silent: bool) {
        let shown = path.display();
        let level = match status {
            RefreshStatus::Synced => {
                info!("Refreshed {shown}");
                NoticeLevel::Info
            }
            RefreshStatus::Untracked => {
                debug!("Skipped untracked note {shown}");
                NoticeLevel::Warning
            }
            other if other.is_quiet_skip() => {
                if silent {
                    debug!("Skipped {shown}: {other}");
                } else {
                    warn!("Could not refresh {shown}: {other}");
                }
                NoticeLevel::Error
            }
            other => {
                error!("Could not refresh {shown}: {other}");
                NoticeLevel::Error
            }
        };
        if !silent {
            self.notifier.notify(level, &format!("{shown}: {status}"));
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
