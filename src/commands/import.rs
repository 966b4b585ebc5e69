use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{info, warn};

use super::create::{note_path, write_repository_note};
use super::error::CommandError;
use crate::reference::parse_reference;
use crate::refresh::{NoticeLevel, Orchestrator};
use crate::vault::{DocumentKind, TrackedMetadata};

/// Result of importing an owner's repositories
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Notes written by this run
    pub created: Vec<PathBuf>,
    /// Repositories that already had a note, by full name
    pub skipped: Vec<String>,
    /// Repositories whose note could not be written, with the reason
    pub failed: Vec<(String, String)>,
}

/// Full names (lowercased) of every repository already tracked in the vault.
pub async fn tracked_repositories(
    orchestrator: &Orchestrator,
) -> Result<HashSet<String>, CommandError> {
    let mut tracked = HashSet::new();
    for note in orchestrator.vault().list_notes()? {
        let Ok(content) = orchestrator.vault().read(&note).await else {
            continue;
        };
        if let DocumentKind::Repository { repo_url, .. } =
            TrackedMetadata::from_document(&content).kind()
        {
            if let Some(repo) = parse_reference(&repo_url) {
                tracked.insert(repo.full_name().to_lowercase());
            }
        }
    }
    Ok(tracked)
}

/// Create a note for every repository of `owner` that is not tracked yet.
///
/// The listing already carries full snapshots, so no per-repository fetch is
/// made. A note that cannot be written does not stop the import.
pub async fn import_owner(
    orchestrator: &Orchestrator,
    folder: &str,
    owner: &str,
) -> Result<ImportReport, CommandError> {
    let listed = orchestrator
        .client()
        .current()
        .list_tracked_set(owner)
        .await?;
    let mut tracked = tracked_repositories(orchestrator).await?;

    let mut report = ImportReport::default();
    for snapshot in listed {
        let repo = snapshot.reference();
        let key = repo.full_name().to_lowercase();
        if tracked.contains(&key) {
            report.skipped.push(repo.full_name());
            continue;
        }

        let path = note_path(folder, &repo);
        match write_repository_note(orchestrator, &path, &snapshot, None).await {
            Ok(()) => {
                tracked.insert(key);
                report.created.push(path);
            }
            Err(e) => {
                warn!(repo = %repo, "Import skipped: {e}");
                report.failed.push((repo.full_name(), e.to_string()));
            }
        }
    }

    info!(
        owner,
        created = report.created.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Import finished"
    );
    orchestrator.notify(
        NoticeLevel::Info,
        &format!(
            "Imported {} repositories from {owner} ({} already tracked)",
            report.created.len(),
            report.skipped.len()
        ),
    );
    Ok(report)
}
