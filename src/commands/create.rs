use std::path::{Path, PathBuf};

use tracing::info;

use super::error::CommandError;
use crate::reference::{parse_reference, RepoRef};
use crate::refresh::{NoticeLevel, Orchestrator};
use crate::snapshot::RepositorySnapshot;
use crate::sync::splice;
use crate::template::TemplateType;
use crate::utils::now_iso;

/// Vault-relative path of the note tracking `repo`.
#[must_use]
pub fn note_path(folder: &str, repo: &RepoRef) -> PathBuf {
    Path::new(folder).join(format!("{}-{}.md", repo.owner, repo.name))
}

/// URL stored in `repo_url`: the remote's own page when reported.
fn stored_url(snapshot: &RepositorySnapshot, repo: &RepoRef) -> String {
    if snapshot.url.is_empty() {
        repo.canonical_url()
    } else {
        snapshot.url.clone()
    }
}

/// Render and write a new repository note. Fails if the path is taken.
pub(crate) async fn write_repository_note(
    orchestrator: &Orchestrator,
    path: &Path,
    snapshot: &RepositorySnapshot,
    branch: Option<&str>,
) -> Result<(), CommandError> {
    let template = orchestrator
        .engine()
        .load_template(orchestrator.vault().root(), TemplateType::Repository)
        .await?;
    let repo_url = stored_url(snapshot, &snapshot.reference());
    let rendered =
        orchestrator.render_repository_note(&template, snapshot, &repo_url, branch, &now_iso())?;

    let _guard = orchestrator.lock(path).await;
    orchestrator
        .vault()
        .create(path, &splice("", &rendered))
        .await
        .map_err(CommandError::from_write)
}

/// Create a repository note from a pasted URL.
pub async fn create_from_reference(
    orchestrator: &Orchestrator,
    folder: &str,
    reference: &str,
    branch: Option<&str>,
) -> Result<PathBuf, CommandError> {
    let repo = parse_reference(reference)
        .ok_or_else(|| CommandError::InvalidReference(reference.to_string()))?;
    let path = note_path(folder, &repo);
    if orchestrator.vault().exists(&path).await {
        return Err(CommandError::WriteFailure(format!(
            "{} already exists",
            path.display()
        )));
    }

    let snapshot = orchestrator
        .client()
        .current()
        .fetch_snapshot(&repo, branch)
        .await?;
    write_repository_note(orchestrator, &path, &snapshot, branch).await?;

    info!(repo = %repo, path = %path.display(), "Created repository note");
    orchestrator.notify(NoticeLevel::Info, &format!("Created {}", path.display()));
    Ok(path)
}
