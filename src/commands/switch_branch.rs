use std::path::Path;

use tracing::info;

use super::error::CommandError;
use crate::reference::parse_reference;
use crate::refresh::{Orchestrator, RefreshOutcome};
use crate::vault::{set_frontmatter_field, DocumentKind, TrackedMetadata};

/// Point a repository note at another branch, then refresh it.
///
/// The branch is checked against the remote first, so an unknown branch
/// leaves the note untouched. An empty branch returns the note to the
/// default branch.
pub async fn switch_branch(
    orchestrator: &Orchestrator,
    path: &Path,
    branch: &str,
) -> Result<RefreshOutcome, CommandError> {
    let branch = branch.trim();
    {
        let _guard = orchestrator.lock(path).await;
        let content = orchestrator.vault().read(path).await?;
        let DocumentKind::Repository { repo_url, .. } =
            TrackedMetadata::from_document(&content).kind()
        else {
            return Err(CommandError::NotTracked(path.to_path_buf()));
        };
        let repo =
            parse_reference(&repo_url).ok_or(CommandError::InvalidReference(repo_url))?;

        let value = if branch.is_empty() {
            serde_yaml::Value::Null
        } else {
            orchestrator
                .client()
                .current()
                .fetch_snapshot(&repo, Some(branch))
                .await?;
            serde_yaml::Value::String(branch.to_string())
        };

        let updated = set_frontmatter_field(&content, "branch", value)?;
        orchestrator
            .vault()
            .replace(path, &updated)
            .await
            .map_err(CommandError::from_write)?;
        info!(repo = %repo, branch, path = %path.display(), "Switched branch");
    }
    Ok(orchestrator.refresh_one(path, false).await)
}
