use std::path::{Path, PathBuf};

use super::error::CommandError;
use crate::refresh::{Orchestrator, RefreshOutcome};
use crate::sync::SENTINEL;
use crate::template::SummaryFrontmatter;
use crate::utils::now_iso;
use crate::vault::{generate_frontmatter, DASHBOARD_TAG, MANAGED_TAG};

pub const DASHBOARD_FILE: &str = "Dashboard.md";

#[must_use]
pub fn dashboard_path(folder: &str) -> PathBuf {
    Path::new(folder).join(DASHBOARD_FILE)
}

/// Create the dashboard note if needed, then refresh it.
///
/// An existing dashboard is refreshed in place, so the user section below
/// the sentinel survives re-running the command.
pub async fn create_dashboard(
    orchestrator: &Orchestrator,
    folder: &str,
) -> Result<RefreshOutcome, CommandError> {
    let path = dashboard_path(folder);
    if !orchestrator.vault().exists(&path).await {
        let frontmatter = SummaryFrontmatter {
            updated: now_iso(),
            tags: vec![MANAGED_TAG.to_string(), DASHBOARD_TAG.to_string()],
            repositories: Vec::new(),
        };
        let stub = generate_frontmatter(&frontmatter, &format!("\n{SENTINEL}\n"))?;
        let _guard = orchestrator.lock(&path).await;
        orchestrator
            .vault()
            .create(&path, &stub)
            .await
            .map_err(CommandError::from_write)?;
    }
    Ok(orchestrator.refresh_one(&path, false).await)
}
