use std::path::{Path, PathBuf};

use tracing::info;

use super::error::CommandError;
use crate::reference::parse_reference;
use crate::refresh::{NoticeLevel, Orchestrator};
use crate::snapshot::ComparisonSet;
use crate::sync::splice;
use crate::template::{
    ComparisonTemplateContext, RepositoryTemplateContext, SummaryFrontmatter, TemplateType,
};
use crate::utils::now_iso;
use crate::vault::MANAGED_TAG;

/// Tag marking comparison notes
pub const COMPARISON_TAG: &str = "hubnotes-comparison";

/// Subfolder of the default folder holding comparison notes
pub const COMPARISONS_FOLDER: &str = "Comparisons";

/// Result of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareResult {
    pub path: PathBuf,
    pub title: String,
}

/// Fetch every referenced repository and write one comparison note.
///
/// All references are parsed before any fetch; a single failed fetch aborts
/// the comparison without writing anything. Comparison notes are snapshots:
/// they are not part of later refreshes.
pub async fn compare_repositories(
    orchestrator: &Orchestrator,
    folder: &str,
    references: &[String],
) -> Result<CompareResult, CommandError> {
    let repos = references
        .iter()
        .map(|r| parse_reference(r).ok_or_else(|| CommandError::InvalidReference(r.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    let client = orchestrator.client().current();
    let mut set = ComparisonSet::new();
    for repo in &repos {
        set.push(client.fetch_snapshot(repo, None).await?)?;
    }
    let snapshots = set.finish()?;

    let title = snapshots
        .iter()
        .map(|s| s.full_name.as_str())
        .collect::<Vec<_>>()
        .join(" vs ");
    let path = Path::new(folder)
        .join(COMPARISONS_FOLDER)
        .join(format!("{}.md", slug::slugify(&title)));

    let updated = now_iso();
    let frontmatter = SummaryFrontmatter {
        updated: updated.clone(),
        tags: vec![MANAGED_TAG.to_string(), COMPARISON_TAG.to_string()],
        repositories: snapshots.iter().map(|s| s.url.clone()).collect(),
    };
    let context = ComparisonTemplateContext::new(
        &title,
        snapshots
            .iter()
            .map(|s| RepositoryTemplateContext::new(s, None, orchestrator.options(), &updated))
            .collect(),
        &updated,
    );
    let template = orchestrator
        .engine()
        .load_template(orchestrator.vault().root(), TemplateType::Comparison)
        .await?;
    let rendered = orchestrator
        .engine()
        .render_comparison(&template, &frontmatter, &context)?;

    {
        let _guard = orchestrator.lock(&path).await;
        orchestrator
            .vault()
            .create(&path, &splice("", &rendered))
            .await
            .map_err(CommandError::from_write)?;
    }

    info!(path = %path.display(), count = snapshots.len(), "Created comparison");
    orchestrator.notify(NoticeLevel::Info, &format!("Created {}", path.display()));
    Ok(CompareResult { path, title })
}
