use serde::{Deserialize, Serialize};

use crate::snapshot::RepositorySnapshot;
use crate::sync::SENTINEL;
use crate::vault::{MANAGED_TAG, REPOSITORY_TAG};

/// Which generated note a template renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    Repository,
    Dashboard,
    Comparison,
}

impl TemplateType {
    /// Override file name under `<vault>/.hubnotes/templates/`.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Repository => "repository.md",
            Self::Dashboard => "dashboard.md",
            Self::Comparison => "comparison.md",
        }
    }

    #[must_use]
    pub fn default_template(self) -> &'static str {
        match self {
            Self::Repository => include_str!("defaults/repository.md"),
            Self::Dashboard => include_str!("defaults/dashboard.md"),
            Self::Comparison => include_str!("defaults/comparison.md"),
        }
    }
}

/// Toggles for the optional sections of a repository note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct TemplateOptions {
    pub show_description: bool,
    pub show_stats: bool,
    pub show_topics: bool,
    pub show_latest_commit: bool,
    pub show_links: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            show_description: true,
            show_stats: true,
            show_topics: true,
            show_latest_commit: true,
            show_links: true,
        }
    }
}

/// Collapse a remote value onto one line and strip the sentinel from it.
///
/// Remote text is rendered into the generated region, so it must never be
/// able to produce a line that reads as the sentinel.
#[must_use]
pub fn single_line(value: &str) -> String {
    value
        .replace(SENTINEL, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn day_of(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|d| d.with_timezone(&chrono::Utc).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitContext {
    pub message: String,
    pub author: String,
    pub date: String,
    pub day: String,
    pub sha: String,
}

/// Context for repository and comparison templates.
///
/// Placeholders: `{{full_name}}`, `{{description}}`, `{{stars}}`, `{{forks}}`,
/// `{{open_issues}}`, `{{language}}`, `{{topics}}`, `{{latest_commit.*}}`,
/// `{{url}}`, `{{homepage}}`, `{{branch}}`, `{{updated}}`, `{{options.*}}`
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryTemplateContext {
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub language: String,
    pub created_at: String,
    pub created_day: String,
    pub url: String,
    pub homepage: String,
    pub default_branch: String,
    pub branch: String,
    pub topics: Vec<String>,
    pub latest_commit: CommitContext,
    pub updated: String,
    pub options: TemplateOptions,
    pub sentinel: &'static str,
}

impl RepositoryTemplateContext {
    #[must_use]
    pub fn new(
        snapshot: &RepositorySnapshot,
        branch: Option<&str>,
        options: TemplateOptions,
        updated: &str,
    ) -> Self {
        let commit = &snapshot.latest_commit;
        Self {
            owner: single_line(&snapshot.owner),
            name: single_line(&snapshot.name),
            full_name: single_line(&snapshot.full_name),
            description: single_line(&snapshot.description),
            stars: snapshot.stars,
            forks: snapshot.forks,
            open_issues: snapshot.open_issues,
            language: single_line(&snapshot.language),
            created_at: snapshot.created_at.clone(),
            created_day: day_of(&snapshot.created_at),
            url: single_line(&snapshot.url),
            homepage: single_line(&snapshot.homepage),
            default_branch: single_line(&snapshot.default_branch),
            branch: branch.map(single_line).unwrap_or_default(),
            topics: snapshot.topics.iter().map(|t| single_line(t)).collect(),
            latest_commit: CommitContext {
                message: single_line(&commit.message),
                author: single_line(&commit.author),
                date: commit.date.clone(),
                day: day_of(&commit.date),
                sha: single_line(&commit.sha),
            },
            updated: updated.to_string(),
            options,
            sentinel: SENTINEL,
        }
    }
}

/// One row of the dashboard table.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardRow {
    pub full_name: String,
    /// Link target of the repository note, relative to the vault root
    pub note: String,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub language: String,
    pub last_commit: String,
}

impl DashboardRow {
    #[must_use]
    pub fn new(snapshot: &RepositorySnapshot, note: &str) -> Self {
        Self {
            full_name: single_line(&snapshot.full_name),
            note: note.replace('\\', "/").replace(' ', "%20"),
            stars: snapshot.stars,
            forks: snapshot.forks,
            open_issues: snapshot.open_issues,
            language: single_line(&snapshot.language),
            last_commit: snapshot.latest_commit_day(),
        }
    }
}

/// Context for the dashboard template.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardTemplateContext {
    pub rows: Vec<DashboardRow>,
    pub count: usize,
    pub total_stars: u64,
    /// Tracked repositories whose fetch failed this cycle
    pub failed: Vec<String>,
    pub updated: String,
    pub sentinel: &'static str,
}

impl DashboardTemplateContext {
    #[must_use]
    pub fn new(rows: Vec<DashboardRow>, failed: Vec<String>, updated: &str) -> Self {
        let total_stars = rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.stars));
        Self {
            count: rows.len(),
            rows,
            total_stars,
            failed: failed.iter().map(|f| single_line(f)).collect(),
            updated: updated.to_string(),
            sentinel: SENTINEL,
        }
    }
}

/// Context for the comparison template.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonTemplateContext {
    pub title: String,
    pub repositories: Vec<RepositoryTemplateContext>,
    pub updated: String,
    pub sentinel: &'static str,
}

impl ComparisonTemplateContext {
    #[must_use]
    pub fn new(title: &str, repositories: Vec<RepositoryTemplateContext>, updated: &str) -> Self {
        Self {
            title: single_line(title),
            repositories,
            updated: updated.to_string(),
            sentinel: SENTINEL,
        }
    }
}

/// Front matter of a repository note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryFrontmatter {
    pub repo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub updated: String,
    pub tags: Vec<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub language: String,
}

impl RepositoryFrontmatter {
    /// Front matter for a repository note tracking `repo_url`.
    #[must_use]
    pub fn new(
        snapshot: &RepositorySnapshot,
        repo_url: &str,
        branch: Option<&str>,
        updated: &str,
    ) -> Self {
        Self {
            repo_url: repo_url.to_string(),
            branch: branch.map(str::to_string),
            updated: updated.to_string(),
            tags: vec![MANAGED_TAG.to_string(), REPOSITORY_TAG.to_string()],
            stars: snapshot.stars,
            forks: snapshot.forks,
            open_issues: snapshot.open_issues,
            language: snapshot.language.clone(),
        }
    }
}

/// Front matter of the dashboard and comparison notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFrontmatter {
    pub updated: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<String>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
