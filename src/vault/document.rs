//! What a note's front matter says about how it is synchronized.

use serde_yaml::Value;

use super::frontmatter::parse_frontmatter_raw;

/// Tag carried by every note hubnotes generates.
pub const MANAGED_TAG: &str = "hubnotes";
/// Tag marking a repository note.
pub const REPOSITORY_TAG: &str = "hubnotes-repo";
/// Tag marking a dashboard note.
pub const DASHBOARD_TAG: &str = "hubnotes-dashboard";

/// Synchronization-relevant metadata read from a note.
///
/// Parsing is lenient: a note with no or malformed front matter yields the
/// empty default, which classifies as [`DocumentKind::Untracked`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedMetadata {
    pub repo_url: String,
    pub branch: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Dashboard,
    Repository {
        repo_url: String,
        branch: Option<String>,
    },
    Untracked,
}

impl DocumentKind {
    #[must_use]
    pub fn is_sync_target(&self) -> bool {
        !matches!(self, Self::Untracked)
    }
}

fn string_field(metadata: &Value, key: &str) -> Option<String> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn tags_field(metadata: &Value) -> Vec<String> {
    match metadata.get("tags") {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .collect(),
        Some(Value::String(s)) => s
            .split([',', ' '])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

impl TrackedMetadata {
    #[must_use]
    pub fn from_value(metadata: &Value) -> Self {
        Self {
            repo_url: string_field(metadata, "repo_url").unwrap_or_default(),
            branch: string_field(metadata, "branch"),
            tags: tags_field(metadata),
        }
    }

    #[must_use]
    pub fn from_document(content: &str) -> Self {
        parse_frontmatter_raw(content)
            .map(|(value, _)| Self::from_value(&value))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        if self.has_tag(DASHBOARD_TAG) {
            DocumentKind::Dashboard
        } else if !self.repo_url.is_empty() {
            DocumentKind::Repository {
                repo_url: self.repo_url.clone(),
                branch: self.branch.clone(),
            }
        } else {
            DocumentKind::Untracked
        }
    }
}
