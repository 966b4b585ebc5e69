use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use super::types::{
    ComparisonTemplateContext, DashboardTemplateContext, RepositoryFrontmatter,
    RepositoryTemplateContext, SummaryFrontmatter, TemplateType,
};
use crate::utils::get_hubnotes_path;
use crate::vault::{generate_frontmatter, FrontmatterError};

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::TemplateError),
    #[error("Render error: {0}")]
    RenderError(#[from] handlebars::RenderError),
    #[error("Frontmatter error: {0}")]
    FrontmatterError(#[from] FrontmatterError),
}

/// Renders generated notes: YAML front matter followed by a handlebars body.
///
/// Output is Markdown, so HTML escaping is disabled.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    #[must_use]
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Get the templates directory path
    #[must_use]
    pub fn get_templates_path(vault_path: &Path) -> PathBuf {
        get_hubnotes_path(vault_path).join("templates")
    }

    /// Load the vault override for `template_type`, falling back to the embedded default.
    pub async fn load_template(
        &self,
        vault_path: &Path,
        template_type: TemplateType,
    ) -> Result<String, TemplateError> {
        let template_path = Self::get_templates_path(vault_path).join(template_type.file_name());
        if fs::try_exists(&template_path).await.unwrap_or(false) {
            debug!(path = %template_path.display(), "Using template override");
            Ok(fs::read_to_string(&template_path).await?)
        } else {
            Ok(template_type.default_template().to_string())
        }
    }

    fn render_note<F: Serialize, C: Serialize>(
        &self,
        template: &str,
        frontmatter: &F,
        context: &C,
    ) -> Result<String, TemplateError> {
        let body = self.handlebars.render_template(template, context)?;
        Ok(generate_frontmatter(frontmatter, &format!("\n{body}"))?)
    }

    pub fn render_repository(
        &self,
        template: &str,
        frontmatter: &RepositoryFrontmatter,
        context: &RepositoryTemplateContext,
    ) -> Result<String, TemplateError> {
        self.render_note(template, frontmatter, context)
    }

    pub fn render_dashboard(
        &self,
        template: &str,
        frontmatter: &SummaryFrontmatter,
        context: &DashboardTemplateContext,
    ) -> Result<String, TemplateError> {
        self.render_note(template, frontmatter, context)
    }

    pub fn render_comparison(
        &self,
        template: &str,
        frontmatter: &SummaryFrontmatter,
        context: &ComparisonTemplateContext,
    ) -> Result<String, TemplateError> {
        self.render_note(template, frontmatter, context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
