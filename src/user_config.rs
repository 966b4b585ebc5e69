//! Vault-level configuration loaded from `<vault>/.hubnotes/config.toml`.
//!
//! The file is optional; if it does not exist all fields fall back to their
//! `Default` values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::remote::GITHUB_API_URL;
use crate::template::TemplateOptions;
use crate::utils::get_config_path;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Folder new repository notes are created in.
pub const DEFAULT_FOLDER: &str = "GitHub";

/// Vault configuration, deserialized from `<vault>/.hubnotes/config.toml`.
///
/// All fields are optional at the TOML level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Personal access token; empty means unauthenticated access.
    pub auth_token: String,
    /// Folder, relative to the vault root, where new notes are created.
    pub default_folder: String,
    /// Minutes between background refresh cycles; 0 disables them.
    pub auto_refresh_interval_minutes: u64,
    pub api_base_url: String,
    pub template_options: TemplateOptions,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            default_folder: DEFAULT_FOLDER.to_string(),
            auto_refresh_interval_minutes: 0,
            api_base_url: GITHUB_API_URL.to_string(),
            template_options: TemplateOptions::default(),
        }
    }
}

impl UserConfig {
    /// Background refresh period, or `None` when disabled.
    #[must_use]
    pub fn refresh_interval(&self) -> Option<Duration> {
        interval_from_minutes(self.auto_refresh_interval_minutes)
    }

    /// Use `token` instead of the configured one when it is non-empty.
    #[must_use]
    pub fn with_token_override(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            self.auth_token = token.to_string();
        }
        self
    }
}

/// Convert a minutes setting into a timer period; 0 means disabled.
#[must_use]
pub fn interval_from_minutes(minutes: u64) -> Option<Duration> {
    (minutes > 0).then(|| Duration::from_secs(minutes.saturating_mul(60)))
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Load the configuration of the vault at `vault_path`.
///
/// Returns `Ok(UserConfig::default())` if the file does not exist.
pub async fn load_config(vault_path: &Path) -> Result<UserConfig, UserConfigError> {
    load_config_from(&get_config_path(vault_path)).await
}

/// Load configuration from an explicit file path.
pub async fn load_config_from(path: &Path) -> Result<UserConfig, UserConfigError> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(UserConfig::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: UserConfig = toml::from_str(&content)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
#[path = "user_config_tests.rs"]
mod tests;
