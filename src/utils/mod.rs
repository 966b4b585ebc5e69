mod atomic;

pub use atomic::atomic_write;

use std::path::{Path, PathBuf};

/// The name of the per-vault hubnotes folder
pub const HUBNOTES_FOLDER: &str = ".hubnotes";

/// The name of the vault configuration file
pub const CONFIG_FILE: &str = "config.toml";

/// Get the path to the .hubnotes folder of a vault
#[must_use]
pub fn get_hubnotes_path(vault_path: &Path) -> PathBuf {
    vault_path.join(HUBNOTES_FOLDER)
}

/// Get the path to the vault configuration file
#[must_use]
pub fn get_config_path(vault_path: &Path) -> PathBuf {
    get_hubnotes_path(vault_path).join(CONFIG_FILE)
}

/// Get current timestamp in ISO 8601 format
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Format a path for display, replacing home directory with ~/
#[must_use]
pub fn format_display_path(path: &str) -> String {
    replace_homedir::replace_homedir(path, "~")
}

#[cfg(test)]
#[path = "utils_tests.rs"]
mod tests;
