use std::path::PathBuf;

use thiserror::Error;

use crate::remote::RemoteError;
use crate::snapshot::ComparisonError;
use crate::template::TemplateError;
use crate::vault::{FrontmatterError, VaultError};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Not a repository reference: '{0}'")]
    InvalidReference(String),

    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("Write failed: {0}")]
    WriteFailure(String),

    #[error("{} is not a tracked repository note", .0.display())]
    NotTracked(PathBuf),

    #[error("Vault error: {0}")]
    VaultError(#[from] VaultError),

    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),

    #[error("Frontmatter error: {0}")]
    FrontmatterError(#[from] FrontmatterError),

    #[error("{0}")]
    Comparison(#[from] ComparisonError),

    #[error("Background refresh is disabled; set auto_refresh_interval_minutes or pass --interval")]
    WatchDisabled,
}

impl CommandError {
    /// Map a failed note write, reporting path conflicts as write failures.
    pub(crate) fn from_write(error: VaultError) -> Self {
        match error {
            VaultError::AlreadyExists(path) => {
                Self::WriteFailure(format!("{} already exists", path.display()))
            }
            other => Self::WriteFailure(other.to_string()),
        }
    }
}
