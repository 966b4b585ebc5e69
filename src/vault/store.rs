//! Filesystem-backed note store rooted at a vault directory.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::utils::atomic_write;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Note not found: {0}")]
    NotFound(PathBuf),

    #[error("Note already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl VaultError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// A directory of Markdown notes.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a note path; relative paths are taken from the vault root.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Every `.md` note in the vault, relative to the root, sorted.
    ///
    /// Dot directories (`.hubnotes`, `.git`, editor state) are skipped.
    pub fn list_notes(&self) -> Result<Vec<PathBuf>, VaultError> {
        let mut notes = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                VaultError::io(&path, io::Error::other(e.to_string()))
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
                if let Ok(relative) = path.strip_prefix(&self.root) {
                    notes.push(relative.to_path_buf());
                }
            }
        }
        notes.sort();
        debug!(count = notes.len(), root = %self.root.display(), "Listed vault notes");
        Ok(notes)
    }

    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }

    pub async fn read(&self, path: &Path) -> Result<String, VaultError> {
        let full = self.resolve(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| VaultError::io(&full, e))
    }

    /// Replace a note's content atomically, creating parent folders.
    pub async fn write(&self, path: &Path, content: &str) -> Result<(), VaultError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VaultError::io(parent, e))?;
        }
        atomic_write(&full, content)
            .await
            .map_err(|e| VaultError::io(&full, e))
    }

    /// Replace the content of an existing note atomically.
    ///
    /// Never creates the note or its folders; a missing target is `NotFound`.
    pub async fn replace(&self, path: &Path, content: &str) -> Result<(), VaultError> {
        let full = self.resolve(path);
        let is_file = tokio::fs::metadata(&full)
            .await
            .map_err(|e| VaultError::io(&full, e))?
            .is_file();
        if !is_file {
            return Err(VaultError::NotFound(full));
        }
        atomic_write(&full, content)
            .await
            .map_err(|e| VaultError::io(&full, e))
    }

    /// Write a new note, refusing to overwrite an existing one.
    pub async fn create(&self, path: &Path, content: &str) -> Result<(), VaultError> {
        if self.exists(path).await {
            return Err(VaultError::AlreadyExists(self.resolve(path)));
        }
        self.write(path, content).await
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
