//! Atomic note writes.
//!
//! Notes are written through a temporary file in the same directory and then
//! renamed over the target, so a failed refresh never leaves a half-written
//! note behind.

use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write content to a file atomically using a temporary file.
///
/// # Errors
///
/// Returns an `io::Error` if the parent directory cannot be determined, the
/// temp file cannot be created or written, or the final rename fails.
pub async fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory"))?
        .to_path_buf();
    let target_path = path.to_path_buf();
    let content_owned = content.to_string();

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write;

        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(content_owned.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(&target_path)?;

        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}
