use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

/// One async mutex per note path.
///
/// A refresh holds its note's guard from read to write, so a timer cycle and a
/// manual refresh of the same note run one after the other. Entries nobody
/// holds or waits on are dropped on the next acquire, so renamed or deleted
/// notes do not accumulate.
#[derive(Debug, Default)]
pub struct DocumentLocks {
    inner: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl DocumentLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `path`.
    pub async fn acquire(&self, path: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // Every guard and every waiter holds a clone of its entry.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(map.entry(path.to_path_buf()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of paths currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
