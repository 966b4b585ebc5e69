//! Refreshing tracked notes, one at a time or in timer-driven batches.

mod locks;
mod notifier;
mod orchestrator;
mod outcome;
mod scheduler;

pub use locks::DocumentLocks;
pub use notifier::{MemoryNotifier, NoticeLevel, Notifier, StderrNotifier};
pub use orchestrator::Orchestrator;
pub use outcome::{tally, RefreshOutcome, RefreshStatus};
pub use scheduler::{BackgroundSync, CycleHook, SyncCommand, SyncHandle};
pub use crate::user_config::interval_from_minutes;
