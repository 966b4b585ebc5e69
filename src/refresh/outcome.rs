use std::fmt;
use std::path::PathBuf;

use crate::remote::RemoteError;

/// Result of one refresh attempt on one note.
///
/// These are never persisted; every cycle starts again from the note's
/// front matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    /// The note was rewritten from a fresh snapshot.
    Synced,
    /// The note has no `repo_url` and is not a dashboard; nothing was done.
    Untracked,
    /// `repo_url` does not name an owner and repository.
    InvalidReference(String),
    FetchFailed(RemoteError),
    ReadFailed(String),
    RenderFailed(String),
    WriteFailed(String),
}

impl RefreshStatus {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Synced)
    }

    /// Failures a background batch skips without telling the user.
    #[must_use]
    pub fn is_quiet_skip(&self) -> bool {
        match self {
            Self::Untracked | Self::InvalidReference(_) => true,
            Self::FetchFailed(e) => e.is_not_found() || e.is_rate_limited(),
            Self::Synced | Self::ReadFailed(_) | Self::RenderFailed(_) | Self::WriteFailed(_) => {
                false
            }
        }
    }
}

impl fmt::Display for RefreshStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synced => f.write_str("refreshed"),
            Self::Untracked => f.write_str("not a tracked note (no repo_url)"),
            Self::InvalidReference(url) => {
                write!(f, "cannot read a repository reference from '{url}'")
            }
            Self::FetchFailed(e) => write!(f, "{e}"),
            Self::ReadFailed(e) => write!(f, "could not read note: {e}"),
            Self::RenderFailed(e) => write!(f, "could not render note: {e}"),
            Self::WriteFailed(e) => write!(f, "could not write note: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Note path as given to the orchestrator (vault-relative for batches)
    pub path: PathBuf,
    pub status: RefreshStatus,
}

impl RefreshOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.status)
    }
}

/// Count successes and failures in a batch.
#[must_use]
pub fn tally(outcomes: &[RefreshOutcome]) -> (usize, usize) {
    let synced = outcomes.iter().filter(|o| o.is_success()).count();
    (synced, outcomes.len().saturating_sub(synced))
}
