//! Failure taxonomy for remote calls.
//!
//! The GitHub client is the only place that looks at HTTP statuses; everything
//! upstream branches on these three variants.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The requested owner, repository or branch does not resolve.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The call budget is exhausted.
    #[error("Rate limit exceeded{}", reset_suffix(.reset_at.as_ref()))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    /// Transport failures, malformed payloads and unexpected statuses.
    #[error("Remote error: {message}")]
    Other {
        status: Option<u16>,
        message: String,
    },
}

fn reset_suffix(reset_at: Option<&DateTime<Utc>>) -> String {
    reset_at.map_or_else(String::new, |at| format!(". Resets at {at}"))
}

impl RemoteError {
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// HTTP status that produced this error, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => None,
            Self::Other { status, .. } => *status,
        }
    }
}
