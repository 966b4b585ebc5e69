use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::{GitHubClient, RemoteError, RepositoryClient};

/// Single indirection point for the process-wide client.
///
/// [`CurrentClient::current`] hands out an `Arc`, so calls already in flight
/// keep the instance they started with after a swap.
pub struct CurrentClient {
    base_url: String,
    inner: RwLock<Arc<dyn RepositoryClient>>,
}

impl CurrentClient {
    #[must_use]
    pub fn new(base_url: &str, client: Arc<dyn RepositoryClient>) -> Self {
        Self {
            base_url: base_url.to_string(),
            inner: RwLock::new(client),
        }
    }

    /// Build a holder around a fresh [`GitHubClient`].
    pub fn github(base_url: &str, token: &str) -> Result<Self, RemoteError> {
        Ok(Self::new(base_url, GitHubClient::shared(base_url, token)?))
    }

    #[must_use]
    pub fn current(&self) -> Arc<dyn RepositoryClient> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn replace(&self, client: Arc<dyn RepositoryClient>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = client;
    }

    /// Swap in a new GitHub client built for `token`.
    pub fn replace_token(&self, token: &str) -> Result<(), RemoteError> {
        let client = GitHubClient::shared(&self.base_url, token)?;
        self.replace(client);
        info!(authenticated = !token.trim().is_empty(), "GitHub client rebuilt");
        Ok(())
    }
}
