use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::error::CommandError;
use crate::refresh::{tally, BackgroundSync, CycleHook, Orchestrator};
use crate::user_config::load_config;

/// Re-reads the vault configuration before each cycle and swaps the client
/// when the effective token changed.
///
/// A token given on the command line always wins over the file.
pub struct ConfigReloadHook {
    vault_root: PathBuf,
    token_override: Option<String>,
    active_token: Mutex<String>,
}

impl ConfigReloadHook {
    #[must_use]
    pub fn new(vault_root: PathBuf, token_override: Option<String>, active_token: &str) -> Self {
        Self {
            vault_root,
            token_override,
            active_token: Mutex::new(active_token.to_string()),
        }
    }
}

#[async_trait]
impl CycleHook for ConfigReloadHook {
    async fn before_cycle(&self, orchestrator: &Orchestrator) {
        let config = match load_config(&self.vault_root).await {
            Ok(config) => config.with_token_override(self.token_override.as_deref()),
            Err(e) => {
                warn!("Keeping previous settings, config reload failed: {e}");
                return;
            }
        };

        let mut active = self
            .active_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *active == config.auth_token {
            return;
        }
        match orchestrator.client().replace_token(&config.auth_token) {
            Ok(()) => *active = config.auth_token,
            Err(e) => warn!("Keeping previous client: {e}"),
        }
    }
}

/// Refresh every `interval` until `shutdown` resolves.
///
/// One cycle runs immediately; the rest follow the timer.
pub async fn watch(
    orchestrator: Arc<Orchestrator>,
    hook: Arc<dyn CycleHook>,
    interval: Option<Duration>,
    shutdown: impl Future<Output = ()>,
) -> Result<(), CommandError> {
    let Some(period) = interval else {
        return Err(CommandError::WatchDisabled);
    };
    info!("Watching vault, refreshing every {}", humantime::format_duration(period));

    let handle = BackgroundSync::start_with_hook(orchestrator, Some(period), Some(hook));
    if let Some(outcomes) = handle.trigger().await {
        let (synced, failed) = tally(&outcomes);
        info!(synced, failed, "Initial refresh finished");
    }

    shutdown.await;
    info!("Shutting down");
    handle.stop().await;
    Ok(())
}
