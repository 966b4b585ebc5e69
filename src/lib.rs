// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod commands;
pub mod logging;
pub mod reference;
pub mod refresh;
pub mod remote;
pub mod snapshot;
pub mod sync;
pub mod template;
pub mod user_config;
pub mod utils;
pub mod vault;

// Re-export commonly used types
pub use commands::CommandError;
pub use reference::{parse_reference, RepoRef};
pub use refresh::{BackgroundSync, Orchestrator, RefreshOutcome, RefreshStatus, SyncHandle};
pub use remote::{CurrentClient, GitHubClient, RemoteError, RepositoryClient};
pub use snapshot::{ComparisonSet, RepositorySnapshot};
pub use sync::{merge, SENTINEL};
pub use template::{TemplateEngine, TemplateError, TemplateType};
pub use user_config::{load_config, UserConfig};
pub use vault::{Vault, VaultError};
