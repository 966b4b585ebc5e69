//! User-facing operations, one module per CLI subcommand.

mod compare;
mod create;
mod dashboard;
mod error;
mod import;
mod limits;
mod listings;
mod switch_branch;
mod watch;

pub use compare::{compare_repositories, CompareResult, COMPARISONS_FOLDER, COMPARISON_TAG};
pub use create::{create_from_reference, note_path};
pub use dashboard::{create_dashboard, dashboard_path, DASHBOARD_FILE};
pub use error::CommandError;
pub use import::{import_owner, tracked_repositories, ImportReport};
pub use limits::{format_budget, rate_limits};
pub use listings::{
    format_commits, format_issues, format_pull_requests, list_commits, list_issues,
    list_pull_requests, pull_request_diff,
};
pub use switch_branch::switch_branch;
pub use watch::{watch, ConfigReloadHook};
