//! Normalized remote state.
//!
//! Every field is always populated: text the remote did not report is the
//! empty string and counts the remote did not report are zero.

mod comparison;
mod types;

pub use comparison::{ComparisonError, ComparisonSet};
pub use types::{
    CommitSummary, IssueSummary, LatestCommit, ListState, PullRequestSummary, RateBudget,
    RepositorySnapshot,
};
