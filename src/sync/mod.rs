//! Merging freshly rendered snapshots into existing documents.

mod merge;

pub use merge::{merge, split, splice, with_sentinel, SENTINEL};
