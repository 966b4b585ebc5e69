//! Side-by-side comparison of several repositories.

use super::types::RepositorySnapshot;
use thiserror::Error;

/// Minimum number of repositories in a comparison.
pub const MIN_COMPARISON_SIZE: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("A comparison needs at least 2 repositories, got {0}")]
    TooFew(usize),

    #[error("Repository {0} is already part of the comparison")]
    Duplicate(String),
}

/// An ordered set of snapshots assembled before being rendered once into a
/// comparison note. Never persisted on its own.
#[derive(Debug, Clone, Default)]
pub struct ComparisonSet {
    snapshots: Vec<RepositorySnapshot>,
}

impl ComparisonSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot, rejecting repositories already in the set.
    pub fn push(&mut self, snapshot: RepositorySnapshot) -> Result<(), ComparisonError> {
        let key = snapshot.full_name.to_lowercase();
        if self
            .snapshots
            .iter()
            .any(|s| s.full_name.to_lowercase() == key)
        {
            return Err(ComparisonError::Duplicate(snapshot.full_name));
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consume the set once it is large enough to render.
    pub fn finish(self) -> Result<Vec<RepositorySnapshot>, ComparisonError> {
        if self.snapshots.len() < MIN_COMPARISON_SIZE {
            return Err(ComparisonError::TooFew(self.snapshots.len()));
        }
        Ok(self.snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(full_name: &str) -> RepositorySnapshot {
        RepositorySnapshot {
            full_name: full_name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_finish_requires_two() {
        let mut set = ComparisonSet::new();
        assert_eq!(set.clone().finish().unwrap_err(), ComparisonError::TooFew(0));

        set.push(snapshot("acme/widget")).unwrap();
        assert_eq!(set.clone().finish().unwrap_err(), ComparisonError::TooFew(1));

        set.push(snapshot("acme/gadget")).unwrap();
        let snapshots = set.finish().unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].full_name, "acme/widget");
        assert_eq!(snapshots[1].full_name, "acme/gadget");
    }

    #[test]
    fn test_duplicate_rejected_case_insensitive() {
        let mut set = ComparisonSet::new();
        set.push(snapshot("acme/widget")).unwrap();
        let err = set.push(snapshot("ACME/Widget")).unwrap_err();
        assert_eq!(err, ComparisonError::Duplicate("ACME/Widget".to_string()));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }
}
