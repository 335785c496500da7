//! Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Referencing an id that doesn't exist is *not* an error: the store treats
//! it as a no-op. Only transitions that would break the tree's structure are
//! rejected.

use crate::EntryId;
use derive_more::{Display, Error};

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller-supplied id is already in use. Let the store generate one instead.
    #[display("entry id already exists: {_0}")]
    DuplicateId(#[error(not(source))] EntryId),
    /// The move would place a folder inside itself or one of its descendants.
    #[display("cannot move {entry} into its own subtree ({destination})")]
    Cycle {
        #[error(not(source))]
        entry: EntryId,
        #[error(not(source))]
        destination: EntryId,
    },
    /// The move destination exists but is a file.
    #[display("destination is not a folder: {_0}")]
    NotAFolder(#[error(not(source))] EntryId),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::DuplicateId(EntryId::from("a1")).to_string(), "entry id already exists: a1");
        assert_eq!(
            ErrorKind::Cycle { entry: EntryId::from("f1"), destination: EntryId::from("f2") }.to_string(),
            "cannot move f1 into its own subtree (f2)"
        );
        assert_eq!(ErrorKind::NotAFolder(EntryId::from("x1")).to_string(), "destination is not a folder: x1");
    }
}
