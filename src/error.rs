//! Session Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the lower crates are
//! kept as children in the error tree.

use derive_more::{Display, Error};

/// A session error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Names must contain something other than whitespace. Ask again.
    #[display("name must not be empty")]
    InvalidName,
    /// The store rejected the change (duplicate id, or a move that would
    /// break the tree). The session's state is unchanged.
    #[display("change rejected by the store")]
    Store,
    /// Reading a picked file failed, was too large, or was superseded.
    #[display("upload failed")]
    Upload,
    /// Stored content could not be decoded.
    #[display("content could not be decoded")]
    Content,
    /// Configuration could not be loaded.
    #[display("configuration error")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upload)
    }
}
