//! Upload Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An upload error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for upload operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The blob could not be read. The underlying I/O error is kept in the
    /// error tree; selecting the blob again may succeed.
    #[display("failed to read {_0}")]
    Read(#[error(not(source))] String),
    /// The blob is larger than the configured maximum. Nothing was read.
    #[display("{name} is {size} bytes, the limit is {max} bytes")]
    TooLarge {
        #[error(not(source))]
        name: String,
        size: u64,
        max: u64,
    },
    /// A newer selection (or a reset) happened while this blob was being
    /// read. The result was discarded; don't apply it.
    #[display("upload superseded by a newer selection")]
    Superseded,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}
