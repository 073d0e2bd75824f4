//! Document Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A document error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Bytes were not JSON, or the JSON was not an object.
    #[display("invalid presentation document")]
    InvalidDocument,
    #[display("unknown presentation API version: {_0}")]
    UnknownVersion(#[error(not(source))] String),
    #[display("unknown document kind: {_0}")]
    UnknownDocumentKind(#[error(not(source))] String),
    #[display("unknown Dublin Core element: {_0}")]
    UnknownElement(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
