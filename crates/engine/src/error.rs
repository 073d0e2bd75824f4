//! Engine Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Collaborator failures (repository,
//! cache, override store, canvas producer) are re-raised under one of the
//! kinds below with the collaborator's own error kept as a child frame.

use derive_more::{Display, Error};
use folio_document::{ApiVersion, DocumentKind};
use folio_records::{RecordKey, RecordKind};

/// An engine error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("record not found: {_0}")]
    NotFound(#[error(not(source))] RecordKey),
    #[display("unknown presentation API version: {_0}")]
    UnknownVersion(#[error(not(source))] String),
    #[display("unknown record kind: {_0}")]
    UnknownRecordKind(#[error(not(source))] String),
    /// The registry has no builder for a (known) version.
    #[display("no builder registered for {_0}")]
    Unregistered(#[error(not(source))] ApiVersion),
    /// The document kind is never produced for this record kind.
    #[display("{document} documents are not available for {kind}")]
    Unroutable { kind: RecordKind, document: DocumentKind },
    #[display("content repository failure")]
    Repository,
    #[display("document cache failure")]
    Cache,
    #[display("override store failure")]
    Overrides,
    #[display("canvas construction failure")]
    Canvas,
    #[display("invalid document URI template")]
    Template,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository | Self::Cache | Self::Overrides)
    }

    /// Whether this error means "there is nothing at that address" rather
    /// than "building failed".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::UnknownVersion(_) | Self::UnknownRecordKind(_) | Self::Unroutable { .. }
        )
    }
}
