//! Presentation documents for IIIF-style interoperable viewers.
//!
//! This crate knows nothing about where records come from or how documents
//! are cached. It provides:
//! - [`Document`]: the JSON document value itself, treated as immutable
//!   (every edit consumes and returns a new value).
//! - [`ApiVersion`] and [`Dialect`]: everything that differs between
//!   Presentation API v2 and v3 (key names, context, label shape, child
//!   containers), so builders are written once against a dialect.
//! - [`template`]: blank skeletons and bare references.
//! - [`metadata`]: descriptive (Dublin Core) metadata and the merger that
//!   stamps it onto a document.

mod document;
pub mod error;
pub mod metadata;
pub mod template;
mod version;

pub use crate::document::Document;
pub use crate::metadata::{DublinCore, Metadata};
pub use crate::version::{ApiVersion, Dialect, DocumentKind, LabelShape};
