//! Presentation document synthesis.
//!
//! Given records from a [`ContentRepository`](folio_records::ContentRepository),
//! the engine builds Presentation API v2 and v3 manifests and collections,
//! seeds rebuilds from curator overrides, and caches every result under its
//! [`CacheVariant`]. The [`Dispatcher`] is the front door: it turns a
//! loosely typed [`Request`] into a [`Response`] with a status.

mod builder;
mod canvas;
mod dispatch;
pub mod error;
mod hierarchy;
mod registry;
mod search;
mod uri;
mod variant;

pub use crate::builder::{Collaborators, DocumentBuilder};
pub use crate::canvas::{CanvasBuilder, CanvasHandle, SkeletonCanvases};
pub use crate::dispatch::{Dispatcher, Request, Response, Status};
pub use crate::hierarchy::Hierarchy;
pub use crate::registry::Registry;
pub use crate::search::SearchService;
pub use crate::uri::{UriHandle, UriResolver, UriTemplate};
pub use crate::variant::{CacheVariant, Rendering, Scope, Visibility};
