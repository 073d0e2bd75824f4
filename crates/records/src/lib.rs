//! Content records and the repository they live in.
//!
//! The repository is owned by the surrounding system; the engine only ever
//! reads from it. [`ContentRepository`] is the seam, and [`MemoryRepository`]
//! is an in-memory implementation used by tests and the command-line tool.

pub mod error;
mod memory;
mod models;
mod repository;

pub use crate::memory::MemoryRepository;
pub use crate::models::{
    Attachment, Collection, CollectionRole, ExhibitPageBlock, File, Item, ItemDisplay, RecordKey, RecordKind,
};
pub use crate::repository::ContentRepository;
use std::sync::Arc;

pub type RepositoryHandle = Arc<dyn ContentRepository>;
