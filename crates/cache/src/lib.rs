//! Storage for built and curator-authored presentation documents.
//!
//! Two concerns live here, behind two traits:
//! - [`DocumentCache`]: fully built documents keyed by record identity and a
//!   cache-variant label. An entry is only valid for the exact variant it
//!   was stored under, and every write unconditionally replaces the previous
//!   entry. Nothing here expires entries; eviction is somebody else's job.
//! - [`OverrideStore`]: documents a curator saved against a record for one
//!   API version family, used to seed rebuilds.
//!
//! [`MemoryStore`] keeps both in process memory. [`SqliteStore`] keeps both
//! in a SQLite database managed by [`Database`].

mod db;
pub mod error;
mod memory;
mod models;
mod sqlite;
mod store;

pub use crate::db::Database;
pub use crate::memory::MemoryStore;
pub use crate::sqlite::SqliteStore;
pub use crate::store::{DocumentCache, OverrideStore};
use std::sync::Arc;

pub type CacheHandle = Arc<dyn DocumentCache>;
pub type OverrideHandle = Arc<dyn OverrideStore>;
