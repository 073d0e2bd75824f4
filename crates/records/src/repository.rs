//! Content repository trait.

use crate::error::Result;
use crate::models::{Collection, ExhibitPageBlock, File, Item};
use async_trait::async_trait;

/// Read-only view of the content repository.
///
/// All lookups return `Ok(None)` (or an empty list) when nothing matches;
/// errors are reserved for the repository itself failing.
///
/// # Ordering
/// List operations return records in the repository's own iteration order.
/// Callers preserve that order in the documents they build.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Name of the repository, for logging only.
    fn name(&self) -> &str;

    async fn collection(&self, id: u64) -> Result<Option<Collection>>;

    async fn item(&self, id: u64) -> Result<Option<Item>>;

    async fn file(&self, id: u64) -> Result<Option<File>>;

    async fn exhibit_block(&self, id: u64) -> Result<Option<ExhibitPageBlock>>;

    /// Direct child collections of `parent`, of either role.
    async fn child_collections(&self, parent: u64) -> Result<Vec<Collection>>;

    /// Items that belong to `collection`, regardless of display setting.
    async fn collection_items(&self, collection: u64) -> Result<Vec<Item>>;
}
