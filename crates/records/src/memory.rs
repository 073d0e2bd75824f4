//! In-memory content repository.

use crate::error::{ErrorKind, Result};
use crate::models::{Collection, ExhibitPageBlock, File, Item};
use crate::repository::ContentRepository;
use async_trait::async_trait;
use exn::ResultExt;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// On-disk shape of a record fixture file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Fixture {
    collections: Vec<Collection>,
    items: Vec<Item>,
    files: Vec<File>,
    exhibit_page_blocks: Vec<ExhibitPageBlock>,
}

#[derive(Debug, Default)]
struct Records {
    collections: BTreeMap<u64, Collection>,
    items: BTreeMap<u64, Item>,
    files: BTreeMap<u64, File>,
    blocks: BTreeMap<u64, ExhibitPageBlock>,
}

/// In-memory content repository.
///
/// Records are fixed once built and kept in ID order, which is also the
/// iteration order of list operations. Every trait call bumps a lookup
/// counter, so tests can assert that a cached build never touched the
/// repository.
///
/// # Examples
///
/// ```
/// use folio_records::{Collection, ContentRepository, MemoryRepository};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = MemoryRepository::default()
///     .with_collection(Collection::new(7, "Atlas"))
///     .with_collection(Collection::new(8, "Maps").with_parent(7));
/// let children = repository.child_collections(7).await?;
/// assert_eq!(children[0].title(), "Maps");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryRepository {
    name: String,
    records: Records,
    lookups: AtomicUsize,
}

impl MemoryRepository {
    /// Load records from a JSON fixture with optional `collections`, `items`,
    /// `files` and `exhibit_page_blocks` arrays.
    pub fn from_json(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let fixture: Fixture = serde_json::from_slice(bytes.as_ref()).or_raise(|| ErrorKind::InvalidData)?;
        debug!(
            collections = fixture.collections.len(),
            items = fixture.items.len(),
            files = fixture.files.len(),
            blocks = fixture.exhibit_page_blocks.len(),
            "loaded record fixture"
        );
        let repository = fixture.collections.into_iter().fold(Self::default(), Self::with_collection);
        let repository = fixture.items.into_iter().fold(repository, Self::with_item);
        let repository = fixture.files.into_iter().fold(repository, Self::with_file);
        Ok(fixture.exhibit_page_blocks.into_iter().fold(repository, Self::with_block))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_collection(mut self, collection: Collection) -> Self {
        self.records.collections.insert(collection.id, collection);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.records.items.insert(item.id, item);
        self
    }

    pub fn with_file(mut self, file: File) -> Self {
        self.records.files.insert(file.id, file);
        self
    }

    pub fn with_block(mut self, block: ExhibitPageBlock) -> Self {
        self.records.blocks.insert(block.id, block);
        self
    }

    /// Number of trait lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    fn count(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }
}
impl Default for MemoryRepository {
    fn default() -> Self {
        Self {
            name: "memory".to_string(),
            records: Records::default(),
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collection(&self, id: u64) -> Result<Option<Collection>> {
        self.count();
        Ok(self.records.collections.get(&id).cloned())
    }

    async fn item(&self, id: u64) -> Result<Option<Item>> {
        self.count();
        Ok(self.records.items.get(&id).cloned())
    }

    async fn file(&self, id: u64) -> Result<Option<File>> {
        self.count();
        Ok(self.records.files.get(&id).cloned())
    }

    async fn exhibit_block(&self, id: u64) -> Result<Option<ExhibitPageBlock>> {
        self.count();
        Ok(self.records.blocks.get(&id).cloned())
    }

    async fn child_collections(&self, parent: u64) -> Result<Vec<Collection>> {
        self.count();
        Ok(self.records.collections.values().filter(|c| c.parent == Some(parent)).cloned().collect())
    }

    async fn collection_items(&self, collection: u64) -> Result<Vec<Item>> {
        self.count();
        Ok(self.records.items.values().filter(|i| i.collection == Some(collection)).cloned().collect())
    }
}
