//! In-memory document cache and override store.

use crate::error::Result;
use crate::store::{DocumentCache, OverrideStore};
use async_trait::async_trait;
use folio_document::{ApiVersion, Document};
use folio_records::RecordKey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory document cache and override store.
///
/// Both maps sit behind a [`RwLock`], so every trait method works on `&self`.
/// Cache writes are counted, which lets tests prove that a build did (or
/// did not) touch the cache.
///
/// # Examples
///
/// ```
/// use folio_cache::{DocumentCache, MemoryStore};
/// use folio_document::Document;
/// use folio_records::{RecordKey, RecordKind};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::default();
/// let key = RecordKey::new(RecordKind::Collection, 7);
/// store.put(key, "public_collection3", &Document::new()).await?;
/// assert!(store.get(key, "public_collection3").await?.is_some());
/// assert!(store.get(key, "private_collection3").await?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    cached: RwLock<HashMap<(RecordKey, String), Document>>,
    overrides: RwLock<HashMap<(RecordKey, ApiVersion), Document>>,
    writes: AtomicUsize,
}
impl MemoryStore {
    /// Create a store pre-populated with override documents.
    pub fn with_overrides(overrides: impl IntoIterator<Item = (RecordKey, ApiVersion, Document)>) -> Self {
        let overrides = overrides.into_iter().map(|(record, family, document)| ((record, family), document)).collect();
        Self {
            overrides: RwLock::new(overrides),
            ..Self::default()
        }
    }

    /// Number of cache writes so far (override saves are not counted).
    pub fn cache_writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of cache entries currently held.
    pub async fn cached_len(&self) -> usize {
        self.cached.read().await.len()
    }
}

#[async_trait]
impl DocumentCache for MemoryStore {
    async fn get(&self, record: RecordKey, variant: &str) -> Result<Option<Document>> {
        Ok(self.cached.read().await.get(&(record, variant.to_string())).cloned())
    }

    async fn put(&self, record: RecordKey, variant: &str, document: &Document) -> Result<()> {
        self.cached.write().await.insert((record, variant.to_string()), document.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[async_trait]
impl OverrideStore for MemoryStore {
    async fn load(&self, record: RecordKey, family: ApiVersion) -> Result<Option<Document>> {
        Ok(self.overrides.read().await.get(&(record, family)).cloned())
    }

    async fn save(&self, record: RecordKey, family: ApiVersion, document: &Document) -> Result<()> {
        self.overrides.write().await.insert((record, family), document.clone());
        Ok(())
    }
}
