//! Cache and override store traits.

use crate::error::Result;
use async_trait::async_trait;
use folio_document::{ApiVersion, Document};
use folio_records::RecordKey;

/// Built documents, keyed by record and cache-variant label.
///
/// Reading a variant that was never written is a miss, even if other
/// variants exist for the same record.
#[async_trait]
pub trait DocumentCache: Send + Sync {
    async fn get(&self, record: RecordKey, variant: &str) -> Result<Option<Document>>;

    /// Store `document`, replacing whatever was cached under the same key.
    async fn put(&self, record: RecordKey, variant: &str, document: &Document) -> Result<()>;
}

/// Curator-authored override documents, one per record and version family.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    async fn load(&self, record: RecordKey, family: ApiVersion) -> Result<Option<Document>>;

    async fn save(&self, record: RecordKey, family: ApiVersion, document: &Document) -> Result<()>;
}
