//! SQLite-backed document cache and override store.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{DocumentRow, KeyColumns};
use crate::store::{DocumentCache, OverrideStore};
use async_trait::async_trait;
use exn::ResultExt;
use folio_document::{ApiVersion, Document};
use folio_records::RecordKey;
use sqlx::SqlitePool;
use time::UtcDateTime;
use tracing::{debug, instrument};

/// Document cache and override store sharing one SQLite pool.
///
/// Writes are upserts: a put for an existing key overwrites it in place.
/// Two concurrent builds of the same key simply race, and the last writer
/// wins.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}
impl From<&Database> for SqliteStore {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn serialize(document: &Document) -> Result<String> {
        let bytes = document.to_vec().or_raise(|| ErrorKind::InvalidData("document"))?;
        String::from_utf8(bytes).or_raise(|| ErrorKind::InvalidData("document"))
    }

    async fn fetch(&self, query: &'static str, key: KeyColumns, discriminator: &str) -> Result<Option<Document>> {
        let row: Option<DocumentRow> = sqlx::query_as(query)
            .bind(key.record_kind)
            .bind(key.record_id)
            .bind(discriminator)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Document::try_from).transpose()
    }

    async fn store(&self, query: &'static str, key: KeyColumns, discriminator: &str, document: &Document) -> Result<()> {
        sqlx::query(query)
            .bind(key.record_kind)
            .bind(key.record_id)
            .bind(discriminator)
            .bind(Self::serialize(document)?)
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentCache for SqliteStore {
    #[instrument(level = "trace", skip(self, record), fields(record = %record))]
    async fn get(&self, record: RecordKey, variant: &str) -> Result<Option<Document>> {
        let key = KeyColumns::try_from(record)?;
        self.fetch(include_str!("../queries/get_cached_document.sql"), key, variant).await
    }

    #[instrument(level = "trace", skip(self, record, document), fields(record = %record))]
    async fn put(&self, record: RecordKey, variant: &str, document: &Document) -> Result<()> {
        let key = KeyColumns::try_from(record)?;
        self.store(include_str!("../queries/put_cached_document.sql"), key, variant, document).await?;
        debug!(%record, variant, "cached document");
        Ok(())
    }
}

#[async_trait]
impl OverrideStore for SqliteStore {
    #[instrument(level = "trace", skip(self, record), fields(record = %record))]
    async fn load(&self, record: RecordKey, family: ApiVersion) -> Result<Option<Document>> {
        let key = KeyColumns::try_from(record)?;
        self.fetch(include_str!("../queries/get_override_document.sql"), key, family.slug()).await
    }

    #[instrument(level = "trace", skip(self, record, document), fields(record = %record))]
    async fn save(&self, record: RecordKey, family: ApiVersion, document: &Document) -> Result<()> {
        let key = KeyColumns::try_from(record)?;
        self.store(include_str!("../queries/put_override_document.sql"), key, family.slug(), document).await?;
        debug!(%record, %family, "saved override document");
        Ok(())
    }
}
