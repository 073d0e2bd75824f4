use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use folio_document::Document;
use folio_records::RecordKey;

/// Columns identifying a record, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyColumns {
    pub record_kind: &'static str,
    pub record_id: i64,
}
impl TryFrom<RecordKey> for KeyColumns {
    type Error = Error;
    fn try_from(key: RecordKey) -> Result<Self, Self::Error> {
        Ok(Self {
            record_kind: key.kind.as_path(),
            record_id: i64::try_from(key.id).or_raise(|| ErrorKind::InvalidData("record id"))?,
        })
    }
}

/// A stored document, cached or override.
#[derive(sqlx::FromRow)]
pub(crate) struct DocumentRow {
    pub document: String,
}
impl TryFrom<DocumentRow> for Document {
    type Error = Error;
    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Document::from_slice(row.document.as_bytes()).or_raise(|| ErrorKind::InvalidData("document"))
    }
}
