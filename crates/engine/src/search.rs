//! Content search service descriptors.
//!
//! Applied after a document leaves the builder (and the cache), so the
//! cached value never carries a service block and toggling search doesn't
//! invalidate anything.

use crate::error::Result;
use crate::uri::UriHandle;
use folio_document::{ApiVersion, Dialect, Document};
use folio_records::RecordKey;
use serde_json::{Value, json};

const SERVICE_KEY: &str = "service";

pub struct SearchService {
    uris: UriHandle,
}
impl SearchService {
    pub fn new(uris: UriHandle) -> Self {
        Self { uris }
    }

    /// Service descriptor advertising the search endpoint for `record`.
    pub fn descriptor(&self, dialect: &Dialect, record: RecordKey) -> Result<Value> {
        let id = self.uris.uri(dialect.version, record.kind, record.id, "search")?;
        Ok(match dialect.version {
            ApiVersion::V2 => json!({
                "@context": "http://iiif.io/api/search/0/context.json",
                "@id": id,
                "profile": "http://iiif.io/api/search/0/search",
            }),
            ApiVersion::V3 => json!({
                "id": id,
                "type": "SearchService1",
                "profile": "http://iiif.io/api/search/1/search",
            }),
        })
    }

    /// Append the descriptor to the document's services, replacing any
    /// service with the same identifier.
    pub fn attach(&self, document: Document, dialect: &Dialect, record: RecordKey) -> Result<Document> {
        let descriptor = self.descriptor(dialect, record)?;
        let id = descriptor.get(dialect.id_key).cloned();
        let mut services = match document.get(SERVICE_KEY) {
            Some(Value::Array(services)) => services.clone(),
            Some(service) => vec![service.clone()],
            None => Vec::new(),
        };
        services.retain(|service| service.get(dialect.id_key) != id.as_ref());
        services.push(descriptor);
        Ok(document.with(SERVICE_KEY, services))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::UriTemplate;
    use folio_records::RecordKind;
    use std::sync::Arc;

    fn search() -> SearchService {
        SearchService::new(Arc::new(UriTemplate::new("https://x.org", UriTemplate::DEFAULT).unwrap()))
    }

    #[test]
    fn test_v2_descriptor() {
        let document = search().attach(Document::new(), &Dialect::V2, RecordKey::new(RecordKind::Item, 4)).unwrap();
        assert_eq!(
            document.get("service"),
            Some(&json!([{
                "@context": "http://iiif.io/api/search/0/context.json",
                "@id": "https://x.org/iiifv2/items/4/search",
                "profile": "http://iiif.io/api/search/0/search",
            }]))
        );
    }

    #[test]
    fn test_attach_is_idempotent() {
        let search = search();
        let record = RecordKey::new(RecordKind::Collection, 9);
        let once = search.attach(Document::new(), &Dialect::V3, record).unwrap();
        let twice = search.attach(once.clone(), &Dialect::V3, record).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_replaces_stale_descriptor() {
        let stale = json!({"id": "https://x.org/iiifv3/items/1/search", "type": "SearchService0"});
        let document = Document::new().with("service", json!([stale]));
        let document = search().attach(document, &Dialect::V3, RecordKey::new(RecordKind::Item, 1)).unwrap();
        assert_eq!(
            document.get("service"),
            Some(&json!([{
                "id": "https://x.org/iiifv3/items/1/search",
                "type": "SearchService1",
                "profile": "http://iiif.io/api/search/1/search",
            }]))
        );
    }

    #[test]
    fn test_keeps_existing_services() {
        let existing = json!({"id": "https://images.example/iiif/1", "type": "ImageService3"});
        let document = Document::new().with("service", existing.clone());
        let document = search().attach(document, &Dialect::V3, RecordKey::new(RecordKind::Item, 1)).unwrap();
        let services = document.get("service").and_then(Value::as_array).unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0], existing);
    }
}
