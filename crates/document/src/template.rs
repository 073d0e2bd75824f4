//! Document skeletons.
//!
//! [`blank`] produces the smallest valid document of a kind, used whenever no
//! override document has been saved for a record (or the record is not
//! eligible for the requested document kind). [`bare`] produces the reference
//! form embedded in a parent's listing: identifier, type and label only.

use crate::document::Document;
use crate::version::{Dialect, DocumentKind};
use serde_json::Value;

/// Full skeleton document with the given children.
pub fn blank(dialect: &Dialect, kind: DocumentKind, id: &str, label: &str, children: Vec<Value>) -> Document {
    Document::new()
        .with("@context", dialect.context)
        .with(dialect.id_key, id)
        .with(dialect.type_key, dialect.type_name(kind))
        .with("label", dialect.text(label))
        .with(dialect.children_key(kind), dialect.wrap_children(kind, children))
}

/// Reference skeleton for embedding a child inline. Never carries children.
pub fn bare(dialect: &Dialect, kind: DocumentKind, id: &str, label: &str) -> Document {
    Document::new()
        .with(dialect.id_key, id)
        .with(dialect.type_key, dialect.type_name(kind))
        .with("label", dialect.text(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::ApiVersion;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_blank_v3_manifest() {
        let doc = blank(&Dialect::V3, DocumentKind::Manifest, "https://x/m.json", "Deed", vec![]);
        assert_eq!(
            doc.into_value(),
            json!({
                "@context": "http://iiif.io/api/presentation/3/context.json",
                "id": "https://x/m.json",
                "type": "Manifest",
                "label": {"en": ["Deed"]},
                "items": [],
            })
        );
    }

    #[test]
    fn test_blank_v2_manifest_embeds_sequence() {
        let doc = blank(&Dialect::V2, DocumentKind::Manifest, "https://x/m.json", "Deed", vec![json!({"@id": "c"})]);
        assert_eq!(
            doc.into_value(),
            json!({
                "@context": "http://iiif.io/api/presentation/2/context.json",
                "@id": "https://x/m.json",
                "@type": "sc:Manifest",
                "label": "Deed",
                "sequences": [{"@type": "sc:Sequence", "canvases": [{"@id": "c"}]}],
            })
        );
    }

    #[test]
    fn test_blank_v2_collection_uses_members() {
        let doc = blank(&Dialect::V2, DocumentKind::Collection, "https://x/c.json", "Maps", vec![]);
        assert_eq!(doc.get("@type"), Some(&json!("sc:Collection")));
        assert_eq!(doc.get("members"), Some(&json!([])));
    }

    #[rstest]
    fn test_bare_never_has_children(
        #[values(ApiVersion::V2, ApiVersion::V3)] version: ApiVersion,
        #[values(DocumentKind::Manifest, DocumentKind::Collection)] kind: DocumentKind,
    ) {
        let dialect = version.dialect();
        let doc = bare(dialect, kind, "https://x/y.json", "Label");
        assert_eq!(doc.len(), 3);
        for key in dialect.children_keys(kind) {
            assert!(!doc.contains_key(key));
        }
        assert!(!doc.contains_key("@context"));
    }

    #[test]
    fn test_bare_v3_collection_uses_id_key() {
        let doc = bare(&Dialect::V3, DocumentKind::Collection, "https://x/8/collection.json", "Maps");
        assert_eq!(
            doc.into_value(),
            json!({"id": "https://x/8/collection.json", "type": "Collection", "label": {"en": ["Maps"]}})
        );
    }
}
