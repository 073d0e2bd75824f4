use crate::error::{Error, ErrorKind, Result};
use crate::version::{Dialect, DocumentKind};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A presentation document: a JSON object with a handful of engine-controlled
/// keys and any number of curator-authored extension keys.
///
/// Documents are values. Every edit consumes `self` and hands back the edited
/// document, so a cached copy can never be mutated through a document that is
/// still under construction. Key order is preserved, which keeps serialized
/// output stable between identical builds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from raw JSON bytes. Anything other than a JSON object
    /// is rejected.
    pub fn from_slice(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes.as_ref()).or_raise(|| ErrorKind::InvalidDocument)?;
        value.try_into()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set `key` to `value`. An existing key keeps its position.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Remove `key`, keeping the order of the remaining keys.
    pub fn without(mut self, key: &str) -> Self {
        self.0.shift_remove(key);
        self
    }

    pub fn without_all(self, keys: &[&str]) -> Self {
        keys.iter().fold(self, |document, key| document.without(key))
    }

    /// Flattened list of the children of a document of `kind`.
    ///
    /// For v2 manifests this looks through the embedded sequences and returns
    /// their canvases.
    pub fn children(&self, dialect: &Dialect, kind: DocumentKind) -> Vec<&Value> {
        let Some(Value::Array(container)) = self.get(dialect.children_key(kind)) else {
            return Vec::new();
        };
        match (kind, dialect.sequence_type) {
            (DocumentKind::Manifest, Some(_)) => container
                .iter()
                .filter_map(|sequence| sequence.get("canvases").and_then(Value::as_array))
                .flatten()
                .collect(),
            _ => container.iter().collect(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.0).or_raise(|| ErrorKind::InvalidDocument)
    }
}
impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.into_value()
    }
}
impl TryFrom<Value> for Document {
    type Error = Error;
    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => exn::bail!(ErrorKind::InvalidDocument),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        Document::try_from(value).unwrap()
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(Document::from_slice(b"[1, 2, 3]").is_err());
        assert!(Document::from_slice(b"not json").is_err());
        assert!(Document::from_slice(b"{\"a\": 1}").is_ok());
    }

    #[test]
    fn test_with_replaces_in_place() {
        let doc = document(json!({"a": 1, "b": 2, "c": 3})).with("b", 20);
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(doc.get("b"), Some(&json!(20)));
    }

    #[test]
    fn test_without_keeps_order() {
        let doc = document(json!({"a": 1, "b": 2, "c": 3, "d": 4})).without("b");
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["a", "c", "d"]);
        let doc = doc.without_all(&["a", "missing"]);
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["c", "d"]);
    }

    #[test]
    fn test_edits_do_not_alias_the_original() {
        let original = document(json!({"items": [1, 2]}));
        let edited = original.clone().without("items");
        assert!(original.contains_key("items"));
        assert!(!edited.contains_key("items"));
    }

    #[test]
    fn test_children_flattens_v2_sequences() {
        let doc = document(json!({
            "sequences": [
                {"@type": "sc:Sequence", "canvases": [{"@id": "a"}, {"@id": "b"}]},
            ],
        }));
        let children = doc.children(&Dialect::V2, DocumentKind::Manifest);
        assert_eq!(children, [&json!({"@id": "a"}), &json!({"@id": "b"})]);
        assert!(doc.children(&Dialect::V3, DocumentKind::Manifest).is_empty());
    }

    #[test]
    fn test_serialization_is_stable() {
        let doc = document(json!({"z": 1, "a": 2}));
        assert_eq!(doc.to_vec().unwrap(), b"{\"z\":1,\"a\":2}");
    }
}
