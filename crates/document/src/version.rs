use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Presentation API version family.
///
/// A closed set: adding a version means adding a [`Dialect`] constant, not a
/// new builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V2,
    V3,
}
impl ApiVersion {
    pub const ALL: [ApiVersion; 2] = [ApiVersion::V2, ApiVersion::V3];

    /// Path segment used in document URIs (`iiifv2`, `iiifv3`).
    pub fn slug(&self) -> &'static str {
        match self {
            Self::V2 => "iiifv2",
            Self::V3 => "iiifv3",
        }
    }

    pub fn major(&self) -> u8 {
        match self {
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }

    pub fn dialect(&self) -> &'static Dialect {
        match self {
            Self::V2 => &Dialect::V2,
            Self::V3 => &Dialect::V3,
        }
    }
}
impl FromStr for ApiVersion {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Optional `iiif` and `v` prefixes, a major version, and an optional numeric minor.
        let sanitized = s.trim().to_lowercase();
        let sanitized = sanitized.strip_prefix("iiif").unwrap_or(&sanitized);
        let sanitized = sanitized.strip_prefix('v').unwrap_or(sanitized);
        let (major, minor) = match sanitized.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (sanitized, None),
        };
        if minor.is_some_and(|minor| minor.is_empty() || !minor.bytes().all(|b| b.is_ascii_digit())) {
            exn::bail!(ErrorKind::UnknownVersion(s.to_string()));
        }
        Ok(match major {
            "2" => Self::V2,
            "3" => Self::V3,
            _ => exn::bail!(ErrorKind::UnknownVersion(s.to_string())),
        })
    }
}
impl Display for ApiVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.slug())
    }
}

/// Which kind of presentation document is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Manifest,
    Collection,
}
impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::Collection => "collection",
        }
    }

    /// URI suffix under which documents of this kind are published.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest.json",
            Self::Collection => "collection.json",
        }
    }
}
impl FromStr for DocumentKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = s.trim().to_lowercase();
        Ok(match sanitized.trim_end_matches(".json") {
            "manifest" => Self::Manifest,
            "collection" => Self::Collection,
            _ => exn::bail!(ErrorKind::UnknownDocumentKind(s.to_string())),
        })
    }
}
impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// How human-readable strings (labels, summaries, metadata) are shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelShape {
    /// A bare JSON string.
    Plain,
    /// A language map: `{"<lang>": ["text"]}`.
    LanguageMap(&'static str),
}

/// Everything that differs between Presentation API versions.
///
/// Builders are written once against a `Dialect` rather than once per
/// version. The two supported dialects are [`Dialect::V2`] and
/// [`Dialect::V3`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub version: ApiVersion,
    pub context: &'static str,
    pub id_key: &'static str,
    pub type_key: &'static str,
    pub manifest_type: &'static str,
    pub collection_type: &'static str,
    /// Only v2 wraps canvases inside an embedded sequence.
    pub sequence_type: Option<&'static str>,
    pub label: LabelShape,
    /// Key on a canvas that lists its annotation pages/lists.
    pub annotations_key: &'static str,
    /// Key carrying free-text description of a document.
    pub description_key: &'static str,
}
impl Dialect {
    pub const V2: Dialect = Dialect {
        version: ApiVersion::V2,
        context: "http://iiif.io/api/presentation/2/context.json",
        id_key: "@id",
        type_key: "@type",
        manifest_type: "sc:Manifest",
        collection_type: "sc:Collection",
        sequence_type: Some("sc:Sequence"),
        label: LabelShape::Plain,
        annotations_key: "otherContent",
        description_key: "description",
    };

    pub const V3: Dialect = Dialect {
        version: ApiVersion::V3,
        context: "http://iiif.io/api/presentation/3/context.json",
        id_key: "id",
        type_key: "type",
        manifest_type: "Manifest",
        collection_type: "Collection",
        sequence_type: None,
        label: LabelShape::LanguageMap("en"),
        annotations_key: "annotations",
        description_key: "summary",
    };

    pub fn type_name(&self, kind: DocumentKind) -> &'static str {
        match kind {
            DocumentKind::Manifest => self.manifest_type,
            DocumentKind::Collection => self.collection_type,
        }
    }

    /// The key holding nested children for a document of the given kind.
    pub fn children_key(&self, kind: DocumentKind) -> &'static str {
        match (self.version, kind) {
            (ApiVersion::V2, DocumentKind::Manifest) => "sequences",
            (ApiVersion::V2, DocumentKind::Collection) => "members",
            (ApiVersion::V3, _) => "items",
        }
    }

    /// Every key that may hold nested children in a document of this kind,
    /// including container keys the version permits but the engine never
    /// writes. All of them are cleared before a rebuild.
    pub fn children_keys(&self, kind: DocumentKind) -> &'static [&'static str] {
        match (self.version, kind) {
            (ApiVersion::V2, DocumentKind::Manifest) => &["sequences"],
            (ApiVersion::V2, DocumentKind::Collection) => &["members", "collections", "manifests"],
            (ApiVersion::V3, _) => &["items"],
        }
    }

    /// Shape a human-readable string per this dialect.
    pub fn text(&self, text: &str) -> Value {
        self.texts(std::slice::from_ref(&text))
    }

    /// Shape several human-readable strings per this dialect. A single value
    /// stays a plain string in v2.
    pub fn texts(&self, texts: &[impl AsRef<str>]) -> Value {
        match self.label {
            LabelShape::Plain => match texts {
                [single] => Value::String(single.as_ref().to_string()),
                many => many.iter().map(|t| Value::String(t.as_ref().to_string())).collect(),
            },
            LabelShape::LanguageMap(lang) => {
                let values: Vec<Value> = texts.iter().map(|t| Value::String(t.as_ref().to_string())).collect();
                json!({ lang: values })
            },
        }
    }

    /// Wrap children into the value stored under [`children_key`](Self::children_key).
    ///
    /// v2 manifests embed canvases in a single sequence; everything else is a
    /// flat list.
    pub fn wrap_children(&self, kind: DocumentKind, children: Vec<Value>) -> Value {
        match (kind, self.sequence_type) {
            (DocumentKind::Manifest, Some(sequence_type)) => json!([{
                self.type_key: sequence_type,
                "canvases": children,
            }]),
            _ => Value::Array(children),
        }
    }
}
