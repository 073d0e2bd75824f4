//! Descriptive metadata and the merger that stamps it onto documents.
//!
//! Records describe themselves with Dublin Core elements. When a document is
//! (re)built, [`apply`] overwrites the engine-controlled keys (context,
//! identifier, type, label) and refreshes the Dublin Core entries inside the
//! document's `metadata` block. Every other key, and every metadata entry a
//! curator added under a non-Dublin-Core label, is left alone.

use crate::document::Document;
use crate::error::{Error, ErrorKind};
use crate::version::{Dialect, DocumentKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// The fifteen Dublin Core Metadata Element Set elements.
///
/// Ordering follows the conventional element order, which is also the order
/// entries appear in a generated `metadata` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DublinCore {
    Title,
    Subject,
    Description,
    Creator,
    Source,
    Publisher,
    Date,
    Contributor,
    Rights,
    Relation,
    Format,
    Language,
    Type,
    Identifier,
    Coverage,
}
impl DublinCore {
    pub const ALL: [DublinCore; 15] = [
        Self::Title,
        Self::Subject,
        Self::Description,
        Self::Creator,
        Self::Source,
        Self::Publisher,
        Self::Date,
        Self::Contributor,
        Self::Rights,
        Self::Relation,
        Self::Format,
        Self::Language,
        Self::Type,
        Self::Identifier,
        Self::Coverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Subject => "Subject",
            Self::Description => "Description",
            Self::Creator => "Creator",
            Self::Source => "Source",
            Self::Publisher => "Publisher",
            Self::Date => "Date",
            Self::Contributor => "Contributor",
            Self::Rights => "Rights",
            Self::Relation => "Relation",
            Self::Format => "Format",
            Self::Language => "Language",
            Self::Type => "Type",
            Self::Identifier => "Identifier",
            Self::Coverage => "Coverage",
        }
    }
}
impl FromStr for DublinCore {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|element| element.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| exn::Exn::from(ErrorKind::UnknownElement(s.to_string())))
    }
}
impl Display for DublinCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive metadata of a content record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<DublinCore, Vec<String>>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for metadata with nothing but a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new().with(DublinCore::Title, [title])
    }

    pub fn with(mut self, element: DublinCore, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.0.entry(element).or_default().extend(values.into_iter().map(Into::into));
        self
    }

    /// First Title value, or an empty string for untitled records.
    pub fn title(&self) -> &str {
        self.first(DublinCore::Title).unwrap_or_default()
    }

    pub fn first(&self, element: DublinCore) -> Option<&str> {
        self.0.get(&element).and_then(|values| values.first()).map(String::as_str)
    }

    /// Elements with at least one value, in Dublin Core order.
    pub fn elements(&self) -> impl Iterator<Item = (DublinCore, &[String])> {
        self.0.iter().filter(|(_, values)| !values.is_empty()).map(|(element, values)| (*element, values.as_slice()))
    }
}

/// Everything [`apply`] needs to know about the target of a document.
#[derive(Debug, Clone, Copy)]
pub struct Stamp<'a> {
    pub kind: DocumentKind,
    pub id: &'a str,
    pub label: &'a str,
    pub metadata: &'a Metadata,
}

/// Overwrite the engine-controlled keys and refresh the Dublin Core entries
/// of the `metadata` block.
///
/// Applying the same stamp twice yields the same document as applying it
/// once.
pub fn apply(document: Document, dialect: &Dialect, stamp: Stamp<'_>) -> Document {
    let block = merge_block(document.get("metadata"), dialect, stamp.metadata);
    document
        .with("@context", dialect.context)
        .with(dialect.id_key, stamp.id)
        .with(dialect.type_key, dialect.type_name(stamp.kind))
        .with("label", dialect.text(stamp.label))
        .with("metadata", block)
}

fn merge_block(existing: Option<&Value>, dialect: &Dialect, metadata: &Metadata) -> Value {
    let mut entries: Vec<Value> = match existing {
        Some(Value::Array(entries)) => entries.iter().filter(|entry| !is_dublin_core_entry(entry)).cloned().collect(),
        _ => Vec::new(),
    };
    entries.extend(metadata.elements().map(|(element, values)| {
        json!({
            "label": dialect.text(element.as_str()),
            "value": dialect.texts(values),
        })
    }));
    Value::Array(entries)
}

/// Whether a metadata entry's label names a Dublin Core element, in either
/// the plain-string or the language-map shape.
fn is_dublin_core_entry(entry: &Value) -> bool {
    let is_element = |text: &str| text.parse::<DublinCore>().is_ok();
    match entry.get("label") {
        Some(Value::String(label)) => is_element(label),
        Some(Value::Object(languages)) => languages
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(Value::as_str)
            .any(is_element),
        _ => false,
    }
}
