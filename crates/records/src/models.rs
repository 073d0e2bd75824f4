use crate::error::{Error, ErrorKind};
use folio_document::{DublinCore, Metadata};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// The closed set of record kinds a presentation document can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Collection,
    Item,
    File,
    ExhibitPageBlock,
}
impl RecordKind {
    pub const ALL: [RecordKind; 4] = [Self::Collection, Self::Item, Self::File, Self::ExhibitPageBlock];

    /// Plural path segment used in document URIs.
    pub fn as_path(&self) -> &'static str {
        match self {
            Self::Collection => "collections",
            Self::Item => "items",
            Self::File => "files",
            Self::ExhibitPageBlock => "exhibit_page_blocks",
        }
    }
}
impl FromStr for RecordKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = s.trim().to_lowercase().replace(['_', '-', ' '], "");
        Ok(match sanitized.as_str() {
            "collection" | "collections" => Self::Collection,
            "item" | "items" => Self::Item,
            "file" | "files" => Self::File,
            "exhibitpageblock" | "exhibitpageblocks" => Self::ExhibitPageBlock,
            _ => exn::bail!(ErrorKind::UnknownKind(s.to_string())),
        })
    }
}
impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_path())
    }
}

/// Identity of a content record across all kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub kind: RecordKind,
    pub id: u64,
}
impl RecordKey {
    pub fn new(kind: RecordKind, id: u64) -> Self {
        Self { kind, id }
    }
}
impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Whether a collection is presented as a collection of other documents, or
/// as a single manifest whose canvases are its member items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionRole {
    #[default]
    Collection,
    Manifest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub role: CollectionRole,
    #[serde(default)]
    pub metadata: Metadata,
}
impl Collection {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            parent: None,
            role: CollectionRole::Collection,
            metadata: Metadata::titled(title),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<Option<u64>>) -> Self {
        self.parent = parent.into();
        self
    }

    pub fn with_role(mut self, role: CollectionRole) -> Self {
        self.role = role;
        self
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(RecordKind::Collection, self.id)
    }

    pub fn title(&self) -> &str {
        self.metadata.title()
    }

    pub fn is_collection(&self) -> bool {
        self.role == CollectionRole::Collection
    }

    pub fn is_manifest(&self) -> bool {
        self.role == CollectionRole::Manifest
    }
}

/// Whether an item may appear as a canvas in its collection's manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemDisplay {
    #[default]
    Default,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    #[serde(default)]
    pub collection: Option<u64>,
    /// Repository item type; compared against the configured annotation
    /// item type to tell annotation items apart.
    #[serde(default)]
    pub item_type: Option<u64>,
    #[serde(default)]
    pub display: ItemDisplay,
    #[serde(default)]
    pub metadata: Metadata,
}
impl Item {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            collection: None,
            item_type: None,
            display: ItemDisplay::Default,
            metadata: Metadata::titled(title),
        }
    }

    pub fn in_collection(mut self, collection: impl Into<Option<u64>>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_type(mut self, item_type: impl Into<Option<u64>>) -> Self {
        self.item_type = item_type.into();
        self
    }

    pub fn with_display(mut self, display: ItemDisplay) -> Self {
        self.display = display;
        self
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(RecordKind::Item, self.id)
    }

    pub fn title(&self) -> &str {
        self.metadata.title()
    }

    /// An item is an annotation when its type matches the configured
    /// annotation item type. With no annotation type configured, nothing is.
    pub fn is_annotation(&self, annotation_type: Option<u64>) -> bool {
        matches!((self.item_type, annotation_type), (Some(own), Some(annotation)) if own == annotation)
    }

    pub fn is_displayed(&self) -> bool {
        self.display != ItemDisplay::Never
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: u64,
    pub item: u64,
    pub filename: String,
    #[serde(default)]
    pub metadata: Metadata,
}
impl File {
    pub fn new(id: u64, item: u64, filename: impl Into<String>) -> Self {
        Self {
            id,
            item,
            filename: filename.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(RecordKind::File, self.id)
    }

    /// The Dublin Core title when there is one, the original filename otherwise.
    pub fn display_title(&self) -> &str {
        self.metadata.first(DublinCore::Title).unwrap_or(&self.filename)
    }
}

/// One attachment slot of an exhibit page block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// The attached item, if it still resolves to one.
    #[serde(default)]
    pub item: Option<u64>,
}
impl Attachment {
    pub fn item(item: u64) -> Self {
        Self { item: Some(item) }
    }

    pub fn dangling() -> Self {
        Self { item: None }
    }
}

/// A composite block on an exhibit page, showing a run of attached items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitPageBlock {
    pub id: u64,
    /// Title of the page the block sits on; used as the manifest label.
    pub page_title: String,
    /// Attachments in their persisted order.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub text: Option<String>,
}
impl ExhibitPageBlock {
    pub fn new(id: u64, page_title: impl Into<String>) -> Self {
        Self {
            id,
            page_title: page_title.into(),
            attachments: Vec::new(),
            text: None,
        }
    }

    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = Attachment>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(RecordKind::ExhibitPageBlock, self.id)
    }
}
