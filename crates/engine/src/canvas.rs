//! Canvas producers.
//!
//! Building a canvas (image services, dimensions, annotation lists) is not
//! the engine's business; it asks a [`CanvasBuilder`] for an opaque
//! sub-document and embeds whatever comes back.

use crate::error::Result;
use crate::uri::UriHandle;
use async_trait::async_trait;
use folio_document::{ApiVersion, Dialect, Document};
use folio_records::{File, Item, RecordKind};
use serde_json::json;
use std::sync::Arc;

pub type CanvasHandle = Arc<dyn CanvasBuilder>;

/// Per-version producer of canvas sub-documents.
#[async_trait]
pub trait CanvasBuilder: Send + Sync {
    /// Standard canvas for an item's media.
    async fn canvas(&self, item: &Item) -> Result<Document>;

    /// Canvas for an annotation item, carrying its annotation references.
    async fn annotation_canvas(&self, item: &Item) -> Result<Document>;

    /// Canvas for a single file's derivative media.
    async fn file_canvas(&self, file: &File) -> Result<Document>;
}

/// Minimal [`CanvasBuilder`]: identifier, type and label, plus an annotation
/// reference for annotation items. Good enough to exercise the engine end to
/// end; real deployments plug in their image pipeline instead.
pub struct SkeletonCanvases {
    dialect: &'static Dialect,
    uris: UriHandle,
}
impl SkeletonCanvases {
    pub fn new(dialect: &'static Dialect, uris: UriHandle) -> Self {
        Self { dialect, uris }
    }

    fn canvas_type(&self) -> &'static str {
        match self.dialect.version {
            ApiVersion::V2 => "sc:Canvas",
            ApiVersion::V3 => "Canvas",
        }
    }

    fn annotation_list_type(&self) -> &'static str {
        match self.dialect.version {
            ApiVersion::V2 => "sc:AnnotationList",
            ApiVersion::V3 => "AnnotationPage",
        }
    }

    fn skeleton(&self, kind: RecordKind, id: u64, label: &str) -> Result<Document> {
        let uri = self.uris.uri(self.dialect.version, kind, id, "canvas.json")?;
        Ok(Document::new()
            .with(self.dialect.id_key, uri)
            .with(self.dialect.type_key, self.canvas_type())
            .with("label", self.dialect.text(label)))
    }
}

#[async_trait]
impl CanvasBuilder for SkeletonCanvases {
    async fn canvas(&self, item: &Item) -> Result<Document> {
        self.skeleton(RecordKind::Item, item.id, item.title())
    }

    async fn annotation_canvas(&self, item: &Item) -> Result<Document> {
        let list = self.uris.uri(self.dialect.version, RecordKind::Item, item.id, "annolist.json")?;
        let reference = json!({
            self.dialect.id_key: list,
            self.dialect.type_key: self.annotation_list_type(),
        });
        Ok(self.skeleton(RecordKind::Item, item.id, item.title())?.with(self.dialect.annotations_key, json!([reference])))
    }

    async fn file_canvas(&self, file: &File) -> Result<Document> {
        self.skeleton(RecordKind::File, file.id, file.display_title())
    }
}
