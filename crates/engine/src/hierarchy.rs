//! Parent, child and membership lookups across the collection tree.
//!
//! A collection's children are other collections of either role; the tree
//! itself doesn't distinguish them. The resolver partitions them by each
//! child's own [`CollectionRole`](folio_records::CollectionRole) flag.

use crate::canvas::CanvasBuilder;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use folio_document::Document;
use folio_records::{Collection, ContentRepository};
use tracing::trace;

pub struct Hierarchy<'a> {
    repository: &'a dyn ContentRepository,
}
impl<'a> Hierarchy<'a> {
    pub fn new(repository: &'a dyn ContentRepository) -> Self {
        Self { repository }
    }

    /// The parent collection, if the collection has one and it still exists.
    pub async fn parent_of(&self, collection: &Collection) -> Result<Option<Collection>> {
        let Some(parent) = collection.parent else {
            return Ok(None);
        };
        self.repository.collection(parent).await.or_raise(|| ErrorKind::Repository)
    }

    /// Direct children presented as collections, in repository order.
    pub async fn subcollections_of(&self, collection: &Collection) -> Result<Vec<Collection>> {
        Ok(self.children_of(collection).await?.into_iter().filter(Collection::is_collection).collect())
    }

    /// Direct children presented as manifests, in repository order.
    pub async fn submanifests_of(&self, collection: &Collection) -> Result<Vec<Collection>> {
        Ok(self.children_of(collection).await?.into_iter().filter(Collection::is_manifest).collect())
    }

    /// One standard canvas per member item that isn't hidden from display,
    /// in repository order.
    pub async fn canvases_for(&self, collection: &Collection, canvases: &dyn CanvasBuilder) -> Result<Vec<Document>> {
        let items = self.repository.collection_items(collection.id).await.or_raise(|| ErrorKind::Repository)?;
        let mut built = Vec::with_capacity(items.len());
        for item in items.iter().filter(|item| item.is_displayed()) {
            built.push(canvases.canvas(item).await.or_raise(|| ErrorKind::Canvas)?);
        }
        trace!(collection = collection.id, members = items.len(), canvases = built.len(), "resolved canvases");
        Ok(built)
    }

    async fn children_of(&self, collection: &Collection) -> Result<Vec<Collection>> {
        self.repository.child_collections(collection.id).await.or_raise(|| ErrorKind::Repository)
    }
}
