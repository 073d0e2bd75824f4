//! Document builders.
//!
//! One [`DocumentBuilder`] per API version, all running the same procedure
//! against their [`Dialect`]:
//!
//! 1. Compute the canonical identifier and default label.
//! 2. If the record isn't eligible for the requested document kind, return
//!    the blank skeleton. Nothing is cached.
//! 3. Work out the [`CacheVariant`] and return the cached document on a hit.
//! 4. Otherwise seed from the saved override document, or a blank skeleton.
//! 5. Drop whatever children the seed carried and repopulate them from the
//!    live hierarchy.
//! 6. Stamp the descriptive metadata (and for collections, `within`).
//! 7. Cache the result under the variant from step 3.
//!
//! Exhibit page blocks skip steps 3, 4 and 7: they are rebuilt every time.

use crate::canvas::CanvasHandle;
use crate::error::{ErrorKind, Result};
use crate::hierarchy::Hierarchy;
use crate::uri::UriHandle;
use crate::variant::{CacheVariant, Rendering, Scope};
use exn::ResultExt;
use folio_cache::{CacheHandle, OverrideHandle};
use folio_document::metadata::{self, Stamp};
use folio_document::{ApiVersion, Dialect, Document, DocumentKind, template};
use folio_records::{Collection, ExhibitPageBlock, File, Item, RecordKey, RecordKind, RepositoryHandle};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Version-independent collaborators shared by every builder.
#[derive(Clone)]
pub struct Collaborators {
    pub repository: RepositoryHandle,
    pub cache: CacheHandle,
    pub overrides: OverrideHandle,
    pub uris: UriHandle,
    /// Item type marking annotation items.
    pub annotation_type: Option<u64>,
}

/// Builds presentation documents of one API version.
pub struct DocumentBuilder {
    dialect: &'static Dialect,
    canvases: CanvasHandle,
    collaborators: Collaborators,
}

impl DocumentBuilder {
    pub fn new(dialect: &'static Dialect, canvases: CanvasHandle, collaborators: Collaborators) -> Self {
        Self { dialect, canvases, collaborators }
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    pub fn version(&self) -> ApiVersion {
        self.dialect.version
    }

    pub fn is_annotation(&self, item: &Item) -> bool {
        item.is_annotation(self.collaborators.annotation_type)
    }

    /// Collection document listing sub-collections and sub-manifests as bare
    /// references.
    #[instrument(skip_all, fields(version = %self.version(), collection = collection.id))]
    pub async fn collection(&self, collection: &Collection, scope: Scope) -> Result<Document> {
        let kind = DocumentKind::Collection;
        let id = self.uri(RecordKind::Collection, collection.id, kind.suffix())?;
        let label = collection.title();
        if !collection.is_collection() {
            debug!("collection is presented as a manifest; returning blank collection");
            return Ok(template::blank(self.dialect, kind, &id, label, Vec::new()));
        }
        let variant = CacheVariant::new(self.version(), kind, scope);
        if let Some(cached) = self.cached(collection.key(), &variant).await? {
            return Ok(cached);
        }
        let seed = self.seed(collection.key(), kind, &id, label).await?;

        let hierarchy = self.hierarchy();
        let mut members = Vec::new();
        for sub in hierarchy.subcollections_of(collection).await? {
            members.push(self.reference(DocumentKind::Collection, &sub)?);
        }
        for sub in hierarchy.submanifests_of(collection).await? {
            members.push(self.reference(DocumentKind::Manifest, &sub)?);
        }
        let document = self.populate(seed, kind, members);
        let document = metadata::apply(document, self.dialect, Stamp { kind, id: &id, label, metadata: &collection.metadata });
        let document = match hierarchy.parent_of(collection).await? {
            Some(parent) => document.with("within", self.uri(RecordKind::Collection, parent.id, kind.suffix())?),
            None => document.without("within"),
        };

        self.store(collection.key(), &variant, &document).await?;
        Ok(document)
    }

    /// Manifest for a collection presented as a manifest: one canvas per
    /// displayed member item.
    #[instrument(skip_all, fields(version = %self.version(), collection = collection.id))]
    pub async fn collection_manifest(&self, collection: &Collection, scope: Scope) -> Result<Document> {
        let kind = DocumentKind::Manifest;
        let id = self.uri(RecordKind::Collection, collection.id, kind.suffix())?;
        let label = collection.title();
        if !collection.is_manifest() {
            debug!("collection is not presented as a manifest; returning blank manifest");
            return Ok(template::blank(self.dialect, kind, &id, label, Vec::new()));
        }
        let variant = CacheVariant::new(self.version(), kind, scope);
        if let Some(cached) = self.cached(collection.key(), &variant).await? {
            return Ok(cached);
        }
        let seed = self.seed(collection.key(), kind, &id, label).await?;

        let canvases = self.hierarchy().canvases_for(collection, self.canvases.as_ref()).await?;
        let document = self.populate(seed, kind, self.render(canvases, scope.rendering));
        let document = metadata::apply(document, self.dialect, Stamp { kind, id: &id, label, metadata: &collection.metadata });

        self.store(collection.key(), &variant, &document).await?;
        Ok(document)
    }

    /// Manifest for a single item. Items inside a collection are labelled
    /// with the collection's title.
    #[instrument(skip_all, fields(version = %self.version(), item = item.id))]
    pub async fn item_manifest(&self, item: &Item, scope: Scope) -> Result<Document> {
        let kind = DocumentKind::Manifest;
        let id = self.uri(RecordKind::Item, item.id, kind.suffix())?;
        let label = item.title();
        let variant = CacheVariant::new(self.version(), kind, scope);
        if let Some(cached) = self.cached(item.key(), &variant).await? {
            return Ok(cached);
        }
        let seed = self.seed(item.key(), kind, &id, label).await?;

        let canvas = self.item_canvas(item).await?;
        let document = self.populate(seed, kind, self.render(vec![canvas], scope.rendering));
        let document = metadata::apply(document, self.dialect, Stamp { kind, id: &id, label, metadata: &item.metadata });
        let document = match self.collection_of(item).await? {
            Some(collection) => document.with("label", self.dialect.text(collection.title())),
            None => document,
        };

        self.store(item.key(), &variant, &document).await?;
        Ok(document)
    }

    /// Manifest with exactly one canvas for a file's derivative media.
    #[instrument(skip_all, fields(version = %self.version(), file = file.id))]
    pub async fn file_manifest(&self, file: &File, scope: Scope) -> Result<Document> {
        let kind = DocumentKind::Manifest;
        let id = self.uri(RecordKind::File, file.id, kind.suffix())?;
        let label = file.display_title();
        let variant = CacheVariant::new(self.version(), kind, scope);
        if let Some(cached) = self.cached(file.key(), &variant).await? {
            return Ok(cached);
        }
        let seed = self.seed(file.key(), kind, &id, label).await?;

        let canvas = self.canvases.file_canvas(file).await.or_raise(|| ErrorKind::Canvas)?;
        let document = self.populate(seed, kind, self.render(vec![canvas], scope.rendering));
        let document = metadata::apply(document, self.dialect, Stamp { kind, id: &id, label, metadata: &file.metadata });

        self.store(file.key(), &variant, &document).await?;
        Ok(document)
    }

    /// Manifest of an exhibit page block's attached items, in attachment
    /// order. Attachments that don't resolve to an item are skipped. Never
    /// cached and never seeded from an override document, so only the
    /// rendering matters, not who is asking.
    #[instrument(skip_all, fields(version = %self.version(), block = block.id))]
    pub async fn exhibit_block_manifest(&self, block: &ExhibitPageBlock, rendering: Rendering) -> Result<Document> {
        let kind = DocumentKind::Manifest;
        let id = self.uri(RecordKind::ExhibitPageBlock, block.id, kind.suffix())?;
        let mut canvases = Vec::with_capacity(block.attachments.len());
        for (position, attachment) in block.attachments.iter().enumerate() {
            let Some(item_id) = attachment.item else {
                warn!(position, "attachment has no item; skipping");
                continue;
            };
            let Some(item) = self.collaborators.repository.item(item_id).await.or_raise(|| ErrorKind::Repository)?
            else {
                warn!(position, item = item_id, "attached item no longer exists; skipping");
                continue;
            };
            canvases.push(self.item_canvas(&item).await?);
        }
        let canvases = self.render(canvases, rendering);
        let document = template::blank(self.dialect, kind, &id, &block.page_title, canvases);
        Ok(match block.text.as_deref().filter(|text| !text.trim().is_empty()) {
            Some(text) => document.with(self.dialect.description_key, self.dialect.text(text)),
            None => document,
        })
    }

    fn hierarchy(&self) -> Hierarchy<'_> {
        Hierarchy::new(self.collaborators.repository.as_ref())
    }

    fn uri(&self, kind: RecordKind, id: u64, suffix: &str) -> Result<String> {
        self.collaborators.uris.uri(self.version(), kind, id, suffix)
    }

    /// Bare reference to a child collection, as a collection or a manifest.
    fn reference(&self, kind: DocumentKind, collection: &Collection) -> Result<Value> {
        let id = self.uri(RecordKind::Collection, collection.id, kind.suffix())?;
        Ok(template::bare(self.dialect, kind, &id, collection.title()).into_value())
    }

    /// Annotation items get the annotation canvas, everything else the
    /// standard one.
    async fn item_canvas(&self, item: &Item) -> Result<Document> {
        let canvas = if self.is_annotation(item) {
            self.canvases.annotation_canvas(item).await
        } else {
            self.canvases.canvas(item).await
        };
        canvas.or_raise(|| ErrorKind::Canvas)
    }

    async fn collection_of(&self, item: &Item) -> Result<Option<Collection>> {
        let Some(collection) = item.collection else {
            return Ok(None);
        };
        self.collaborators.repository.collection(collection).await.or_raise(|| ErrorKind::Repository)
    }

    /// Bare renderings leave out annotation references.
    fn render(&self, canvases: Vec<Document>, rendering: Rendering) -> Vec<Value> {
        canvases
            .into_iter()
            .map(|canvas| match rendering {
                Rendering::Bare => canvas.without(self.dialect.annotations_key),
                Rendering::Full => canvas,
            })
            .map(Document::into_value)
            .collect()
    }

    async fn cached(&self, record: RecordKey, variant: &CacheVariant) -> Result<Option<Document>> {
        let cached = self.collaborators.cache.get(record, &variant.label()).await.or_raise(|| ErrorKind::Cache)?;
        debug!(%record, %variant, hit = cached.is_some(), "cache lookup");
        Ok(cached)
    }

    /// The saved override document, or a blank skeleton when there is none.
    async fn seed(&self, record: RecordKey, kind: DocumentKind, id: &str, label: &str) -> Result<Document> {
        let saved = self.collaborators.overrides.load(record, self.version()).await.or_raise(|| ErrorKind::Overrides)?;
        debug!(%record, overridden = saved.is_some(), "seeding document");
        Ok(saved.unwrap_or_else(|| template::blank(self.dialect, kind, id, label, Vec::new())))
    }

    /// Replace every children container with freshly resolved children.
    fn populate(&self, document: Document, kind: DocumentKind, children: Vec<Value>) -> Document {
        document
            .without_all(self.dialect.children_keys(kind))
            .with(self.dialect.children_key(kind), self.dialect.wrap_children(kind, children))
    }

    async fn store(&self, record: RecordKey, variant: &CacheVariant, document: &Document) -> Result<()> {
        self.collaborators.cache.put(record, &variant.label(), document).await.or_raise(|| ErrorKind::Cache)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::canvas::{CanvasBuilder, SkeletonCanvases};
    use crate::uri::UriTemplate;
    use async_trait::async_trait;
    use folio_cache::MemoryStore;
    use rstest::rstest;
    use folio_records::{Attachment, CollectionRole, ContentRepository, MemoryRepository};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const ANNOTATION_TYPE: u64 = 3;

    /// Skeleton canvases that remember which producer was asked for what.
    pub(crate) struct Recording {
        inner: SkeletonCanvases,
        pub(crate) calls: Mutex<Vec<(&'static str, u64)>>,
    }

    #[async_trait]
    impl CanvasBuilder for Recording {
        async fn canvas(&self, item: &Item) -> Result<Document> {
            self.calls.lock().unwrap().push(("canvas", item.id));
            self.inner.canvas(item).await
        }

        async fn annotation_canvas(&self, item: &Item) -> Result<Document> {
            self.calls.lock().unwrap().push(("annotation", item.id));
            self.inner.annotation_canvas(item).await
        }

        async fn file_canvas(&self, file: &File) -> Result<Document> {
            self.calls.lock().unwrap().push(("file", file.id));
            self.inner.file_canvas(file).await
        }
    }

    pub(crate) struct Harness {
        pub(crate) repository: Arc<MemoryRepository>,
        pub(crate) store: Arc<MemoryStore>,
        pub(crate) canvases: Arc<Recording>,
        pub(crate) collaborators: Collaborators,
    }
    impl Harness {
        pub(crate) fn new(store: MemoryStore) -> Self {
            let repository = Arc::new(
                MemoryRepository::default()
                    .with_collection(Collection::new(5, "Ledger"))
                    .with_collection(Collection::new(7, "Atlas"))
                    .with_collection(Collection::new(8, "Maps").with_parent(7))
                    .with_collection(Collection::new(9, "Deed").with_parent(7).with_role(CollectionRole::Manifest))
                    .with_item(Item::new(20, "Page 1").in_collection(9))
                    .with_item(Item::new(42, "Marginalia").in_collection(9).with_type(ANNOTATION_TYPE))
                    .with_item(Item::new(50, "Loose leaf"))
                    .with_file(File::new(60, 50, "leaf.tif"))
                    .with_block(
                        ExhibitPageBlock::new(3, "Highlights")
                            .with_attachments([Attachment::item(20), Attachment::dangling(), Attachment::item(50)])
                            .with_text("Selected pages"),
                    )
                    .with_block(ExhibitPageBlock::new(77, "Notes").with_attachments([Attachment::item(42)])),
            );
            let store = Arc::new(store);
            let uris: UriHandle = Arc::new(UriTemplate::new("https://x.org", UriTemplate::DEFAULT).unwrap());
            let canvases = Arc::new(Recording {
                inner: SkeletonCanvases::new(&Dialect::V3, uris.clone()),
                calls: Mutex::default(),
            });
            let collaborators = Collaborators {
                repository: repository.clone(),
                cache: store.clone(),
                overrides: store.clone(),
                uris,
                annotation_type: Some(ANNOTATION_TYPE),
            };
            Self { repository, store, canvases, collaborators }
        }

        pub(crate) fn builder(&self, dialect: &'static Dialect) -> DocumentBuilder {
            let canvases: CanvasHandle = match dialect.version {
                ApiVersion::V3 => self.canvases.clone(),
                ApiVersion::V2 => Arc::new(SkeletonCanvases::new(dialect, self.collaborators.uris.clone())),
            };
            DocumentBuilder::new(dialect, canvases, self.collaborators.clone())
        }

        async fn collection(&self, id: u64) -> Collection {
            self.repository.collection(id).await.unwrap().unwrap()
        }

        async fn item(&self, id: u64) -> Item {
            self.repository.item(id).await.unwrap().unwrap()
        }
    }

    #[tokio::test]
    async fn test_v3_collection_lists_subcollections_then_submanifests() {
        let harness = Harness::new(MemoryStore::default());
        let atlas = harness.collection(7).await;
        let document = harness.builder(&Dialect::V3).collection(&atlas, Scope::public()).await.unwrap();
        assert_eq!(
            document.into_value(),
            json!({
                "@context": "http://iiif.io/api/presentation/3/context.json",
                "id": "https://x.org/iiifv3/collections/7/collection.json",
                "type": "Collection",
                "label": {"en": ["Atlas"]},
                "items": [
                    {
                        "id": "https://x.org/iiifv3/collections/8/collection.json",
                        "type": "Collection",
                        "label": {"en": ["Maps"]},
                    },
                    {
                        "id": "https://x.org/iiifv3/collections/9/manifest.json",
                        "type": "Manifest",
                        "label": {"en": ["Deed"]},
                    },
                ],
                "metadata": [{"label": {"en": ["Title"]}, "value": {"en": ["Atlas"]}}],
            })
        );
    }

    #[tokio::test]
    async fn test_within_only_when_parented() {
        let harness = Harness::new(MemoryStore::default());
        let builder = harness.builder(&Dialect::V2);
        let atlas = builder.collection(&harness.collection(7).await, Scope::public()).await.unwrap();
        let maps = builder.collection(&harness.collection(8).await, Scope::public()).await.unwrap();
        assert!(!atlas.contains_key("within"));
        assert_eq!(maps.get("within"), Some(&json!("https://x.org/iiifv2/collections/7/collection.json")));
        assert_eq!(maps.get("members"), Some(&json!([])));
    }

    #[tokio::test]
    async fn test_second_build_is_served_from_cache() {
        let harness = Harness::new(MemoryStore::default());
        let builder = harness.builder(&Dialect::V3);
        let atlas = harness.collection(7).await;
        let first = builder.collection(&atlas, Scope::public()).await.unwrap();
        let lookups = harness.repository.lookups();
        let second = builder.collection(&atlas, Scope::public()).await.unwrap();
        assert_eq!(first.to_vec().unwrap(), second.to_vec().unwrap());
        assert_eq!(harness.repository.lookups(), lookups);
        assert_eq!(harness.store.cache_writes(), 1);
    }

    #[tokio::test]
    async fn test_variants_are_cached_separately() {
        let harness = Harness::new(MemoryStore::default());
        let builder = harness.builder(&Dialect::V3);
        let atlas = harness.collection(7).await;
        builder.collection(&atlas, Scope::public()).await.unwrap();
        builder.collection(&atlas, Scope::private()).await.unwrap();
        builder.collection(&atlas, Scope::public().bare(true)).await.unwrap();
        harness.builder(&Dialect::V2).collection(&atlas, Scope::public()).await.unwrap();
        assert_eq!(harness.store.cached_len().await, 4);
    }

    #[tokio::test]
    async fn test_override_keeps_curated_keys_but_not_stale_children() {
        let saved = Document::new()
            .with("id", "https://elsewhere/7")
            .with("label", json!({"en": ["Old title"]}))
            .with("rights", "http://creativecommons.org/licenses/by/4.0/")
            .with("items", json!([{"id": "https://x.org/iiifv3/collections/99/collection.json"}]))
            .with("metadata", json!([{"label": {"en": ["Curator note"]}, "value": {"en": ["Fragile"]}}]));
        let store = MemoryStore::with_overrides([(RecordKey::new(RecordKind::Collection, 7), ApiVersion::V3, saved)]);
        let harness = Harness::new(store);
        let atlas = harness.collection(7).await;
        let document = harness.builder(&Dialect::V3).collection(&atlas, Scope::public()).await.unwrap();

        assert_eq!(document.get("id"), Some(&json!("https://x.org/iiifv3/collections/7/collection.json")));
        assert_eq!(document.get("label"), Some(&json!({"en": ["Atlas"]})));
        assert_eq!(document.get("rights"), Some(&json!("http://creativecommons.org/licenses/by/4.0/")));
        let children: Vec<_> = document.children(&Dialect::V3, DocumentKind::Collection).into_iter().cloned().collect();
        assert_eq!(children.len(), 2);
        assert!(!children.contains(&json!({"id": "https://x.org/iiifv3/collections/99/collection.json"})));
        assert_eq!(
            document.get("metadata"),
            Some(&json!([
                {"label": {"en": ["Curator note"]}, "value": {"en": ["Fragile"]}},
                {"label": {"en": ["Title"]}, "value": {"en": ["Atlas"]}},
            ]))
        );
    }

    #[tokio::test]
    async fn test_v2_override_with_stray_containers_is_cleared() {
        let saved = Document::new()
            .with("collections", json!([{"@id": "stale"}]))
            .with("manifests", json!([{"@id": "stale"}]));
        let store = MemoryStore::with_overrides([(RecordKey::new(RecordKind::Collection, 8), ApiVersion::V2, saved)]);
        let harness = Harness::new(store);
        let maps = harness.collection(8).await;
        let document = harness.builder(&Dialect::V2).collection(&maps, Scope::public()).await.unwrap();
        assert!(!document.contains_key("collections"));
        assert!(!document.contains_key("manifests"));
        assert_eq!(document.get("members"), Some(&json!([])));
    }

    #[tokio::test]
    async fn test_ineligible_collection_manifest_is_blank_and_uncached() {
        let harness = Harness::new(MemoryStore::default());
        let ledger = harness.collection(5).await;
        let document = harness.builder(&Dialect::V3).collection_manifest(&ledger, Scope::public()).await.unwrap();
        assert_eq!(
            document.into_value(),
            json!({
                "@context": "http://iiif.io/api/presentation/3/context.json",
                "id": "https://x.org/iiifv3/collections/5/manifest.json",
                "type": "Manifest",
                "label": {"en": ["Ledger"]},
                "items": [],
            })
        );
        assert_eq!(harness.store.cache_writes(), 0);
    }

    #[tokio::test]
    async fn test_ineligible_collection_is_blank_and_uncached() {
        let harness = Harness::new(MemoryStore::default());
        let deed = harness.collection(9).await;
        let document = harness.builder(&Dialect::V2).collection(&deed, Scope::public()).await.unwrap();
        assert_eq!(document.get("@type"), Some(&json!("sc:Collection")));
        assert_eq!(document.get("members"), Some(&json!([])));
        assert_eq!(harness.store.cache_writes(), 0);
    }

    #[tokio::test]
    async fn test_v2_collection_manifest_embeds_sequence() {
        let harness = Harness::new(MemoryStore::default());
        let deed = harness.collection(9).await;
        let document = harness.builder(&Dialect::V2).collection_manifest(&deed, Scope::public()).await.unwrap();
        assert_eq!(
            document.get("sequences"),
            Some(&json!([{
                "@type": "sc:Sequence",
                "canvases": [
                    {"@id": "https://x.org/iiifv2/items/20/canvas.json", "@type": "sc:Canvas", "label": "Page 1"},
                    {"@id": "https://x.org/iiifv2/items/42/canvas.json", "@type": "sc:Canvas", "label": "Marginalia"},
                ],
            }]))
        );
        assert_eq!(harness.store.cache_writes(), 1);
    }

    #[tokio::test]
    async fn test_annotation_item_uses_annotation_canvas() {
        let harness = Harness::new(MemoryStore::default());
        let builder = harness.builder(&Dialect::V3);
        let item = harness.item(42).await;
        let document = builder.item_manifest(&item, Scope::public()).await.unwrap();
        assert_eq!(*harness.canvases.calls.lock().unwrap(), [("annotation", 42)]);
        let canvases = document.children(&Dialect::V3, DocumentKind::Manifest);
        assert_eq!(canvases.len(), 1);
        assert!(canvases[0].get("annotations").is_some());
        // Items in a collection carry the collection's title.
        assert_eq!(document.get("label"), Some(&json!({"en": ["Deed"]})));
    }

    #[tokio::test]
    async fn test_bare_item_manifest_drops_annotation_refs() {
        let harness = Harness::new(MemoryStore::default());
        let item = harness.item(42).await;
        let document = harness.builder(&Dialect::V3).item_manifest(&item, Scope::public().bare(true)).await.unwrap();
        let canvases = document.children(&Dialect::V3, DocumentKind::Manifest);
        assert!(canvases[0].get("annotations").is_none());
    }

    #[tokio::test]
    async fn test_standalone_item_keeps_own_title() {
        let harness = Harness::new(MemoryStore::default());
        let item = harness.item(50).await;
        let document = harness.builder(&Dialect::V2).item_manifest(&item, Scope::public()).await.unwrap();
        assert_eq!(document.get("label"), Some(&json!("Loose leaf")));
        assert_eq!(document.get("@id"), Some(&json!("https://x.org/iiifv2/items/50/manifest.json")));
    }

    #[tokio::test]
    async fn test_file_manifest_has_one_canvas() {
        let harness = Harness::new(MemoryStore::default());
        let file = harness.repository.file(60).await.unwrap().unwrap();
        let document = harness.builder(&Dialect::V3).file_manifest(&file, Scope::private()).await.unwrap();
        assert_eq!(document.get("label"), Some(&json!({"en": ["leaf.tif"]})));
        assert_eq!(
            document.get("items"),
            Some(&json!([{
                "id": "https://x.org/iiifv3/files/60/canvas.json",
                "type": "Canvas",
                "label": {"en": ["leaf.tif"]},
            }]))
        );
        assert_eq!(*harness.canvases.calls.lock().unwrap(), [("file", 60)]);
    }

    #[tokio::test]
    async fn test_exhibit_block_skips_dangling_attachments() {
        let harness = Harness::new(MemoryStore::default());
        let block = harness.repository.exhibit_block(3).await.unwrap().unwrap();
        let document = harness.builder(&Dialect::V3).exhibit_block_manifest(&block, Rendering::Full).await.unwrap();
        let ids: Vec<_> = document
            .children(&Dialect::V3, DocumentKind::Manifest)
            .into_iter()
            .filter_map(|canvas| canvas.get("id"))
            .cloned()
            .collect();
        assert_eq!(
            ids,
            [json!("https://x.org/iiifv3/items/20/canvas.json"), json!("https://x.org/iiifv3/items/50/canvas.json")]
        );
        assert_eq!(document.get("label"), Some(&json!({"en": ["Highlights"]})));
        assert_eq!(document.get("summary"), Some(&json!({"en": ["Selected pages"]})));
        assert_eq!(harness.store.cache_writes(), 0);
    }

    #[rstest]
    #[case(Rendering::Full, true)]
    #[case(Rendering::Bare, false)]
    #[tokio::test]
    async fn test_exhibit_block_rendering(#[case] rendering: Rendering, #[case] annotated: bool) {
        let harness = Harness::new(MemoryStore::default());
        let block = harness.repository.exhibit_block(77).await.unwrap().unwrap();
        let document = harness.builder(&Dialect::V3).exhibit_block_manifest(&block, rendering).await.unwrap();
        let canvases = document.children(&Dialect::V3, DocumentKind::Manifest);
        assert_eq!(canvases.len(), 1);
        assert_eq!(canvases[0].get("annotations").is_some(), annotated);
        assert_eq!(*harness.canvases.calls.lock().unwrap(), [("annotation", 42)]);
        assert_eq!(harness.store.cache_writes(), 0);
    }

    #[tokio::test]
    async fn test_exhibit_block_ignores_overrides_and_blank_text() {
        let saved = Document::new().with("rights", "reserved");
        let store =
            MemoryStore::with_overrides([(RecordKey::new(RecordKind::ExhibitPageBlock, 4), ApiVersion::V2, saved)]);
        let harness = Harness::new(store);
        let block = ExhibitPageBlock::new(4, "Empty").with_text("   ");
        let document = harness.builder(&Dialect::V2).exhibit_block_manifest(&block, Rendering::Full).await.unwrap();
        assert!(!document.contains_key("rights"));
        assert!(!document.contains_key("description"));
        assert_eq!(document.get("sequences"), Some(&json!([{"@type": "sc:Sequence", "canvases": []}])));
    }
}
