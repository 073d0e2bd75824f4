use crate::builder::{Collaborators, DocumentBuilder};
use crate::canvas::CanvasHandle;
use folio_document::{ApiVersion, Dialect};
use std::collections::BTreeMap;

/// Document builders keyed by the API version they produce.
///
/// Constructed explicitly and handed to the dispatcher; there is no global
/// registration.
#[derive(Default)]
pub struct Registry {
    builders: BTreeMap<ApiVersion, DocumentBuilder>,
}
impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One builder per supported version, sharing `collaborators`. Canvas
    /// producers are per version, so `canvases` is asked for one per dialect.
    pub fn standard(collaborators: Collaborators, canvases: impl Fn(&'static Dialect) -> CanvasHandle) -> Self {
        ApiVersion::ALL.into_iter().fold(Self::new(), |registry, version| {
            let dialect = version.dialect();
            registry.register(DocumentBuilder::new(dialect, canvases(dialect), collaborators.clone()))
        })
    }

    /// Add a builder, replacing any previous builder for the same version.
    pub fn register(mut self, builder: DocumentBuilder) -> Self {
        self.builders.insert(builder.version(), builder);
        self
    }

    pub fn get(&self, version: ApiVersion) -> Option<&DocumentBuilder> {
        self.builders.get(&version)
    }

    pub fn versions(&self) -> impl Iterator<Item = ApiVersion> + '_ {
        self.builders.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::SkeletonCanvases;
    use crate::uri::{UriHandle, UriTemplate};
    use folio_cache::MemoryStore;
    use folio_records::MemoryRepository;
    use std::sync::Arc;

    fn collaborators(uris: UriHandle) -> Collaborators {
        let store = Arc::new(MemoryStore::default());
        Collaborators {
            repository: Arc::new(MemoryRepository::default()),
            cache: store.clone(),
            overrides: store,
            uris,
            annotation_type: None,
        }
    }

    #[test]
    fn test_standard_registers_every_version() {
        let uris: UriHandle = Arc::new(UriTemplate::new("https://x.org", UriTemplate::DEFAULT).unwrap());
        let registry = Registry::standard(collaborators(uris.clone()), |dialect| {
            Arc::new(SkeletonCanvases::new(dialect, uris.clone()))
        });
        assert_eq!(registry.versions().collect::<Vec<_>>(), ApiVersion::ALL);
        for version in ApiVersion::ALL {
            assert_eq!(registry.get(version).map(DocumentBuilder::version), Some(version));
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert!(registry.get(ApiVersion::V2).is_none());
        assert_eq!(registry.versions().count(), 0);
    }
}
