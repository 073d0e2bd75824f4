//! Stable document identifiers.
//!
//! Every identifier the engine writes into a document comes from a
//! [`UriResolver`], a deterministic function of
//! `(version, record kind, record id, suffix)`. The default resolver renders
//! an [upon] template so deployments can match whatever URL layout their
//! routes use:
//!
//! | Variable  | Example                 |
//! |-----------|-------------------------|
//! | `base`    | `https://example.org/iiif` |
//! | `version` | `iiifv3`                |
//! | `kind`    | `collections`           |
//! | `id`      | `7`                     |
//! | `suffix`  | `collection.json`       |
//!
//! # Example
//!
//! ```
//! use folio_document::ApiVersion;
//! use folio_engine::{UriResolver, UriTemplate};
//! use folio_records::RecordKind;
//!
//! let uris = UriTemplate::new("https://example.org/iiif/", UriTemplate::DEFAULT).unwrap();
//! let uri = uris.uri(ApiVersion::V3, RecordKind::Collection, 7, "collection.json").unwrap();
//! assert_eq!(uri, "https://example.org/iiif/iiifv3/collections/7/collection.json");
//! ```

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use folio_document::ApiVersion;
use folio_records::RecordKind;
use std::sync::Arc;
use upon::{Engine, Template};

pub type UriHandle = Arc<dyn UriResolver>;

/// Opaque function from `(version, record kind, record id, suffix)` to a URI.
///
/// Implementations must be deterministic and injective across their inputs:
/// two different tuples never share a URI.
pub trait UriResolver: Send + Sync {
    fn uri(&self, version: ApiVersion, kind: RecordKind, id: u64, suffix: &str) -> Result<String>;
}

/// [`UriResolver`] backed by a compiled [upon] template.
///
/// The template is compiled eagerly so syntax errors surface at construction
/// rather than halfway through a build.
pub struct UriTemplate {
    base: String,
    engine: Engine<'static>,
    template: Template<'static>,
}
impl UriTemplate {
    pub const DEFAULT: &'static str = "{{ base }}/{{ version }}/{{ kind }}/{{ id }}/{{ suffix }}";

    /// Compile `template`, minting identifiers under `base`. Trailing
    /// slashes on `base` are dropped.
    pub fn new(base: impl AsRef<str>, template: impl Into<String>) -> Result<Self> {
        let engine = Engine::new();
        let template = engine.compile(template.into()).or_raise(|| ErrorKind::Template)?;
        let resolver = Self {
            base: base.as_ref().trim().trim_end_matches('/').to_string(),
            engine,
            template,
        };
        // Render once so templates referencing unknown variables fail here too.
        resolver.uri(ApiVersion::V3, RecordKind::Collection, 0, "collection.json")?;
        Ok(resolver)
    }
}
impl UriResolver for UriTemplate {
    fn uri(&self, version: ApiVersion, kind: RecordKind, id: u64, suffix: &str) -> Result<String> {
        self.template
            .render(
                &self.engine,
                upon::value! {
                    base: self.base.as_str(),
                    version: version.slug(),
                    kind: kind.as_path(),
                    id: id.to_string(),
                    suffix: suffix,
                },
            )
            .to_string()
            .or_raise(|| ErrorKind::Template)
    }
}
