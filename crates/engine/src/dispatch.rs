//! Request routing.
//!
//! A [`Request`] names a version, a record kind and an id as the caller
//! typed them. The [`Dispatcher`] resolves both names, loads the record,
//! hands it to the right builder and wraps the outcome in a [`Response`].
//! Failures never escape as errors: they become a status plus a
//! `{"message": ...}` envelope.

use crate::builder::DocumentBuilder;
use crate::error::{Error, ErrorKind, Result};
use crate::registry::Registry;
use crate::search::SearchService;
use crate::variant::Scope;
use exn::{OptionExt, ResultExt};
use folio_document::{ApiVersion, Document, DocumentKind};
use folio_records::{RecordKey, RecordKind, RepositoryHandle};
use serde_json::{Value, json};
use tracing::{debug, error, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub version: String,
    pub kind: String,
    pub id: u64,
    pub document: DocumentKind,
    pub bare: bool,
    pub privileged: bool,
}
impl Request {
    /// Public, full manifest request.
    pub fn new(version: impl Into<String>, kind: impl Into<String>, id: u64) -> Self {
        Self {
            version: version.into(),
            kind: kind.into(),
            id,
            document: DocumentKind::Manifest,
            bare: false,
            privileged: false,
        }
    }

    pub fn collection(mut self) -> Self {
        self.document = DocumentKind::Collection;
        self
    }

    pub fn bare(mut self, bare: bool) -> Self {
        self.bare = bare;
        self
    }

    pub fn privileged(mut self, privileged: bool) -> Self {
        self.privileged = privileged;
        self
    }

    pub fn scope(&self) -> Scope {
        Scope::public().privileged(self.privileged).bare(self.bare)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
    Failed,
}
impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
            Self::Failed => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub body: Value,
}
impl Response {
    pub fn ok(document: Document) -> Self {
        Self {
            status: Status::Ok,
            body: document.into_value(),
        }
    }

    /// Not-found errors report only their own kind. Failures also name the
    /// innermost cause, e.g. the parse error behind a corrupt override.
    pub fn from_error(err: &Error) -> Self {
        let kind: &ErrorKind = err;
        if kind.is_not_found() {
            return Self {
                status: Status::NotFound,
                body: json!({ "message": kind.to_string() }),
            };
        }
        let mut cause = err.frame();
        while let Some(child) = cause.children().first() {
            cause = child;
        }
        let message = match std::ptr::eq(cause, err.frame()) {
            true => kind.to_string(),
            false => format!("{kind}: {}", cause.error()),
        };
        Self {
            status: Status::Failed,
            body: json!({ "message": message }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

pub struct Dispatcher {
    registry: Registry,
    repository: RepositoryHandle,
    search: Option<SearchService>,
}
impl Dispatcher {
    pub fn new(registry: Registry, repository: RepositoryHandle) -> Self {
        Self {
            registry,
            repository,
            search: None,
        }
    }

    /// Advertise a content search service on collection and non-annotation
    /// item documents.
    pub fn with_search(mut self, search: SearchService) -> Self {
        self.search = Some(search);
        self
    }

    #[instrument(skip_all, fields(version = %request.version, kind = %request.kind, id = request.id))]
    pub async fn dispatch(&self, request: &Request) -> Response {
        match self.route(request).await {
            Ok(document) => Response::ok(document),
            Err(err) => {
                let response = Response::from_error(&err);
                match response.status {
                    Status::NotFound => debug!(error = %&*err, "nothing to serve"),
                    _ => error!(error = ?err, "failed to build document"),
                }
                response
            },
        }
    }

    async fn route(&self, request: &Request) -> Result<Document> {
        let version = request
            .version
            .parse::<ApiVersion>()
            .or_raise(|| ErrorKind::UnknownVersion(request.version.clone()))?;
        let kind = request
            .kind
            .parse::<RecordKind>()
            .or_raise(|| ErrorKind::UnknownRecordKind(request.kind.clone()))?;
        let builder = self.registry.get(version).ok_or_raise(|| ErrorKind::Unregistered(version))?;
        let record = RecordKey::new(kind, request.id);
        let scope = request.scope();

        let (document, searchable) = match (kind, request.document) {
            (RecordKind::Collection, document) => {
                let collection = self.load(record, self.repository.collection(record.id).await)?;
                let built = match document {
                    DocumentKind::Collection => builder.collection(&collection, scope).await?,
                    DocumentKind::Manifest => builder.collection_manifest(&collection, scope).await?,
                };
                (built, true)
            },
            (_, DocumentKind::Collection) => exn::bail!(ErrorKind::Unroutable {
                kind,
                document: DocumentKind::Collection,
            }),
            (RecordKind::Item, DocumentKind::Manifest) => {
                let item = self.load(record, self.repository.item(record.id).await)?;
                (builder.item_manifest(&item, scope).await?, !builder.is_annotation(&item))
            },
            (RecordKind::File, DocumentKind::Manifest) => {
                let file = self.load(record, self.repository.file(record.id).await)?;
                (builder.file_manifest(&file, scope).await?, false)
            },
            (RecordKind::ExhibitPageBlock, DocumentKind::Manifest) => {
                let block = self.load(record, self.repository.exhibit_block(record.id).await)?;
                (builder.exhibit_block_manifest(&block, scope.rendering).await?, false)
            },
        };

        self.decorate(builder, record, document, searchable)
    }

    fn load<T>(&self, record: RecordKey, found: folio_records::error::Result<Option<T>>) -> Result<T> {
        found.or_raise(|| ErrorKind::Repository)?.ok_or_raise(|| ErrorKind::NotFound(record))
    }

    fn decorate(&self, builder: &DocumentBuilder, record: RecordKey, document: Document, searchable: bool) -> Result<Document> {
        match &self.search {
            Some(search) if searchable => search.attach(document, builder.dialect(), record),
            _ => Ok(document),
        }
    }
}
