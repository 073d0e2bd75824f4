//! `folio`: build presentation documents from a fixture of content records.

mod error;

use crate::error::{ErrorKind, Result};
use clap::{Parser, Subcommand};
use exn::ResultExt;
use folio_cache::{CacheHandle, Database, MemoryStore, OverrideHandle, SqliteStore};
use folio_config::{Config, StoreConfig};
use folio_document::{ApiVersion, Document};
use folio_engine::{
    Collaborators, Dispatcher, Registry, Request, SearchService, SkeletonCanvases, UriHandle, UriTemplate,
};
use folio_records::{MemoryRepository, RecordKey, RecordKind, RepositoryHandle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt, reload};

type FilterHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Build IIIF presentation documents")]
struct Cli {
    /// Configuration file (.toml, .yaml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// JSON fixture with `collections`, `items`, `files` and
    /// `exhibit_page_blocks` arrays
    #[arg(short, long, global = true)]
    records: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a document and print the response body
    Build {
        /// Presentation API version (2, 3, iiifv2, iiifv3)
        version: String,
        /// Record kind (collections, items, files, exhibit_page_blocks)
        kind: String,
        id: u64,
        /// Build the collection document rather than the manifest
        #[arg(long)]
        collection: bool,
        /// Leave annotation references out of canvases
        #[arg(long)]
        bare: bool,
        #[arg(long)]
        privileged: bool,
    },
    /// Save an override document that seeds later builds of a record
    Override {
        version: String,
        kind: String,
        id: u64,
        /// JSON object to save
        document: PathBuf,
    },
}

struct Stores {
    cache: CacheHandle,
    overrides: OverrideHandle,
    database: Option<Database>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = init_tracing();
    let config = match Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config) {
        Ok(config) => config,
        Err(err) => {
            error!(error = ?err, "{}", &*err);
            return ExitCode::FAILURE;
        },
    };
    apply_log_level(&filter, &config);
    match run(cli, config).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = ?err, "{}", &*err);
            ExitCode::FAILURE
        },
    }
}

/// Installed before configuration loads, filtered by `RUST_LOG` or the
/// default level until [`apply_log_level`] knows better.
fn init_tracing() -> FilterHandle {
    let default = Config::default().log.level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(std::io::stderr)).init();
    handle
}

/// `RUST_LOG` wins over the configured level.
fn apply_log_level(handle: &FilterHandle, config: &Config) {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return;
    }
    if let Err(err) = handle.reload(EnvFilter::new(&config.log.level)) {
        warn!(%err, level = %config.log.level, "could not apply configured log level");
    }
}

async fn run(cli: Cli, config: Config) -> Result<ExitCode> {
    let repository = load_records(cli.records.as_deref())?;
    let stores = open_stores(&config).await?;
    let code = match cli.command {
        Command::Build { version, kind, id, collection, bare, privileged } => {
            let request = Request::new(version, kind, id).bare(bare).privileged(privileged);
            let request = if collection { request.collection() } else { request };
            let response = dispatcher(&config, repository, &stores)?.dispatch(&request).await;
            let body = serde_json::to_string_pretty(&response.body).or_raise(|| ErrorKind::Output)?;
            println!("{body}");
            if response.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        },
        Command::Override { version, kind, id, document } => {
            let family = version.parse::<ApiVersion>().or_raise(|| ErrorKind::Argument(version.clone()))?;
            let kind = kind.parse::<RecordKind>().or_raise(|| ErrorKind::Argument(kind.clone()))?;
            let saved = read_document(&document)?;
            let record = RecordKey::new(kind, id);
            stores.overrides.save(record, family, &saved).await.or_raise(|| ErrorKind::Store)?;
            if stores.database.is_none() {
                warn!("memory store in use; the override is discarded on exit");
            }
            info!(%record, %family, "saved override document");
            ExitCode::SUCCESS
        },
    };
    if let Some(database) = stores.database {
        database.close().await;
    }
    Ok(code)
}

fn load_records(path: Option<&Path>) -> Result<RepositoryHandle> {
    let Some(path) = path else {
        debug!("no record fixture given; starting with an empty repository");
        return Ok(Arc::new(MemoryRepository::default()));
    };
    let bytes = std::fs::read(path).or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let repository = MemoryRepository::from_json(bytes).or_raise(|| ErrorKind::Records)?;
    Ok(Arc::new(repository.with_name(path.display().to_string())))
}

fn read_document(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    Document::from_slice(bytes).or_raise(|| ErrorKind::Argument(format!("{} is not a JSON object", path.display())))
}

async fn open_stores(config: &Config) -> Result<Stores> {
    Ok(match &config.store {
        StoreConfig::Memory => {
            let store = Arc::new(MemoryStore::default());
            Stores { cache: store.clone(), overrides: store, database: None }
        },
        StoreConfig::Sqlite { path } => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Store)?;
            }
            let database = Database::connect(path).await.or_raise(|| ErrorKind::Store)?;
            let store = Arc::new(SqliteStore::from(&database));
            Stores { cache: store.clone(), overrides: store, database: Some(database) }
        },
    })
}

fn dispatcher(config: &Config, repository: RepositoryHandle, stores: &Stores) -> Result<Dispatcher> {
    let template = UriTemplate::new(config.base(), config.uri_template.as_str()).or_raise(|| ErrorKind::Engine)?;
    let uris: UriHandle = Arc::new(template);
    let collaborators = Collaborators {
        repository: repository.clone(),
        cache: stores.cache.clone(),
        overrides: stores.overrides.clone(),
        uris: uris.clone(),
        annotation_type: config.annotation_item_type,
    };
    let registry = Registry::standard(collaborators, |dialect| Arc::new(SkeletonCanvases::new(dialect, uris.clone())));
    let dispatcher = Dispatcher::new(registry, repository);
    Ok(match config.search.enabled {
        true => dispatcher.with_search(SearchService::new(uris)),
        false => dispatcher,
    })
}
