//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults ([`Config::default`]).
//! 2. `folio.toml` in the platform configuration directory, if present.
//! 3. An explicitly given file (`.toml`, `.yaml`/`.yml` or `.json`).
//! 4. Environment variables prefixed `FOLIO_`, with `__` separating nested
//!    keys (`FOLIO_STORE__BACKEND=sqlite`, `FOLIO_SEARCH__ENABLED=true`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default document URI layout: `{base}/{version}/{kind}/{id}/{suffix}`.
pub const DEFAULT_URI_TEMPLATE: &str = "{{ base }}/{{ version }}/{{ kind }}/{{ id }}/{{ suffix }}";
const ENV_PREFIX: &str = "FOLIO_";
const CONFIG_FILENAME: &str = "folio.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Public base URL that document identifiers are minted under.
    pub base_url: String,
    /// [upon](https://docs.rs/upon) template for document identifiers. Has
    /// access to `base`, `version`, `kind`, `id` and `suffix`.
    pub uri_template: String,
    /// Item type identifying annotation items. Without it, no item is
    /// treated as an annotation.
    pub annotation_item_type: Option<u64>,
    pub search: SearchConfig,
    pub store: StoreConfig,
    pub log: LogConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/iiif-items".to_string(),
            uri_template: DEFAULT_URI_TEMPLATE.to_string(),
            annotation_item_type: None,
            search: SearchConfig::default(),
            store: StoreConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Advertise a content search service on collections and items.
    pub enabled: bool,
}

/// Where cached and override documents are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Process memory; everything is lost on exit.
    #[default]
    Memory,
    Sqlite {
        /// Defaults to `documents.sqlite` in the platform data directory.
        #[serde(default = "Config::default_database_path")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl Config {
    /// Load and validate configuration from every source.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let figment = Self::files(explicit)?.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    /// Defaults, the user configuration file and an optional explicit file,
    /// without environment variables.
    pub fn files(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = Self::user_config_path().filter(|path| path.is_file()) {
            debug!(path = %path.display(), "merging user configuration file");
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            debug!(path = %path.display(), "merging explicit configuration file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file_exact(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
                Some("json") => figment.merge(Json::file_exact(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        Ok(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()
    }

    /// Reject values that would only fail later, mid-build.
    pub fn validate(self) -> Result<Self> {
        let base = self.base_url.trim();
        if base.is_empty() {
            exn::bail!(ErrorKind::Invalid("base_url is empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            exn::bail!(ErrorKind::Invalid("base_url must be an http(s) URL"));
        }
        if self.uri_template.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("uri_template is empty"));
        }
        if let StoreConfig::Sqlite { path } = &self.store
            && path.as_os_str().is_empty()
        {
            exn::bail!(ErrorKind::Invalid("store.path is empty"));
        }
        Ok(self)
    }

    /// Base URL without trailing slashes.
    pub fn base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// `folio.toml` inside the platform configuration directory.
    pub fn user_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// SQLite database location inside the platform data directory, or an
    /// empty path (rejected by [`Config::validate`]) without a home directory.
    pub fn default_database_path() -> PathBuf {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("documents.sqlite")).unwrap_or_default()
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "folio")
    }
}
