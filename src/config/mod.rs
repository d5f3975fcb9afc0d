mod namespaces;

pub use namespaces::NamespaceConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::sync::ObjectKind;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Database URL; the scheme selects the backend (`postgres://`, `sqlite:`).
    /// Env: `SQLSYNC_DATABASE_URL`. Required.
    #[serde(default)]
    pub database_url: String,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// Env: `SQLSYNC_LOGLEVEL`. Default: `info`.
    #[serde(default)]
    pub loglevel: String,

    /// Pool size. The sync itself only ever holds one connection.
    /// Env: `SQLSYNC_MAX_CONNECTIONS`. Default: `2`.
    #[serde(default)]
    pub max_connections: u32,

    /// Directory to load SQL resources from instead of the embedded bundle.
    /// Env: `SQLSYNC_RESOURCE_DIR`. Default: unset (embedded bundle).
    #[serde(default)]
    pub resource_dir: Option<PathBuf>,

    /// Schema for unqualified object names; unset means the backend's own default.
    /// Env: `SQLSYNC_DEFAULT_SCHEMA`.
    #[serde(default)]
    pub default_schema: Option<String>,

    /// Exit with failure when any object failed to sync. `--strict` turns it on.
    /// Env: `SQLSYNC_FAIL_ON_ERROR`. Default: `false`.
    #[serde(default)]
    pub fail_on_error: bool,

    /// Object kinds to synchronize, in order.
    /// Env: `SQLSYNC_KINDS`. Default: procedures, functions, views.
    #[serde(default)]
    pub kinds: Vec<ObjectKind>,

    /// Resource name prefixes per kind (see `namespaces` table).
    #[serde(default)]
    pub namespaces: NamespaceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            loglevel: "info".to_string(),
            max_connections: 2,
            resource_dir: None,
            default_schema: None,
            fail_on_error: false,
            kinds: ObjectKind::ALL.to_vec(),
            namespaces: NamespaceConfig::default(),
        }
    }
}

const DEFAULT_CONFIG_FILE: &str = "sqlsync.toml";
const ENV_PREFIX: &str = "SQLSYNC_";

impl Config {
    /// Builds a Figment that merges defaults, a TOML file and `SQLSYNC_*` environment variables.
    /// Without an explicit `path`, `sqlsync.toml` is merged only if present.
    pub fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let file = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let figment = if file.is_file() {
            figment.merge(Toml::file(file))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extracts the configuration. An explicit `path` must point at an existing file. Required
    /// fields are checked by [`Config::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path.filter(|p| !p.is_file()) {
            return Err(ConfigError::Invalid(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::figment(path)
            .extract()
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if self.kinds.is_empty() {
            return Err(ConfigError::Invalid("kinds must not be empty".to_string()));
        }
        for kind in ObjectKind::ALL {
            if self.namespaces.for_kind(kind).trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "namespace for {} must not be empty",
                    kind.plural_name()
                )));
            }
        }
        Ok(())
    }
}
