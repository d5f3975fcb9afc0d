use thiserror::Error as ThisError;

use crate::db::Backend;
use crate::sync::ObjectKind;

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("Database URL is not set; provide --database-url or SQLSYNC_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Unsupported database backend for URL scheme '{scheme}'")]
    UnsupportedBackend { scheme: String },

    #[error("{backend} has no catalog for {kind} objects")]
    UnsupportedObjectKind { backend: Backend, kind: ObjectKind },

    #[error("Resource directory not found: {0}")]
    MissingResourceDir(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
