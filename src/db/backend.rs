use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog;
use super::schema::{POSTGRES_INIT, SQLITE_INIT};
use crate::error::ConfigError;
use crate::sync::{ObjectKind, ObjectName};

/// Database engines the synchronizer can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    /// Picks the backend from the URL scheme. Anything unknown is a configuration error, raised
    /// before a connection is attempted.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let scheme = url
            .split_once(':')
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default();

        match scheme.as_str() {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            _ => Err(ConfigError::UnsupportedBackend { scheme }),
        }
    }

    /// Schema the catalog reports for objects created without one.
    pub fn default_schema(self) -> &'static str {
        match self {
            Backend::Postgres => "public",
            Backend::Sqlite => "main",
        }
    }

    pub fn supports(self, kind: ObjectKind) -> bool {
        self.catalog_query(kind).is_some()
    }

    pub fn check_supported(self, kind: ObjectKind) -> Result<(), ConfigError> {
        if self.supports(kind) {
            Ok(())
        } else {
            Err(ConfigError::UnsupportedObjectKind {
                backend: self,
                kind,
            })
        }
    }

    /// Query returning `(schema_name, object_name)` for user-defined objects of `kind`.
    pub fn catalog_query(self, kind: ObjectKind) -> Option<&'static str> {
        match (self, kind) {
            (Backend::Postgres, ObjectKind::Procedure) => Some(catalog::PG_PROCEDURES),
            (Backend::Postgres, ObjectKind::Function) => Some(catalog::PG_FUNCTIONS),
            (Backend::Postgres, ObjectKind::View) => Some(catalog::PG_VIEWS),
            (Backend::Sqlite, ObjectKind::View) => Some(catalog::SQLITE_VIEWS),
            (Backend::Sqlite, ObjectKind::Procedure | ObjectKind::Function) => None,
        }
    }

    pub fn drop_statement(self, kind: ObjectKind, name: &ObjectName) -> String {
        format!(
            "DROP {} IF EXISTS {}.{}",
            kind.drop_keyword(),
            quote_ident(&name.schema),
            quote_ident(&name.name)
        )
    }

    /// Table DDL the bundled objects are written against.
    pub fn bootstrap_ddl(self) -> &'static str {
        match self {
            Backend::Postgres => POSTGRES_INIT,
            Backend::Sqlite => SQLITE_INIT,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Postgres => f.write_str("PostgreSQL"),
            Backend::Sqlite => f.write_str("SQLite"),
        }
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
