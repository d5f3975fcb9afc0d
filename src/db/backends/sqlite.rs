use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::db::backend::Backend;
use crate::db::models::CatalogRow;
use crate::db::scope::ConnectionScope;
use crate::db::store::ObjectStore;
use crate::error::{ConfigError, SyncError};
use crate::sync::{ObjectKind, ObjectName};

pub struct SqliteObjectStore<'c> {
    conn: ConnectionScope<'c, Sqlite>,
    default_schema: String,
}

impl<'c> SqliteObjectStore<'c> {
    /// Runs on a connection the caller keeps ownership of.
    pub fn borrowed(conn: &'c mut SqliteConnection) -> Self {
        Self::with_scope(ConnectionScope::Borrowed(conn))
    }

    fn with_scope(conn: ConnectionScope<'c, Sqlite>) -> Self {
        Self {
            conn,
            default_schema: Backend::Sqlite.default_schema().to_string(),
        }
    }

    /// Overrides the schema assumed for unqualified names.
    #[must_use]
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }
}

impl SqliteObjectStore<'static> {
    /// Takes a connection from `pool` for the lifetime of the store.
    pub async fn acquire(pool: &SqlitePool) -> Result<Self, SyncError> {
        let scope = ConnectionScope::acquire(pool).await?;
        debug!("Acquired SQLite connection for sync");
        Ok(Self::with_scope(scope))
    }
}

#[async_trait]
impl ObjectStore for SqliteObjectStore<'_> {
    fn default_schema(&self) -> &str {
        &self.default_schema
    }

    fn check_supported(&self, kind: ObjectKind) -> Result<(), ConfigError> {
        Backend::Sqlite.check_supported(kind)
    }

    async fn list_objects(&mut self, kind: ObjectKind) -> Result<Vec<ObjectName>, SyncError> {
        let query = Backend::Sqlite.catalog_query(kind).ok_or(
            ConfigError::UnsupportedObjectKind {
                backend: Backend::Sqlite,
                kind,
            },
        )?;

        let rows = sqlx::query_as::<_, CatalogRow>(query)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows.into_iter().map(ObjectName::from).collect())
    }

    async fn drop_object(&mut self, kind: ObjectKind, name: &ObjectName) -> Result<(), SyncError> {
        let sql = Backend::Sqlite.drop_statement(kind, name);
        sqlx::Executor::execute(&mut *self.conn, sqlx::raw_sql(&sql)).await?;
        Ok(())
    }

    async fn execute(&mut self, sql: &str) -> Result<u64, SyncError> {
        let res = sqlx::Executor::execute(&mut *self.conn, sqlx::raw_sql(sql)).await?;
        Ok(res.rows_affected())
    }
}
