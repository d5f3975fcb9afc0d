use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

use super::backend::Backend;
use super::backends::{PgObjectStore, SqliteObjectStore};
use super::store::ObjectStore;
use crate::error::SyncError;

/// Connection pool for whichever backend the database URL names.
#[derive(Debug, Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    /// Detects the backend and connects. Unsupported URLs fail before any connection attempt.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, SyncError> {
        let backend = Backend::from_url(database_url)?;
        let max_connections = max_connections.max(1);

        let pool = match backend {
            Backend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(Duration::from_secs(10))
                    .connect(database_url)
                    .await?;
                DbPool::Postgres(pool)
            }
            Backend::Sqlite => {
                let connect_opts = SqliteConnectOptions::from_str(database_url)?
                    .create_if_missing(true)
                    .busy_timeout(Duration::from_secs(5))
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal);

                let pool = SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .connect_with(connect_opts)
                    .await?;
                DbPool::Sqlite(pool)
            }
        };

        info!(backend = %backend, max_connections, "Database pool connected");
        Ok(pool)
    }

    pub fn backend(&self) -> Backend {
        match self {
            DbPool::Postgres(_) => Backend::Postgres,
            DbPool::Sqlite(_) => Backend::Sqlite,
        }
    }

    /// Acquires a connection and wraps it in the backend's object store. The connection returns
    /// to the pool when the store is dropped.
    pub async fn object_store(
        &self,
        default_schema: Option<&str>,
    ) -> Result<Box<dyn ObjectStore>, SyncError> {
        let store: Box<dyn ObjectStore> = match (self, default_schema) {
            (DbPool::Postgres(pool), None) => Box::new(PgObjectStore::acquire(pool).await?),
            (DbPool::Postgres(pool), Some(schema)) => {
                Box::new(PgObjectStore::acquire(pool).await?.with_default_schema(schema))
            }
            (DbPool::Sqlite(pool), None) => Box::new(SqliteObjectStore::acquire(pool).await?),
            (DbPool::Sqlite(pool), Some(schema)) => {
                Box::new(SqliteObjectStore::acquire(pool).await?.with_default_schema(schema))
            }
        };
        Ok(store)
    }

    /// Creates the demo tables if they do not exist yet.
    pub async fn apply_bootstrap_schema(&self) -> Result<(), SyncError> {
        let ddl = self.backend().bootstrap_ddl();
        for stmt in ddl.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            match self {
                DbPool::Postgres(pool) => {
                    sqlx::query(s).execute(pool).await?;
                }
                DbPool::Sqlite(pool) => {
                    sqlx::query(s).execute(pool).await?;
                }
            }
        }
        debug!(backend = %self.backend(), "Bootstrap schema applied");
        Ok(())
    }

    pub async fn close(&self) {
        match self {
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }
}
