use async_trait::async_trait;

use crate::error::{ConfigError, SyncError};
use crate::sync::{DEFAULT_SCHEMA, ObjectKind, ObjectName};

/// What the synchronizer needs from a database: a catalog listing per kind, a way to drop one
/// object and a way to run one batch of DDL.
#[async_trait]
pub trait ObjectStore: Send {
    /// Schema for names that do not spell one out.
    fn default_schema(&self) -> &str {
        DEFAULT_SCHEMA
    }

    /// Fails when this store has no catalog for `kind`.
    fn check_supported(&self, _kind: ObjectKind) -> Result<(), ConfigError> {
        Ok(())
    }

    /// User-defined objects of `kind` currently in the database.
    async fn list_objects(&mut self, kind: ObjectKind) -> Result<Vec<ObjectName>, SyncError>;

    async fn drop_object(&mut self, kind: ObjectKind, name: &ObjectName) -> Result<(), SyncError>;

    /// Runs one batch and returns the rows affected.
    async fn execute(&mut self, sql: &str) -> Result<u64, SyncError>;
}
