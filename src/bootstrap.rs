//! One-time database preparation at application startup.

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::db::DbPool;
use crate::error::SyncError;
use crate::resources::ResourceBundle;
use crate::sync::{CancelSignal, ObjectKind, SyncReport, SyncService};

/// Creates the demo tables and synchronizes every bundled object, once per initializer.
///
/// A failed attempt leaves the initializer uninitialized, so the next call retries.
pub struct DatabaseInitializer {
    pool: DbPool,
    bundle: ResourceBundle,
    service: SyncService,
    kinds: Vec<ObjectKind>,
    initialized: Mutex<bool>,
}

impl DatabaseInitializer {
    pub fn new(pool: DbPool, bundle: ResourceBundle, service: SyncService) -> Self {
        Self {
            pool,
            bundle,
            service,
            kinds: ObjectKind::ALL.to_vec(),
            initialized: Mutex::new(false),
        }
    }

    #[must_use]
    pub fn with_kinds(mut self, kinds: Vec<ObjectKind>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub async fn is_initialized(&self) -> bool {
        *self.initialized.lock().await
    }

    /// Returns the report of the run that initialized the database, or `None` when an earlier
    /// call already did.
    pub async fn ensure_initialized(
        &self,
        cancel: &CancelSignal,
    ) -> Result<Option<SyncReport>, SyncError> {
        let mut initialized = self.initialized.lock().await;
        if *initialized {
            debug!("Database already initialized");
            return Ok(None);
        }

        self.pool.apply_bootstrap_schema().await?;
        let report = self
            .service
            .sync_pool(&self.pool, &self.bundle, &self.kinds, cancel)
            .await?;
        report.total.ensure_clean()?;

        *initialized = true;
        info!(run_id = %report.run_id, "Database initialized");
        Ok(Some(report))
    }
}
