#![allow(dead_code)]

use async_trait::async_trait;
use sqlsync::sync::{CancelHandle, NameExtractor};
use sqlsync::{ConfigError, DbPool, ObjectKind, ObjectName, ObjectStore, SyncError};
use std::collections::{BTreeMap, HashSet};

/// In-memory catalog that records every statement it is given.
///
/// Executing a batch with a `CREATE`/`ALTER` header registers the object, so repeated runs see
/// the result of earlier ones.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: BTreeMap<ObjectKind, Vec<ObjectName>>,
    pub executed: Vec<String>,
    pub dropped: Vec<(ObjectKind, ObjectName)>,
    pub list_calls: Vec<ObjectKind>,
    supported: Option<Vec<ObjectKind>>,
    failing_drops: HashSet<String>,
    failing_batches: Vec<String>,
    cancel_after: Option<(usize, CancelHandle)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(mut self, kind: ObjectKind, names: &[&str]) -> Self {
        let entry = self.objects.entry(kind).or_default();
        for qualified in names {
            entry.push(ObjectName::parse(qualified, "dbo").expect("valid object name"));
        }
        self
    }

    /// Only `kinds` have a catalog; the rest fail `check_supported`.
    pub fn supporting(mut self, kinds: &[ObjectKind]) -> Self {
        self.supported = Some(kinds.to_vec());
        self
    }

    pub fn failing_drop(mut self, qualified: &str) -> Self {
        self.failing_drops.insert(qualified.to_lowercase());
        self
    }

    /// Batches containing `fragment` fail to execute.
    pub fn failing_batch(mut self, fragment: &str) -> Self {
        self.failing_batches.push(fragment.to_string());
        self
    }

    /// Fires `handle` once `count` batches have executed.
    pub fn cancel_after(mut self, count: usize, handle: CancelHandle) -> Self {
        self.cancel_after = Some((count, handle));
        self
    }

    pub fn names(&self, kind: ObjectKind) -> Vec<String> {
        let mut names: Vec<String> = self
            .objects
            .get(&kind)
            .map(|v| v.iter().map(ToString::to_string).collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn register(&mut self, batch: &str) {
        for kind in ObjectKind::ALL {
            if let Ok(name) = NameExtractor::for_kind(kind).extract("", batch, "", "dbo") {
                let entry = self.objects.entry(kind).or_default();
                if !entry.contains(&name) {
                    entry.push(name);
                }
                return;
            }
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn check_supported(&self, kind: ObjectKind) -> Result<(), ConfigError> {
        match &self.supported {
            Some(kinds) if !kinds.contains(&kind) => Err(ConfigError::UnsupportedObjectKind {
                backend: sqlsync::Backend::Sqlite,
                kind,
            }),
            _ => Ok(()),
        }
    }

    async fn list_objects(&mut self, kind: ObjectKind) -> Result<Vec<ObjectName>, SyncError> {
        self.list_calls.push(kind);
        Ok(self.objects.get(&kind).cloned().unwrap_or_default())
    }

    async fn drop_object(&mut self, kind: ObjectKind, name: &ObjectName) -> Result<(), SyncError> {
        if self.failing_drops.contains(&name.key()) {
            return Err(SyncError::IoError(std::io::Error::other(format!("cannot drop {name}"))));
        }
        if let Some(objects) = self.objects.get_mut(&kind) {
            objects.retain(|n| n != name);
        }
        self.dropped.push((kind, name.clone()));
        Ok(())
    }

    async fn execute(&mut self, sql: &str) -> Result<u64, SyncError> {
        if self.failing_batches.iter().any(|f| sql.contains(f.as_str())) {
            return Err(SyncError::IoError(std::io::Error::other(format!("batch failed: {sql}"))));
        }
        self.executed.push(sql.to_string());
        self.register(sql);
        if let Some((count, handle)) = &self.cancel_after {
            if self.executed.len() >= *count {
                handle.cancel();
            }
        }
        Ok(0)
    }
}

/// File-backed SQLite pool in a fresh temp dir. Keep the returned dir alive for the test.
pub async fn sqlite_pool() -> (tempfile::TempDir, DbPool) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("sync.sqlite");
    let url = format!("sqlite://{}", path.display());
    let pool = DbPool::connect(&url, 2).await.expect("sqlite pool connects");
    (dir, pool)
}
