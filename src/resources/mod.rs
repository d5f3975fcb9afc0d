//! Named SQL resources and the bundles that register them.
//!
//! Resource names follow the embedded-resource convention: a namespace per object kind, then the
//! schema-qualified object name, then `.sql` (e.g. `Views.dbo.ActiveUsers.sql`).

pub mod embedded;

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ConfigError, SyncError};
use crate::sync::parser::{strip_prefix_ignore_case, strip_suffix_ignore_case};

/// One named blob of DDL. `body` is `None` when the resource is registered but unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlResource {
    pub name: String,
    pub body: Option<Cow<'static, str>>,
}

impl SqlResource {
    pub fn new(name: impl Into<String>, body: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            body: Some(body.into()),
        }
    }

    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: None,
        }
    }

    /// Body text, or `None` when it is missing or whitespace-only.
    pub fn sql(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.trim().is_empty())
    }

    /// Case-insensitive `<namespace>.<...>.sql` match.
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        strip_prefix_ignore_case(&self.name, namespace)
            .is_some_and(|rest| rest.starts_with('.'))
            && strip_suffix_ignore_case(&self.name, ".sql").is_some()
    }
}

/// Explicit, ordered registry of resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceBundle {
    resources: Vec<SqlResource>,
}

impl ResourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, body: impl Into<Cow<'static, str>>) -> Self {
        self.push(SqlResource::new(name, body));
        self
    }

    pub fn push(&mut self, resource: SqlResource) {
        self.resources.push(resource);
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SqlResource> {
        self.resources.iter()
    }

    pub fn get(&self, name: &str) -> Option<&SqlResource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Resources under `namespace`, ordered by name.
    pub fn resources_for(&self, namespace: &str) -> Vec<&SqlResource> {
        let mut matched: Vec<&SqlResource> = self
            .resources
            .iter()
            .filter(|r| r.is_in_namespace(namespace))
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        matched
    }

    /// Loads every file under `root`. A file at `Views/dbo.ActiveUsers.sql` is registered as
    /// `Views.dbo.ActiveUsers.sql`. Files that cannot be read as UTF-8 are registered without a
    /// body.
    pub async fn from_dir(root: impl AsRef<Path>) -> Result<Self, SyncError> {
        let root = root.as_ref();
        if !tokio::fs::metadata(root).await.is_ok_and(|m| m.is_dir()) {
            return Err(ConfigError::MissingResourceDir(root.display().to_string()).into());
        }

        let mut bundle = Self::new();
        let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }

                let Some(name) = resource_name(root, &path) else {
                    warn!(path = %path.display(), "Skipping file with a non UTF-8 path");
                    continue;
                };

                match tokio::fs::read_to_string(&path).await {
                    Ok(body) => bundle.push(SqlResource::new(name, body)),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Could not read SQL resource");
                        bundle.push(SqlResource::missing(name));
                    }
                }
            }
        }

        debug!(root = %root.display(), count = bundle.len(), "Loaded SQL resources from directory");
        Ok(bundle)
    }
}

impl FromIterator<SqlResource> for ResourceBundle {
    fn from_iter<T: IntoIterator<Item = SqlResource>>(iter: T) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

fn resource_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("."))
}
