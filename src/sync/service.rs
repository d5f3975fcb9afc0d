use std::collections::HashSet;
use tracing::{debug, error, info, warn};

use super::cancel::CancelSignal;
use super::object::{ObjectKind, ObjectName};
use super::parser::{NameError, NameExtractor, name_from_resource, split_batches};
use super::result::{SyncReport, SyncResult};
use crate::config::{Config, NamespaceConfig};
use crate::db::{DbPool, ObjectStore};
use crate::error::SyncError;
use crate::resources::{ResourceBundle, SqlResource};
use crate::utils::logging::with_pretty_json_debug;

/// Knobs for a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Overrides the store's default schema for unqualified names.
    pub default_schema: Option<String>,
    pub namespaces: NamespaceConfig,
}

impl From<&Config> for SyncOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            default_schema: cfg.default_schema.clone(),
            namespaces: cfg.namespaces.clone(),
        }
    }
}

/// What the apply phase does with one resource.
enum Planned<'a> {
    Apply {
        resource: &'a SqlResource,
        sql: &'a str,
        target: ObjectName,
    },
    Skip,
    Unparseable {
        resource: &'a SqlResource,
        reason: NameError,
    },
}

/// Reconciles bundled SQL objects with a database catalog.
///
/// Each kind runs in two phases on one connection: objects missing from the bundle are dropped,
/// then every bundled resource is executed. Failures of single objects are counted and logged;
/// only configuration problems, catalog failures and cancellation end a run early.
#[derive(Debug, Clone, Default)]
pub struct SyncService {
    options: SyncOptions,
}

impl SyncService {
    pub fn new(options: SyncOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Acquires one connection from `pool` and synchronizes `kinds` in order.
    pub async fn sync_pool(
        &self,
        pool: &DbPool,
        bundle: &ResourceBundle,
        kinds: &[ObjectKind],
        cancel: &CancelSignal,
    ) -> Result<SyncReport, SyncError> {
        let mut store = pool
            .object_store(self.options.default_schema.as_deref())
            .await?;
        self.sync_kinds(store.as_mut(), bundle, kinds, cancel).await
    }

    /// Procedures, functions and views, in that order.
    pub async fn sync_all<S>(
        &self,
        store: &mut S,
        bundle: &ResourceBundle,
        cancel: &CancelSignal,
    ) -> Result<SyncReport, SyncError>
    where
        S: ObjectStore + ?Sized,
    {
        self.sync_kinds(store, bundle, &ObjectKind::ALL, cancel).await
    }

    /// Runs each kind and sums the results.
    ///
    /// Kinds the store has no catalog for are skipped when the bundle has nothing for them, and
    /// rejected before any statement runs when it does.
    pub async fn sync_kinds<S>(
        &self,
        store: &mut S,
        bundle: &ResourceBundle,
        kinds: &[ObjectKind],
        cancel: &CancelSignal,
    ) -> Result<SyncReport, SyncError>
    where
        S: ObjectStore + ?Sized,
    {
        let mut planned = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            match store.check_supported(kind) {
                Ok(()) => planned.push(kind),
                Err(_) if self.resources_for(bundle, kind).is_empty() => {
                    debug!(kind = %kind, "Skipping object kind without catalog support");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let mut report = SyncReport::begin();
        info!(
            run_id = %report.run_id,
            resources = bundle.len(),
            "Starting database object synchronization"
        );

        for kind in planned {
            let result = self.sync_kind(store, bundle, kind, cancel).await?;
            report.record(kind, result);
        }

        let report = report.finish();
        info!(
            run_id = %report.run_id,
            created = report.total.created,
            altered = report.total.altered,
            dropped = report.total.dropped,
            errors = report.total.errors,
            "Database object synchronization completed"
        );
        with_pretty_json_debug(&report, |json| debug!("Sync report:\n{json}"));

        Ok(report)
    }

    pub async fn sync_procedures<S>(
        &self,
        store: &mut S,
        bundle: &ResourceBundle,
        cancel: &CancelSignal,
    ) -> Result<SyncResult, SyncError>
    where
        S: ObjectStore + ?Sized,
    {
        self.sync_kind(store, bundle, ObjectKind::Procedure, cancel)
            .await
    }

    pub async fn sync_functions<S>(
        &self,
        store: &mut S,
        bundle: &ResourceBundle,
        cancel: &CancelSignal,
    ) -> Result<SyncResult, SyncError>
    where
        S: ObjectStore + ?Sized,
    {
        self.sync_kind(store, bundle, ObjectKind::Function, cancel)
            .await
    }

    pub async fn sync_views<S>(
        &self,
        store: &mut S,
        bundle: &ResourceBundle,
        cancel: &CancelSignal,
    ) -> Result<SyncResult, SyncError>
    where
        S: ObjectStore + ?Sized,
    {
        self.sync_kind(store, bundle, ObjectKind::View, cancel).await
    }

    /// One sync run for one kind: drop what the bundle no longer has, then apply every resource.
    pub async fn sync_kind<S>(
        &self,
        store: &mut S,
        bundle: &ResourceBundle,
        kind: ObjectKind,
        cancel: &CancelSignal,
    ) -> Result<SyncResult, SyncError>
    where
        S: ObjectStore + ?Sized,
    {
        store.check_supported(kind)?;

        let namespace = self.options.namespaces.for_kind(kind);
        let default_schema = self
            .options
            .default_schema
            .clone()
            .unwrap_or_else(|| store.default_schema().to_string());
        let resources = self.resources_for(bundle, kind);

        info!(
            kind = %kind,
            namespace,
            resources = resources.len(),
            "Starting {} synchronization",
            kind.plural_name()
        );

        let plan = plan_resources(&resources, kind, namespace, &default_schema);
        let wanted: HashSet<String> = plan
            .iter()
            .filter_map(|(_, target)| target.as_ref().map(ObjectName::key))
            .collect();

        let existing = store.list_objects(kind).await?;
        let existing_keys: HashSet<String> = existing.iter().map(ObjectName::key).collect();

        let mut result = SyncResult::default();

        for name in existing.iter().filter(|n| !wanted.contains(&n.key())) {
            check_cancelled(cancel, kind, &result)?;
            match store.drop_object(kind, name).await {
                Ok(()) => {
                    result.dropped += 1;
                    info!(kind = %kind, object = %name, "Dropped {kind}: {name}");
                }
                Err(e) => {
                    result.errors += 1;
                    error!(kind = %kind, object = %name, error = %e, "Error dropping {kind}: {name}");
                }
            }
        }

        for (step, _) in plan {
            check_cancelled(cancel, kind, &result)?;
            match step {
                Planned::Skip => {}
                Planned::Unparseable { resource, reason } => {
                    result.errors += 1;
                    warn!(
                        kind = %kind,
                        resource = %resource.name,
                        reason = %reason,
                        "Could not extract {kind} name from resource"
                    );
                }
                Planned::Apply {
                    resource,
                    sql,
                    target,
                } => match execute_batches(store, sql, cancel).await {
                    Ok(()) if existing_keys.contains(&target.key()) => {
                        result.altered += 1;
                        info!(kind = %kind, object = %target, resource = %resource.name, "Altered {kind}: {target}");
                    }
                    Ok(()) => {
                        result.created += 1;
                        info!(kind = %kind, object = %target, resource = %resource.name, "Created {kind}: {target}");
                    }
                    Err(SyncError::Cancelled) => {
                        warn_cancelled(kind, &result);
                        return Err(SyncError::Cancelled);
                    }
                    Err(e) => {
                        result.errors += 1;
                        error!(
                            kind = %kind,
                            object = %target,
                            resource = %resource.name,
                            error = %e,
                            "Error executing SQL resource"
                        );
                    }
                },
            }
        }

        info!(
            kind = %kind,
            created = result.created,
            altered = result.altered,
            dropped = result.dropped,
            errors = result.errors,
            "{} synchronization completed",
            capitalize(kind.plural_name())
        );

        Ok(result)
    }

    fn resources_for<'b>(&self, bundle: &'b ResourceBundle, kind: ObjectKind) -> Vec<&'b SqlResource> {
        bundle.resources_for(self.options.namespaces.for_kind(kind))
    }
}

/// Resolves every resource's target before anything runs. The second element is the name that
/// protects an existing object from the drop phase; resources that are skipped or unparseable
/// fall back to their resource name for it.
fn plan_resources<'a>(
    resources: &[&'a SqlResource],
    kind: ObjectKind,
    namespace: &str,
    default_schema: &str,
) -> Vec<(Planned<'a>, Option<ObjectName>)> {
    let extractor = NameExtractor::for_kind(kind);

    resources
        .iter()
        .map(|&resource| {
            let Some(sql) = resource.sql() else {
                if resource.body.is_none() {
                    warn!(kind = %kind, resource = %resource.name, "Could not read SQL resource, skipping");
                } else {
                    warn!(kind = %kind, resource = %resource.name, "SQL resource is empty, skipping");
                }
                let keep = name_from_resource(&resource.name, namespace, default_schema);
                return (Planned::Skip, keep);
            };

            match extractor.extract(&resource.name, sql, namespace, default_schema) {
                Ok(target) => {
                    let keep = Some(target.clone());
                    (
                        Planned::Apply {
                            resource,
                            sql,
                            target,
                        },
                        keep,
                    )
                }
                Err(reason) => {
                    let keep = name_from_resource(&resource.name, namespace, default_schema);
                    (Planned::Unparseable { resource, reason }, keep)
                }
            }
        })
        .collect()
}

async fn execute_batches<S>(store: &mut S, sql: &str, cancel: &CancelSignal) -> Result<(), SyncError>
where
    S: ObjectStore + ?Sized,
{
    for (i, batch) in split_batches(sql).into_iter().enumerate() {
        if i > 0 {
            cancel.check()?;
        }
        let affected = store.execute(batch).await?;
        debug!(batch = i, affected, "Executed SQL batch");
    }
    Ok(())
}

fn check_cancelled(
    cancel: &CancelSignal,
    kind: ObjectKind,
    result: &SyncResult,
) -> Result<(), SyncError> {
    cancel.check().inspect_err(|_| warn_cancelled(kind, result))
}

fn warn_cancelled(kind: ObjectKind, result: &SyncResult) {
    warn!(
        kind = %kind,
        created = result.created,
        altered = result.altered,
        dropped = result.dropped,
        errors = result.errors,
        "{} synchronization cancelled",
        capitalize(kind.plural_name())
    );
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
