use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use uuid::Uuid;

use super::object::ObjectKind;
use crate::error::SyncError;

/// Counters for one sync run, or the sum of several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub created: u32,
    pub altered: u32,
    pub dropped: u32,
    pub errors: u32,
}

impl SyncResult {
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Objects whose DDL was executed successfully.
    pub fn applied(&self) -> u32 {
        self.created + self.altered
    }

    /// Turns a result with errors into `SyncError::Incomplete`.
    pub fn ensure_clean(self) -> Result<Self, SyncError> {
        if self.has_errors() {
            return Err(SyncError::Incomplete {
                errors: self.errors,
            });
        }
        Ok(self)
    }
}

impl AddAssign for SyncResult {
    fn add_assign(&mut self, other: Self) {
        self.created += other.created;
        self.altered += other.altered;
        self.dropped += other.dropped;
        self.errors += other.errors;
    }
}

impl Add for SyncResult {
    type Output = SyncResult;

    fn add(mut self, other: Self) -> Self::Output {
        self += other;
        self
    }
}

impl Sum for SyncResult {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(SyncResult::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindResult {
    pub kind: ObjectKind,
    #[serde(flatten)]
    pub result: SyncResult,
}

/// Outcome of a full run: one entry per synchronized kind plus the combined total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub kinds: Vec<KindResult>,
    pub total: SyncResult,
}

impl SyncReport {
    pub(crate) fn begin() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            kinds: Vec::new(),
            total: SyncResult::default(),
        }
    }

    pub(crate) fn record(&mut self, kind: ObjectKind, result: SyncResult) {
        self.kinds.push(KindResult { kind, result });
        self.total += result;
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Result for one kind; `None` when the kind was not part of the run.
    pub fn kind(&self, kind: ObjectKind) -> Option<SyncResult> {
        self.kinds.iter().find(|k| k.kind == kind).map(|k| k.result)
    }
}
