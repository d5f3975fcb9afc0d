//! Reconciliation of bundled SQL objects with a live catalog.
//!
//! - `object.rs`: object kinds and schema-qualified names
//! - `parser.rs`: target-name extraction and `GO` batch splitting
//! - `service.rs`: drop/apply phases per kind
//! - `actor.rs`: serialized access to the service from concurrent callers

pub mod actor;
pub mod cancel;
pub mod object;
pub mod parser;
pub mod result;
pub mod service;

pub use actor::{SyncActorHandle, spawn};
pub use cancel::{CancelHandle, CancelSignal, cancel_pair};
pub use object::{DEFAULT_SCHEMA, ObjectKind, ObjectName};
pub use parser::{NameError, NameExtractor};
pub use result::{KindResult, SyncReport, SyncResult};
pub use service::{SyncOptions, SyncService};
