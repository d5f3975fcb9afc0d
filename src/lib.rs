pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod resources;
pub mod sync;
pub mod utils;

pub use bootstrap::DatabaseInitializer;
pub use config::Config;
pub use db::{Backend, DbPool, ObjectStore};
pub use error::{ConfigError, SyncError};
pub use resources::{ResourceBundle, SqlResource};
pub use sync::{
    CancelSignal, ObjectKind, ObjectName, SyncOptions, SyncReport, SyncResult, SyncService,
};
