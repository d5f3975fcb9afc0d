mod config;
mod sync;

pub use config::ConfigError;
pub use sync::SyncError;
