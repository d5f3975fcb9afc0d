use thiserror::Error as ThisError;

use super::config::ConfigError;

#[derive(Debug, ThisError)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Sync finished with {errors} error(s)")]
    Incomplete { errors: u32 },

    #[error("Sync cancelled")]
    Cancelled,

    #[error("Ractor error: {0}")]
    RactorError(String),
}

impl SyncError {
    /// True for the configuration class of errors, raised before any statement is issued.
    pub fn is_config(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }
}
