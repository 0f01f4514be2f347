//! Domain error types

use thiserror::Error;

/// Errors raised while building or reconfiguring a sync stage
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
