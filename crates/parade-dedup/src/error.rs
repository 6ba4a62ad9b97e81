//! Error types for parade-dedup

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, DedupError>;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum DedupError {
    /// Store-level failures
    #[error("Store error: {0}")]
    Store(#[from] parade_store::StoreError),

    /// Configuration rejected by validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report or config file IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
