//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Retrieval layer error
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] confnote_retrieval::RetrievalError),

    /// Worker layer error
    #[error("Worker error: {0}")]
    Worker(#[from] confnote_worker::WorkerError),

    /// Ledger store error
    #[error("Ledger error: {0}")]
    Store(#[from] confnote_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
