//! Error types for the worker crate

use confnote_domain::EntryId;
use thiserror::Error;

/// Errors that can occur while reconciling or driving the pipeline.
///
/// Per-entry extraction failures are not errors: they are classified
/// outcomes recorded in the ledger. Only infrastructure problems (the store
/// itself failing) surface here and abort the run.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Ledger store error
    #[error("Ledger store error: {0}")]
    Store(String),

    /// Entry referenced by an outcome does not exist
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
