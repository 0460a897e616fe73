//! Confnote Retrieval Layer
//!
//! The front half of the pipeline: reference data, row resolution, and
//! artifact retrieval.
//!
//! # Components
//!
//! - [`LookupTable`]: keyed reference data (fund-house key → search term +
//!   credential list), loaded once per run, read-only afterwards
//! - [`RowResolver`]: maps one input record through the table to a
//!   [`confnote_domain::ResolvedRow`], or a typed skip reason
//! - [`DirMailbox`] / [`MockMailbox`]: mail-source implementations
//! - [`RetrievalCoordinator`]: drives a mail search for one resolved row,
//!   persists matching attachments, and appends one PENDING ledger entry
//!   per artifact
//!
//! Retrieval and extraction are deliberately decoupled: the coordinator only
//! creates ledger entries; how each artifact is later processed is the
//! worker's business. A failure in one phase never corrupts the other.

#![warn(missing_docs)]

pub mod coordinator;
pub mod input;
pub mod lookup;
pub mod mailbox;
pub mod resolver;

pub use coordinator::RetrievalCoordinator;
pub use input::load_input_records;
pub use lookup::LookupTable;
pub use mailbox::{DirMailbox, MailError, MockMailbox, MockMessage};
pub use resolver::RowResolver;

use thiserror::Error;

/// Errors from the retrieval layer.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Mail source failure (connectivity, permission). Aborts retrieval for
    /// the current row only.
    #[error("Mail source error: {0}")]
    Mail(String),

    /// Ledger store failure while appending entries.
    #[error("Ledger store error: {0}")]
    Store(String),

    /// I/O failure while persisting artifacts or reading reference data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed reference or input data file.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reference data violates an invariant (duplicate keys, oversized
    /// credential lists).
    #[error("Invalid reference data: {0}")]
    InvalidData(String),
}
