//! Confnote Worker
//!
//! The back half of the pipeline: per-entry extraction and ledger
//! reconciliation.
//!
//! # Overview
//!
//! The [`ExtractionWorker`] takes one ledger entry and drives the three
//! external collaborators in strict sequence:
//!
//! ```text
//! PENDING --(render)--> RENDERED --(recognize)--> RECOGNIZED --(infer+parse)--> SUCCESS
//!      \                       \                          \
//!       decryption_error        recognition_error          extraction_parse_error /
//!                                                          extraction_timeout
//! ```
//!
//! The worker returns a value and never touches the ledger; the
//! [`Reconciler`] performs the single terminal write per entry and enforces
//! idempotent re-runs. The [`runner`] module drives both phases sequentially
//! and accumulates a [`RunSummary`].
//!
//! # Example Usage
//!
//! ```no_run
//! use confnote_worker::{ExtractionWorker, Reconciler, Reprocess, WorkerConfig};
//! use confnote_oracle::MockOracle;
//! use confnote_render::{MockRecognizer, MockRenderer};
//! use confnote_store::SqliteLedger;
//! use std::sync::{Arc, Mutex};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(Mutex::new(SqliteLedger::open("confnote.db")?));
//!
//! let worker = ExtractionWorker::new(
//!     MockRenderer::unprotected(vec![vec![0u8]]),
//!     MockRecognizer::new("CONFIRMATION NOTE ..."),
//!     MockOracle::new(r#"{"is_cn": "true", "currency": "USD"}"#),
//!     WorkerConfig::default(),
//! );
//! let reconciler = Reconciler::new(Arc::clone(&store));
//!
//! let summary = confnote_worker::run_extraction(&worker, &reconciler, Reprocess::None).await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod parser;
mod prompt;
mod reconciler;
mod runner;
mod worker;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use parser::parse_oracle_response;
pub use prompt::PromptBuilder;
pub use reconciler::{Applied, Reconciler, Reprocess};
pub use runner::{run_extraction, run_retrieval, RunSummary};
pub use worker::ExtractionWorker;
