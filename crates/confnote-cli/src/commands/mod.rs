//! Command implementations and collaborator wiring.
//!
//! Collaborators are constructed here, once per command invocation, and
//! passed into the pipeline as explicit handles.

pub mod extract;
pub mod retrieve;
pub mod run;
pub mod status;

pub use extract::execute_extract;
pub use retrieve::execute_retrieve;
pub use run::execute_run;
pub use status::execute_status;

use crate::config::Config;
use crate::error::{CliError, Result};
use confnote_oracle::OllamaOracle;
use confnote_render::{PopplerRenderer, TesseractRecognizer};
use confnote_retrieval::{DirMailbox, RetrievalCoordinator};
use confnote_store::SqliteLedger;
use confnote_worker::ExtractionWorker;
use std::sync::{Arc, Mutex};

pub(crate) fn open_ledger(config: &Config) -> Result<Arc<Mutex<SqliteLedger>>> {
    Ok(Arc::new(Mutex::new(SqliteLedger::open(&config.ledger_path)?)))
}

pub(crate) fn build_coordinator(
    config: &Config,
    store: Arc<Mutex<SqliteLedger>>,
) -> Result<RetrievalCoordinator<DirMailbox, SqliteLedger>> {
    if config.source_email.trim().is_empty() {
        return Err(CliError::Config(
            "source_email is not configured; set it in the config file".to_string(),
        ));
    }
    Ok(RetrievalCoordinator::new(
        DirMailbox::new(&config.mail_dir),
        store,
        &config.download_dir,
        config.source_email.clone(),
    ))
}

pub(crate) fn build_worker(
    config: &Config,
) -> ExtractionWorker<PopplerRenderer, TesseractRecognizer, OllamaOracle> {
    ExtractionWorker::new(
        PopplerRenderer::new(config.render_dpi),
        TesseractRecognizer::new(config.ocr_languages.clone()),
        OllamaOracle::new(config.oracle.endpoint.clone(), config.oracle.model.clone()),
        config.worker_config(),
    )
}
