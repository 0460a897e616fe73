//! The run command: retrieval then extraction.

use super::{build_coordinator, build_worker, open_ledger};
use crate::config::Config;
use crate::error::Result;
use confnote_retrieval::{load_input_records, LookupTable};
use confnote_worker::{run_extraction, run_retrieval, Reconciler, Reprocess, RunSummary};
use std::sync::Arc;

/// Run both phases over the configured input and return the merged summary.
pub async fn execute_run(config: &Config) -> Result<RunSummary> {
    let table = LookupTable::load(&config.lookup_path)?;
    let records = load_input_records(&config.input_path)?;

    let store = open_ledger(config)?;
    let coordinator = build_coordinator(config, Arc::clone(&store))?;

    let mut summary = run_retrieval(&records, &table, &coordinator);

    let worker = build_worker(config);
    let reconciler = Reconciler::new(store);
    summary.merge(&run_extraction(&worker, &reconciler, Reprocess::None).await?);

    Ok(summary)
}
