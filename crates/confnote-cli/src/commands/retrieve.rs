//! The retrieve command: phase 1 only.

use super::{build_coordinator, open_ledger};
use crate::config::Config;
use crate::error::Result;
use confnote_retrieval::{load_input_records, LookupTable};
use confnote_worker::{run_retrieval, RunSummary};

/// Resolve every input record and populate the ledger with PENDING entries.
pub fn execute_retrieve(config: &Config) -> Result<RunSummary> {
    let table = LookupTable::load(&config.lookup_path)?;
    let records = load_input_records(&config.input_path)?;

    let store = open_ledger(config)?;
    let coordinator = build_coordinator(config, store)?;

    Ok(run_retrieval(&records, &table, &coordinator))
}
