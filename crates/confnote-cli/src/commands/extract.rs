//! The extract command: phase 2 only.

use super::{build_worker, open_ledger};
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use confnote_worker::{run_extraction, Reconciler, Reprocess, RunSummary};

/// Process ledger entries through the extraction worker and reconcile the
/// outcomes.
pub async fn execute_extract(config: &Config, args: &ExtractArgs) -> Result<RunSummary> {
    let reprocess = if args.reprocess_all {
        Reprocess::Terminal
    } else if args.retry_failed {
        Reprocess::Failed
    } else {
        Reprocess::None
    };

    let store = open_ledger(config)?;
    let worker = build_worker(config);
    let reconciler = Reconciler::new(store);

    Ok(run_extraction(&worker, &reconciler, reprocess).await?)
}
