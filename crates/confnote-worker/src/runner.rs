//! Sequential pipeline driver
//!
//! Two phases with no barrier between them other than ledger-entry
//! existence: retrieval fans out over input records and populates the
//! ledger, extraction then runs once per ledger entry, independent of which
//! record produced it. Row-level failures are recorded and counted, never
//! thrown past the per-row boundary.

use crate::error::WorkerError;
use crate::reconciler::{Applied, Reconciler, Reprocess};
use crate::worker::ExtractionWorker;
use confnote_domain::traits::{
    DocumentRenderer, ExtractionOracle, LedgerStore, MailSource, TextRecognizer,
};
use confnote_domain::{InputRecord, SkipReason};
use confnote_retrieval::{LookupTable, RetrievalCoordinator, RowResolver};
use std::fmt;
use std::fmt::Display;
use tracing::{error, info, warn};

/// Counters for one pipeline run.
///
/// Per-row detail lives in the ledger; the summary is the user-visible
/// roll-up printed at run end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Input records that resolved and produced at least one ledger entry.
    pub records_processed: usize,
    /// Records skipped for a blank lookup key.
    pub records_empty_key: usize,
    /// Records skipped because the lookup table has no match.
    pub records_key_not_found: usize,
    /// Records skipped because the matched record has no search term.
    pub records_no_search_term: usize,
    /// Records that resolved fine but matched zero attachments.
    pub records_without_matches: usize,
    /// Records whose retrieval aborted on a mail-source failure.
    pub records_failed: usize,
    /// Ledger entries created by the retrieval phase.
    pub entries_created: usize,
    /// Entries reconciled as SUCCESS by the extraction phase.
    pub entries_succeeded: usize,
    /// Entries reconciled as FAILED by the extraction phase.
    pub entries_failed: usize,
    /// Entries left untouched because they were already terminal.
    pub entries_skipped: usize,
}

impl RunSummary {
    /// Total records skipped during row resolution.
    pub fn records_skipped(&self) -> usize {
        self.records_empty_key + self.records_key_not_found + self.records_no_search_term
    }

    /// Fold another summary (typically the other phase) into this one.
    pub fn merge(&mut self, other: &RunSummary) {
        self.records_processed += other.records_processed;
        self.records_empty_key += other.records_empty_key;
        self.records_key_not_found += other.records_key_not_found;
        self.records_no_search_term += other.records_no_search_term;
        self.records_without_matches += other.records_without_matches;
        self.records_failed += other.records_failed;
        self.entries_created += other.entries_created;
        self.entries_succeeded += other.entries_succeeded;
        self.entries_failed += other.entries_failed;
        self.entries_skipped += other.entries_skipped;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "records: {} processed, {} skipped ({} empty key, {} key not found, {} no search term), {} without matches, {} failed",
            self.records_processed,
            self.records_skipped(),
            self.records_empty_key,
            self.records_key_not_found,
            self.records_no_search_term,
            self.records_without_matches,
            self.records_failed,
        )?;
        write!(
            f,
            "entries: {} created, {} succeeded, {} failed, {} skipped",
            self.entries_created, self.entries_succeeded, self.entries_failed, self.entries_skipped,
        )
    }
}

/// Phase 1: resolve every input record and retrieve its artifacts.
///
/// A skipped or failing record never aborts the run; the next record is
/// processed regardless.
pub fn run_retrieval<M, S>(
    records: &[InputRecord],
    table: &LookupTable,
    coordinator: &RetrievalCoordinator<M, S>,
) -> RunSummary
where
    M: MailSource,
    M::Error: Display,
    S: LedgerStore,
    S::Error: Display,
{
    let resolver = RowResolver::new(table);
    let mut summary = RunSummary::default();

    info!(records = records.len(), "retrieval phase starting");

    for record in records {
        let row = match resolver.resolve_row(record) {
            Ok(row) => row,
            Err(reason) => {
                warn!(key = %record.key, %reason, "skipping input record");
                match reason {
                    SkipReason::EmptyKey => summary.records_empty_key += 1,
                    SkipReason::KeyNotFound => summary.records_key_not_found += 1,
                    SkipReason::NoSearchTerm => summary.records_no_search_term += 1,
                }
                continue;
            }
        };

        match coordinator.retrieve(&row) {
            Ok(entries) if entries.is_empty() => {
                info!(key = %row.source_key, "no matching mail for record");
                summary.records_without_matches += 1;
            }
            Ok(entries) => {
                summary.records_processed += 1;
                summary.entries_created += entries.len();
            }
            Err(e) => {
                error!(key = %row.source_key, error = %e, "retrieval aborted for record");
                summary.records_failed += 1;
            }
        }
    }

    info!(
        created = summary.entries_created,
        skipped = summary.records_skipped(),
        "retrieval phase complete"
    );
    summary
}

/// Phase 2: extract and reconcile every targeted ledger entry.
///
/// One entry's failure - a timeout included - never blocks the entries after
/// it; only a store failure aborts the pass.
pub async fn run_extraction<R, T, O, S>(
    worker: &ExtractionWorker<R, T, O>,
    reconciler: &Reconciler<S>,
    reprocess: Reprocess,
) -> Result<RunSummary, WorkerError>
where
    R: DocumentRenderer + Send + Sync + 'static,
    R::Doc: Send,
    R::Error: Display,
    T: TextRecognizer + Send + Sync + 'static,
    T::Error: Display,
    O: ExtractionOracle + Send + Sync + 'static,
    O::Error: Display,
    S: LedgerStore,
    S::Error: Display,
{
    let targets = reconciler.targets(reprocess)?;
    info!(entries = targets.len(), "extraction phase starting");

    let mut summary = RunSummary::default();

    for entry in targets {
        let outcome = worker.extract(&entry).await;
        let success = outcome.is_success();

        match reconciler.apply_with(entry.id, &outcome, reprocess)? {
            Applied::SkippedTerminal => summary.entries_skipped += 1,
            Applied::Updated => {
                if success {
                    summary.entries_succeeded += 1;
                } else {
                    summary.entries_failed += 1;
                }
            }
        }
    }

    info!(
        succeeded = summary.entries_succeeded,
        failed = summary.entries_failed,
        skipped = summary.entries_skipped,
        "extraction phase complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_merge_and_skip_total() {
        let mut first = RunSummary {
            records_processed: 2,
            records_empty_key: 1,
            entries_created: 3,
            ..Default::default()
        };
        let second = RunSummary {
            records_key_not_found: 2,
            entries_succeeded: 3,
            ..Default::default()
        };

        first.merge(&second);
        assert_eq!(first.records_processed, 2);
        assert_eq!(first.records_skipped(), 3);
        assert_eq!(first.entries_created, 3);
        assert_eq!(first.entries_succeeded, 3);
    }

    #[test]
    fn test_summary_display_is_two_lines() {
        let summary = RunSummary::default();
        let rendered = summary.to_string();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.starts_with("records:"));
        assert!(rendered.contains("entries:"));
    }
}
