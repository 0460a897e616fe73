//! The ledger reconciler - the single terminal write per entry

use crate::error::WorkerError;
use confnote_domain::traits::LedgerStore;
use confnote_domain::{EntryId, EntryStatus, ExtractionOutcome, FailureKind, LedgerEntry};
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Whether a reconciliation pass may touch entries already terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reprocess {
    /// Default: terminal entries are skipped untouched.
    None,
    /// Re-apply entries in FAILED state ("retry failed rows" mode).
    Failed,
    /// Re-apply every terminal entry, SUCCESS included. Explicit opt-in for
    /// runs after an extraction-prompt change.
    Terminal,
}

impl Reprocess {
    fn allows(&self, status: &EntryStatus) -> bool {
        match status {
            EntryStatus::Pending => true,
            EntryStatus::Failed(_) => matches!(self, Reprocess::Failed | Reprocess::Terminal),
            EntryStatus::Success => matches!(self, Reprocess::Terminal),
        }
    }
}

/// What the reconciler did with one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The terminal write was performed.
    Updated,
    /// The entry was already terminal and the mode forbids touching it.
    SkippedTerminal,
}

/// Merges extraction outcomes back into the persistent ledger.
///
/// Each entry gets at most one outcome; applying the same successful outcome
/// twice leaves the ledger byte-identical to applying it once. On failure,
/// field values are cleared as a whole - never a mix of old and new ones -
/// and the raw oracle output is retained for parse failures only.
pub struct Reconciler<S> {
    store: Arc<Mutex<S>>,
}

impl<S> Reconciler<S>
where
    S: LedgerStore,
    S::Error: Display,
{
    /// Create a reconciler over the shared ledger handle.
    pub fn new(store: Arc<Mutex<S>>) -> Self {
        Self { store }
    }

    /// Apply an outcome with the default mode (terminal entries skipped).
    pub fn apply(
        &self,
        id: EntryId,
        outcome: &ExtractionOutcome,
    ) -> Result<Applied, WorkerError> {
        self.apply_with(id, outcome, Reprocess::None)
    }

    /// Apply an outcome under an explicit reprocessing mode.
    pub fn apply_with(
        &self,
        id: EntryId,
        outcome: &ExtractionOutcome,
        reprocess: Reprocess,
    ) -> Result<Applied, WorkerError> {
        let mut store = self.lock()?;

        let entry = store
            .entry(id)
            .map_err(|e| WorkerError::Store(e.to_string()))?
            .ok_or(WorkerError::EntryNotFound(id))?;

        if entry.status.is_terminal() && !reprocess.allows(&entry.status) {
            debug!(id = %id, status = %entry.status, "entry already terminal, skipping");
            return Ok(Applied::SkippedTerminal);
        }

        match outcome {
            ExtractionOutcome::Extracted { fields, truncated } => {
                store
                    .record_success(id, fields, *truncated)
                    .map_err(|e| WorkerError::Store(e.to_string()))?;
                info!(id = %id, "entry reconciled: success");
            }
            ExtractionOutcome::Failed { kind, raw_response } => {
                let raw = match kind {
                    FailureKind::ExtractionParse => raw_response.as_deref(),
                    _ => None,
                };
                store
                    .record_failure(id, *kind, raw)
                    .map_err(|e| WorkerError::Store(e.to_string()))?;
                info!(id = %id, kind = %kind, "entry reconciled: failed");
            }
        }

        Ok(Applied::Updated)
    }

    /// The entries a pass with the given mode should visit, in id order.
    pub fn targets(&self, reprocess: Reprocess) -> Result<Vec<LedgerEntry>, WorkerError> {
        let store = self.lock()?;
        let store_err = |e: S::Error| WorkerError::Store(e.to_string());

        match reprocess {
            Reprocess::None => store.pending_entries().map_err(store_err),
            Reprocess::Failed => {
                let mut entries = store.pending_entries().map_err(store_err)?;
                entries.extend(store.failed_entries().map_err(store_err)?);
                entries.sort_by_key(|entry| entry.id);
                Ok(entries)
            }
            Reprocess::Terminal => store.entries().map_err(store_err),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, S>, WorkerError> {
        self.store
            .lock()
            .map_err(|_| WorkerError::Store("ledger lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confnote_domain::{CnFields, NewEntry};
    use confnote_store::SqliteLedger;
    use std::path::PathBuf;

    fn setup() -> (Reconciler<SqliteLedger>, Arc<Mutex<SqliteLedger>>, EntryId) {
        let store = Arc::new(Mutex::new(SqliteLedger::open(":memory:").unwrap()));
        let id = store
            .lock()
            .unwrap()
            .append_entry(NewEntry {
                artifact_path: PathBuf::from("downloads/note.pdf"),
                source_key: "42".to_string(),
                credentials: vec!["pw1".to_string()],
                created_at: 1_750_000_000,
            })
            .unwrap();
        (Reconciler::new(Arc::clone(&store)), store, id)
    }

    fn success_outcome() -> ExtractionOutcome {
        let mut fields = CnFields::default();
        fields.set("currency", "USD".to_string());
        ExtractionOutcome::Extracted {
            fields,
            truncated: false,
        }
    }

    #[test]
    fn test_apply_success_writes_fields() {
        let (reconciler, store, id) = setup();

        let applied = reconciler.apply(id, &success_outcome()).unwrap();
        assert_eq!(applied, Applied::Updated);

        let entry = store.lock().unwrap().entry(id).unwrap().unwrap();
        assert_eq!(entry.status, EntryStatus::Success);
        assert_eq!(entry.fields.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_reapplying_success_is_idempotent() {
        let (reconciler, store, id) = setup();

        reconciler.apply(id, &success_outcome()).unwrap();
        let first = store.lock().unwrap().entry(id).unwrap().unwrap();

        // Default mode: the terminal entry is left untouched.
        let applied = reconciler.apply(id, &success_outcome()).unwrap();
        assert_eq!(applied, Applied::SkippedTerminal);

        // Explicit reprocessing writes identical values; state is unchanged
        // either way.
        let applied = reconciler
            .apply_with(id, &success_outcome(), Reprocess::Terminal)
            .unwrap();
        assert_eq!(applied, Applied::Updated);

        let second = store.lock().unwrap().entry(id).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failure_does_not_touch_fields_of_other_entries() {
        let (reconciler, store, id) = setup();
        let other_id = store
            .lock()
            .unwrap()
            .append_entry(NewEntry {
                artifact_path: PathBuf::from("downloads/other.pdf"),
                source_key: "7".to_string(),
                credentials: vec![],
                created_at: 1_750_000_001,
            })
            .unwrap();

        reconciler.apply(id, &success_outcome()).unwrap();
        reconciler
            .apply(
                other_id,
                &ExtractionOutcome::failure(FailureKind::Decryption),
            )
            .unwrap();

        let store = store.lock().unwrap();
        let ok = store.entry(id).unwrap().unwrap();
        let failed = store.entry(other_id).unwrap().unwrap();

        assert_eq!(ok.fields.currency.as_deref(), Some("USD"));
        assert_eq!(failed.status, EntryStatus::Failed(FailureKind::Decryption));
        assert!(failed.fields.is_empty());
    }

    #[test]
    fn test_raw_response_retained_for_parse_failures_only() {
        let (reconciler, store, id) = setup();

        reconciler
            .apply(
                id,
                &ExtractionOutcome::Failed {
                    kind: FailureKind::ExtractionTimeout,
                    raw_response: Some("should be discarded".to_string()),
                },
            )
            .unwrap();

        let entry = store.lock().unwrap().entry(id).unwrap().unwrap();
        assert!(entry.raw_response.is_none());
    }

    #[test]
    fn test_failed_entries_retry_only_under_failed_mode() {
        let (reconciler, _store, id) = setup();
        reconciler
            .apply(id, &ExtractionOutcome::failure(FailureKind::Decryption))
            .unwrap();

        // Default pass leaves the failed entry alone.
        let applied = reconciler.apply(id, &success_outcome()).unwrap();
        assert_eq!(applied, Applied::SkippedTerminal);

        // Retry-failed mode reaches it; success mode entries stay protected.
        let applied = reconciler
            .apply_with(id, &success_outcome(), Reprocess::Failed)
            .unwrap();
        assert_eq!(applied, Applied::Updated);

        let applied = reconciler
            .apply_with(id, &success_outcome(), Reprocess::Failed)
            .unwrap();
        assert_eq!(applied, Applied::SkippedTerminal);
    }

    #[test]
    fn test_targets_by_mode() {
        let (reconciler, store, id) = setup();
        let pending_id = store
            .lock()
            .unwrap()
            .append_entry(NewEntry {
                artifact_path: PathBuf::from("downloads/pending.pdf"),
                source_key: "7".to_string(),
                credentials: vec![],
                created_at: 1_750_000_002,
            })
            .unwrap();

        reconciler
            .apply(id, &ExtractionOutcome::failure(FailureKind::Recognition))
            .unwrap();

        let ids = |entries: Vec<LedgerEntry>| entries.iter().map(|e| e.id).collect::<Vec<_>>();

        assert_eq!(ids(reconciler.targets(Reprocess::None).unwrap()), vec![pending_id]);
        assert_eq!(
            ids(reconciler.targets(Reprocess::Failed).unwrap()),
            vec![id, pending_id]
        );
        assert_eq!(
            ids(reconciler.targets(Reprocess::Terminal).unwrap()),
            vec![id, pending_id]
        );
    }

    #[test]
    fn test_unknown_entry_is_an_error() {
        let (reconciler, _store, _id) = setup();
        let result = reconciler.apply(EntryId::from_value(999), &success_outcome());
        assert!(matches!(result, Err(WorkerError::EntryNotFound(_))));
    }
}
