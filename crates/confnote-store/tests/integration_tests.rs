//! Integration tests for the SQLite ledger: durability and idempotence.

use confnote_domain::traits::LedgerStore;
use confnote_domain::{CnFields, EntryStatus, FailureKind, NewEntry};
use confnote_store::SqliteLedger;
use std::path::PathBuf;

fn new_entry(key: &str) -> NewEntry {
    NewEntry {
        artifact_path: PathBuf::from(format!("downloads/{}.pdf", key)),
        source_key: key.to_string(),
        credentials: vec!["pw1".to_string()],
        created_at: 1_750_000_000,
    }
}

#[test]
fn test_ledger_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("ledger.db");

    let id = {
        let mut ledger = SqliteLedger::open(&db_path).unwrap();
        let id = ledger.append_entry(new_entry("42")).unwrap();

        let mut fields = CnFields::default();
        fields.set("currency", "USD".to_string());
        ledger.record_success(id, &fields, false).unwrap();
        id
    };

    // Reload from disk, as a fresh run would after a crash.
    let ledger = SqliteLedger::open(&db_path).unwrap();
    let entry = ledger.entry(id).unwrap().unwrap();
    assert_eq!(entry.status, EntryStatus::Success);
    assert_eq!(entry.fields.currency.as_deref(), Some("USD"));
}

#[test]
fn test_ids_keep_increasing_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("ledger.db");

    let first = {
        let mut ledger = SqliteLedger::open(&db_path).unwrap();
        ledger.append_entry(new_entry("1")).unwrap()
    };

    let mut ledger = SqliteLedger::open(&db_path).unwrap();
    let second = ledger.append_entry(new_entry("2")).unwrap();

    assert!(second > first, "ids must keep increasing across runs");
}

#[test]
fn test_record_success_is_idempotent() {
    let mut ledger = SqliteLedger::open(":memory:").unwrap();
    let id = ledger.append_entry(new_entry("42")).unwrap();

    let mut fields = CnFields::default();
    fields.set("currency", "USD".to_string());
    fields.set("net_amount", "10500.00".to_string());

    ledger.record_success(id, &fields, true).unwrap();
    let first = ledger.entry(id).unwrap().unwrap();

    ledger.record_success(id, &fields, true).unwrap();
    let second = ledger.entry(id).unwrap().unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_failure_after_failure_keeps_single_classified_label() {
    let mut ledger = SqliteLedger::open(":memory:").unwrap();
    let id = ledger.append_entry(new_entry("42")).unwrap();

    ledger
        .record_failure(id, FailureKind::ExtractionTimeout, None)
        .unwrap();
    ledger
        .record_failure(id, FailureKind::ExtractionParse, Some("raw text"))
        .unwrap();

    let entry = ledger.entry(id).unwrap().unwrap();
    assert_eq!(
        entry.status,
        EntryStatus::Failed(FailureKind::ExtractionParse)
    );
    assert_eq!(entry.raw_response.as_deref(), Some("raw text"));
}
