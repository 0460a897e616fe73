//! Output formatting for ledger contents and run summaries.

use crate::error::Result;
use colored::Colorize;
use confnote_domain::{CnFields, EntryStatus, LedgerEntry};
use confnote_worker::RunSummary;
use serde_json::{json, Value};
use tabled::{Table, Tabled};

/// One ledger entry as a table row.
///
/// Credentials are deliberately absent: status output must never leak the
/// snapshot secrets.
#[derive(Tabled)]
pub struct StatusRow {
    /// Entry id
    #[tabled(rename = "id")]
    pub id: i64,

    /// Source lookup key
    #[tabled(rename = "source")]
    pub source: String,

    /// Entry status
    #[tabled(rename = "status")]
    pub status: String,

    /// Extracted currency
    #[tabled(rename = "currency")]
    pub currency: String,

    /// Extracted net amount
    #[tabled(rename = "net amount")]
    pub net_amount: String,

    /// Truncation marker
    #[tabled(rename = "truncated")]
    pub truncated: String,
}

impl From<&LedgerEntry> for StatusRow {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id.value(),
            source: entry.source_key.clone(),
            status: colorize_status(&entry.status),
            currency: entry.fields.currency.clone().unwrap_or_default(),
            net_amount: entry.fields.net_amount.clone().unwrap_or_default(),
            truncated: if entry.truncated { "yes".to_string() } else { String::new() },
        }
    }
}

fn colorize_status(status: &EntryStatus) -> String {
    match status {
        EntryStatus::Pending => "pending".yellow().to_string(),
        EntryStatus::Success => "success".green().to_string(),
        EntryStatus::Failed(kind) => format!("failed({})", kind).red().to_string(),
    }
}

/// Render ledger entries as a table.
pub fn entries_table(entries: &[LedgerEntry]) -> String {
    let rows: Vec<StatusRow> = entries.iter().map(StatusRow::from).collect();
    Table::new(rows).to_string()
}

/// Render ledger entries as pretty JSON.
pub fn entries_json(entries: &[LedgerEntry]) -> Result<String> {
    let values: Vec<Value> = entries.iter().map(entry_json).collect();
    Ok(serde_json::to_string_pretty(&values)?)
}

fn entry_json(entry: &LedgerEntry) -> Value {
    let mut fields = serde_json::Map::new();
    for name in CnFields::NAMES {
        let value = match entry.fields.get(name) {
            Some(value) => Value::String(value.to_string()),
            None => Value::Null,
        };
        fields.insert(name.to_string(), value);
    }

    json!({
        "id": entry.id.value(),
        "artifact_path": entry.artifact_path.to_string_lossy(),
        "source_key": entry.source_key,
        "created_at": entry.created_at,
        "status": entry.status.to_string(),
        "truncated": entry.truncated,
        "fields": Value::Object(fields),
        "raw_response": entry.raw_response,
    })
}

/// Print the end-of-run summary.
pub fn print_summary(summary: &RunSummary) {
    println!("{}", summary);
    if summary.records_failed > 0 || summary.entries_failed > 0 {
        println!(
            "{}",
            "Some rows failed; per-row detail lives in the ledger (confnote status)".red()
        );
    } else {
        println!("{}", "[OK] run complete".green());
    }
}
