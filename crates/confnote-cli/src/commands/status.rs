//! The status command: report ledger contents.

use crate::cli::StatusArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output;
use confnote_domain::traits::LedgerStore;
use confnote_domain::EntryStatus;
use confnote_store::SqliteLedger;

/// Print the ledger as a table (or JSON) plus status counts.
pub fn execute_status(config: &Config, args: &StatusArgs) -> Result<()> {
    let ledger = SqliteLedger::open(&config.ledger_path)?;
    let entries = ledger.entries()?;

    if args.json {
        println!("{}", output::entries_json(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Ledger is empty: {}", config.ledger_path.display());
        return Ok(());
    }

    println!("{}", output::entries_table(&entries));

    let pending = entries
        .iter()
        .filter(|e| e.status == EntryStatus::Pending)
        .count();
    let success = entries
        .iter()
        .filter(|e| e.status == EntryStatus::Success)
        .count();
    let failed = entries.len() - pending - success;
    println!(
        "{} entries: {} pending, {} success, {} failed",
        entries.len(),
        pending,
        success,
        failed
    );

    Ok(())
}
