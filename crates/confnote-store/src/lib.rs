//! Confnote Storage Layer
//!
//! Implements the `LedgerStore` trait on SQLite.
//!
//! # Architecture
//!
//! One table, one row per retrieved artifact. The row id is the entry's sole
//! identity; `AUTOINCREMENT` keeps ids strictly increasing and never reused.
//! Terminal writes (success or failure) are single `UPDATE` statements, so a
//! row commit is atomic and a crashed run can always be reloaded safely.
//!
//! # Examples
//!
//! ```no_run
//! use confnote_store::SqliteLedger;
//!
//! let ledger = SqliteLedger::open("confnote.db").unwrap();
//! // Ledger is now ready for entry operations
//! ```

#![warn(missing_docs)]

use confnote_domain::traits::LedgerStore;
use confnote_domain::{CnFields, EntryId, EntryStatus, FailureKind, LedgerEntry, NewEntry};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during ledger storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Entry not found
    #[error("Entry not found: {0}")]
    NotFound(EntryId),

    /// Invalid data in a stored row
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of `LedgerStore`.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a `SqliteLedger` across
/// tasks behind a mutex; writes take `&mut self` so there is one writer at a
/// time regardless.
pub struct SqliteLedger {
    conn: Connection,
}

const ENTRY_COLUMNS: &str = "id, artifact_path, source_key, credentials, created_at, status, \
     failure_kind, truncated, raw_response, is_cn, operation_type, is_multiseries, currency, \
     gross_amount, net_amount, units, equalization, fees, nav_price, nav_date, settlement_date";

impl SqliteLedger {
    /// Open (or create) a ledger at the given database path.
    ///
    /// Use `:memory:` for an in-memory ledger (useful for testing).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut ledger = Self { conn };
        ledger.initialize_schema()?;
        Ok(ledger)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn credentials_to_json(credentials: &[String]) -> Result<String, StoreError> {
        serde_json::to_string(credentials)
            .map_err(|e| StoreError::InvalidData(format!("credential snapshot: {}", e)))
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
        let credentials_json: String = row.get(3)?;
        let credentials: Vec<String> = serde_json::from_str(&credentials_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;

        let status_str: String = row.get(5)?;
        let failure_kind: Option<String> = row.get(6)?;
        let status = match status_str.as_str() {
            "pending" => EntryStatus::Pending,
            "success" => EntryStatus::Success,
            "failed" => {
                let label = failure_kind.unwrap_or_default();
                let kind = FailureKind::from_label(&label).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        6,
                        rusqlite::types::Type::Text,
                        Box::new(StoreError::InvalidData(e)),
                    )
                })?;
                EntryStatus::Failed(kind)
            }
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    5,
                    rusqlite::types::Type::Text,
                    Box::new(StoreError::InvalidData(format!("unknown status: {}", other))),
                ))
            }
        };

        let artifact_path: String = row.get(1)?;

        let mut fields = CnFields::default();
        for (offset, name) in CnFields::NAMES.iter().enumerate() {
            let value: Option<String> = row.get(9 + offset)?;
            if let Some(value) = value {
                fields.set(name, value);
            }
        }

        Ok(LedgerEntry {
            id: EntryId::from_value(row.get(0)?),
            artifact_path: PathBuf::from(artifact_path),
            source_key: row.get(2)?,
            credentials,
            created_at: row.get::<_, i64>(4)? as u64,
            status,
            truncated: row.get::<_, i64>(7)? != 0,
            fields,
            raw_response: row.get(8)?,
        })
    }

    fn entries_where(&self, condition: &str) -> Result<Vec<LedgerEntry>, StoreError> {
        let sql = format!(
            "SELECT {} FROM ledger WHERE {} ORDER BY id",
            ENTRY_COLUMNS, condition
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl LedgerStore for SqliteLedger {
    type Error = StoreError;

    fn append_entry(&mut self, new: NewEntry) -> Result<EntryId, Self::Error> {
        let credentials = Self::credentials_to_json(&new.credentials)?;

        self.conn.execute(
            "INSERT INTO ledger (artifact_path, source_key, credentials, created_at, status)
             VALUES (?1, ?2, ?3, ?4, 'pending')",
            params![
                new.artifact_path.to_string_lossy().into_owned(),
                &new.source_key,
                credentials,
                new.created_at as i64,
            ],
        )?;

        Ok(EntryId::from_value(self.conn.last_insert_rowid()))
    }

    fn entry(&self, id: EntryId) -> Result<Option<LedgerEntry>, Self::Error> {
        let sql = format!("SELECT {} FROM ledger WHERE id = ?1", ENTRY_COLUMNS);
        let entry = self
            .conn
            .query_row(&sql, params![id.value()], Self::row_to_entry)
            .optional()?;
        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<LedgerEntry>, Self::Error> {
        self.entries_where("1=1")
    }

    fn pending_entries(&self) -> Result<Vec<LedgerEntry>, Self::Error> {
        self.entries_where("status = 'pending'")
    }

    fn failed_entries(&self) -> Result<Vec<LedgerEntry>, Self::Error> {
        self.entries_where("status = 'failed'")
    }

    fn record_success(
        &mut self,
        id: EntryId,
        fields: &CnFields,
        truncated: bool,
    ) -> Result<(), Self::Error> {
        // One statement: the row commit is atomic.
        let updated = self.conn.execute(
            "UPDATE ledger SET status = 'success', failure_kind = NULL, truncated = ?1,
                 raw_response = NULL,
                 is_cn = ?2, operation_type = ?3, is_multiseries = ?4, currency = ?5,
                 gross_amount = ?6, net_amount = ?7, units = ?8, equalization = ?9,
                 fees = ?10, nav_price = ?11, nav_date = ?12, settlement_date = ?13
             WHERE id = ?14",
            params![
                truncated as i64,
                fields.is_cn,
                fields.operation_type,
                fields.is_multiseries,
                fields.currency,
                fields.gross_amount,
                fields.net_amount,
                fields.units,
                fields.equalization,
                fields.fees,
                fields.nav_price,
                fields.nav_date,
                fields.settlement_date,
                id.value(),
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn record_failure(
        &mut self,
        id: EntryId,
        kind: FailureKind,
        raw_response: Option<&str>,
    ) -> Result<(), Self::Error> {
        // Field columns are cleared wholesale: never a mix of old and new.
        let updated = self.conn.execute(
            "UPDATE ledger SET status = 'failed', failure_kind = ?1, truncated = 0,
                 raw_response = ?2,
                 is_cn = NULL, operation_type = NULL, is_multiseries = NULL, currency = NULL,
                 gross_amount = NULL, net_amount = NULL, units = NULL, equalization = NULL,
                 fees = NULL, nav_price = NULL, nav_date = NULL, settlement_date = NULL
             WHERE id = ?3",
            params![kind.as_str(), raw_response, id.value()],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
