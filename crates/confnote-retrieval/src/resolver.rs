//! Row resolution - mapping an input record to search term and credentials

use crate::lookup::LookupTable;
use confnote_domain::{InputRecord, ResolvedRow, SkipReason};

/// Resolves input records against a lookup snapshot.
///
/// Pure function of (record, table): no side effects, no retained state
/// beyond the table reference.
pub struct RowResolver<'a> {
    table: &'a LookupTable,
}

impl<'a> RowResolver<'a> {
    /// Create a resolver over a loaded lookup table.
    pub fn new(table: &'a LookupTable) -> Self {
        Self { table }
    }

    /// Resolve one input record, or report why it must be skipped.
    ///
    /// The returned credential list is copied out of the lookup record, so
    /// later table edits cannot affect rows already resolved.
    pub fn resolve_row(&self, record: &InputRecord) -> Result<ResolvedRow, SkipReason> {
        let key = record.key.trim();
        if key.is_empty() {
            return Err(SkipReason::EmptyKey);
        }

        let lookup = self.table.resolve(key).ok_or(SkipReason::KeyNotFound)?;

        // Search terms arrive quoted in some reference sheets.
        let search_term = lookup.search_term.trim().trim_matches('"').trim();
        if search_term.is_empty() {
            return Err(SkipReason::NoSearchTerm);
        }

        Ok(ResolvedRow {
            source_key: key.to_string(),
            search_term: search_term.to_string(),
            credentials: lookup.credentials.clone(),
        })
    }
}
