//! Reference data and row-resolution types

use std::collections::BTreeMap;
use std::fmt;

/// Immutable reference data for one fund house.
///
/// Loaded once per run; the core never mutates the table it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRecord {
    /// Unique fund-house identifier, matched exactly against trimmed input keys.
    pub key: String,

    /// Display name of the fund house.
    pub fund_house: String,

    /// Term used to filter mail subjects for this fund house.
    pub search_term: String,

    /// Ordered credential list (0-3 secrets), tried in stored order.
    pub credentials: Vec<String>,
}

/// One row of driving input.
///
/// The core only reads the lookup key; everything else is passthrough owned
/// by the input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// Lookup key referencing a [`LookupRecord`].
    pub key: String,

    /// Opaque passthrough fields.
    pub extra: BTreeMap<String, String>,
}

/// The output of mapping an input record through the lookup table.
///
/// `credentials` is copied out of the lookup record, not referenced, so that
/// later table edits cannot affect rows already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRow {
    /// The lookup key this row resolved through (provenance for the ledger).
    pub source_key: String,

    /// Subject search term, trimmed and unquoted.
    pub search_term: String,

    /// Ordered credential snapshot.
    pub credentials: Vec<String>,
}

/// Why an input record was skipped instead of resolved.
///
/// These are configuration-data gaps, not code faults: the affected record is
/// skipped and processing continues with the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The record's lookup key is blank after trimming.
    EmptyKey,
    /// The lookup table has no record for the key.
    KeyNotFound,
    /// A record matched but its search term is blank.
    NoSearchTerm,
}

impl SkipReason {
    /// Short label for summaries and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::EmptyKey => "empty_key",
            SkipReason::KeyNotFound => "key_not_found",
            SkipReason::NoSearchTerm => "no_search_term",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
