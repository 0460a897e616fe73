//! Lookup table - keyed reference data loaded once per run

use crate::RetrievalError;
use confnote_domain::LookupRecord;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// Upper bound on credentials per record.
const MAX_CREDENTIALS: usize = 3;

#[derive(Debug, Deserialize)]
struct LookupFile {
    #[serde(default)]
    fund_house: Vec<LookupRecordToml>,
}

#[derive(Debug, Deserialize)]
struct LookupRecordToml {
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    search_term: String,
    #[serde(default)]
    credentials: Vec<String>,
}

/// Keyed reference dataset: fund-house identifier → search term + credentials.
///
/// Loaded once per run from a TOML file of `[[fund_house]]` records. The
/// table is read-only from the core's perspective; there is no mutation API.
///
/// # Examples
///
/// ```
/// use confnote_retrieval::LookupTable;
/// use confnote_domain::LookupRecord;
///
/// let table = LookupTable::from_records(vec![LookupRecord {
///     key: "42".to_string(),
///     fund_house: "Acme Capital".to_string(),
///     search_term: "ACME-CONF".to_string(),
///     credentials: vec!["pw1".to_string()],
/// }])
/// .unwrap();
///
/// assert!(table.resolve(" 42 ").is_some());
/// assert!(table.resolve("7").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LookupTable {
    records: Vec<LookupRecord>,
}

impl LookupTable {
    /// Load the table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RetrievalError> {
        let contents = fs::read_to_string(path)?;
        let file: LookupFile = toml::from_str(&contents)?;

        let records = file
            .fund_house
            .into_iter()
            .map(|record| LookupRecord {
                key: record.key,
                fund_house: record.name,
                search_term: record.search_term,
                credentials: record.credentials,
            })
            .collect();

        let table = Self::from_records(records)?;
        info!(records = table.len(), path = %path.display(), "lookup table loaded");
        Ok(table)
    }

    /// Build a table from in-memory records, validating invariants.
    pub fn from_records(records: Vec<LookupRecord>) -> Result<Self, RetrievalError> {
        let mut seen = HashSet::new();
        for record in &records {
            let key = record.key.trim();
            if key.is_empty() {
                return Err(RetrievalError::InvalidData(
                    "lookup record with blank key".to_string(),
                ));
            }
            if !seen.insert(key.to_string()) {
                return Err(RetrievalError::InvalidData(format!(
                    "duplicate lookup key: {}",
                    key
                )));
            }
            if record.credentials.len() > MAX_CREDENTIALS {
                return Err(RetrievalError::InvalidData(format!(
                    "lookup key {} carries {} credentials (max {})",
                    key,
                    record.credentials.len(),
                    MAX_CREDENTIALS
                )));
            }
        }
        Ok(Self { records })
    }

    /// Exact-match resolution over trimmed keys. A blank key never resolves.
    pub fn resolve(&self, key: &str) -> Option<&LookupRecord> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.records.iter().find(|record| record.key.trim() == key)
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, term: &str) -> LookupRecord {
        LookupRecord {
            key: key.to_string(),
            fund_house: format!("House {}", key),
            search_term: term.to_string(),
            credentials: vec![],
        }
    }

    #[test]
    fn test_resolve_trims_both_sides() {
        let table = LookupTable::from_records(vec![record(" 42 ", "ACME")]).unwrap();
        assert!(table.resolve("42").is_some());
        assert!(table.resolve("  42  ").is_some());
    }

    #[test]
    fn test_blank_key_never_resolves() {
        let table = LookupTable::from_records(vec![record("42", "ACME")]).unwrap();
        assert!(table.resolve("").is_none());
        assert!(table.resolve("   ").is_none());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = LookupTable::from_records(vec![record("42", "A"), record("42 ", "B")]);
        assert!(matches!(result, Err(RetrievalError::InvalidData(_))));
    }

    #[test]
    fn test_too_many_credentials_rejected() {
        let mut bad = record("42", "ACME");
        bad.credentials = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        let result = LookupTable::from_records(vec![bad]);
        assert!(matches!(result, Err(RetrievalError::InvalidData(_))));
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lookup.toml");
        fs::write(
            &path,
            r#"
[[fund_house]]
key = "42"
name = "Acme Capital"
search_term = "ACME-CONF"
credentials = ["pw1", "pw2"]

[[fund_house]]
key = "7"
name = "Blank House"
"#,
        )
        .unwrap();

        let table = LookupTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);

        let acme = table.resolve("42").unwrap();
        assert_eq!(acme.fund_house, "Acme Capital");
        assert_eq!(acme.search_term, "ACME-CONF");
        assert_eq!(acme.credentials, vec!["pw1", "pw2"]);

        // Omitted fields deserialize to blanks, not load failures.
        let blank = table.resolve("7").unwrap();
        assert!(blank.search_term.is_empty());
        assert!(blank.credentials.is_empty());
    }
}
