//! Driving input records

use crate::RetrievalError;
use confnote_domain::InputRecord;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct InputFile {
    #[serde(default)]
    record: Vec<InputRecordToml>,
}

#[derive(Debug, Deserialize)]
struct InputRecordToml {
    #[serde(default)]
    key: String,
    #[serde(default)]
    extra: BTreeMap<String, String>,
}

/// Load the driving input from a TOML file of `[[record]]` rows.
///
/// Records with blank keys are kept: the resolver skips them with
/// `SkipReason::EmptyKey` so the run summary can account for them.
pub fn load_input_records(path: &Path) -> Result<Vec<InputRecord>, RetrievalError> {
    let contents = fs::read_to_string(path)?;
    let file: InputFile = toml::from_str(&contents)?;

    let records: Vec<InputRecord> = file
        .record
        .into_iter()
        .map(|record| InputRecord {
            key: record.key,
            extra: record.extra,
        })
        .collect();

    info!(records = records.len(), path = %path.display(), "input records loaded");
    Ok(records)
}
