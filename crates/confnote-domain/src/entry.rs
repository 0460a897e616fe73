//! Ledger entry types - one row per retrieved artifact

use crate::fields::CnFields;
use std::fmt;
use std::path::PathBuf;

/// Identifier of a ledger row.
///
/// Assigned by the store at append time, strictly increasing within one
/// ledger, never reused. The id is the entry's sole identity: artifact paths
/// are not identities because a re-run may download a same-named file with
/// different content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(i64);

impl EntryId {
    /// Wrap a raw row id.
    ///
    /// This is primarily for storage layer deserialization; new ids are only
    /// ever minted by the store.
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw row id.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classified reason a ledger entry reached FAILED.
///
/// These are short stable labels stored in the ledger, not raw error chains.
/// Operators read them to tell "the document would not open" apart from
/// "the oracle is slow" apart from "the oracle is wrong".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No credential (including the empty one) opened the artifact, or the
    /// opened artifact could not be rendered.
    Decryption,
    /// The text recognizer failed or returned empty text.
    Recognition,
    /// The oracle responded, but no well-formed field object could be
    /// recovered from its output. The raw response is retained.
    ExtractionParse,
    /// A collaborator call exceeded the operational deadline, or the oracle
    /// never delivered a response at all.
    ExtractionTimeout,
}

impl FailureKind {
    /// The stable label stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Decryption => "decryption_error",
            FailureKind::Recognition => "recognition_error",
            FailureKind::ExtractionParse => "extraction_parse_error",
            FailureKind::ExtractionTimeout => "extraction_timeout",
        }
    }

    /// Parse a stored label back into a kind.
    pub fn from_label(label: &str) -> Result<Self, String> {
        match label {
            "decryption_error" => Ok(FailureKind::Decryption),
            "recognition_error" => Ok(FailureKind::Recognition),
            "extraction_parse_error" => Ok(FailureKind::ExtractionParse),
            "extraction_timeout" => Ok(FailureKind::ExtractionTimeout),
            other => Err(format!("unknown failure kind: {}", other)),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a ledger entry.
///
/// An entry is created PENDING and is mutated exactly once, by the
/// reconciler, into one of the terminal states. No further transitions occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Created by the retrieval coordinator; not yet processed.
    Pending,
    /// Extraction succeeded and the fields are stored.
    Success,
    /// Extraction failed with a classified reason.
    Failed(FailureKind),
}

impl EntryStatus {
    /// Whether the entry has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EntryStatus::Pending)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Pending => f.write_str("pending"),
            EntryStatus::Success => f.write_str("success"),
            EntryStatus::Failed(kind) => write!(f, "failed({})", kind),
        }
    }
}

/// One ledger row.
///
/// The ledger is append-only: re-runs add new entries, they never overwrite
/// old ones. `credentials` is a snapshot taken at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Store-assigned identity.
    pub id: EntryId,

    /// Location of the retrieved document on stable storage.
    pub artifact_path: PathBuf,

    /// The lookup key that produced this entry (provenance).
    pub source_key: String,

    /// Credential snapshot copied from the resolved row at creation time.
    pub credentials: Vec<String>,

    /// Creation timestamp (seconds since Unix epoch).
    pub created_at: u64,

    /// Lifecycle state.
    pub status: EntryStatus,

    /// Whether the recognized text was cut to the character budget before
    /// being handed to the oracle.
    pub truncated: bool,

    /// Extracted fields; empty until the entry reaches SUCCESS.
    pub fields: CnFields,

    /// Raw oracle output, retained only for parse failures.
    pub raw_response: Option<String>,
}

/// Data for a new PENDING entry, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Location of the persisted artifact; must exist at creation time.
    pub artifact_path: PathBuf,

    /// The lookup key that produced this entry.
    pub source_key: String,

    /// Credential snapshot for the row.
    pub credentials: Vec<String>,

    /// Creation timestamp (seconds since Unix epoch).
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_ordering() {
        let a = EntryId::from_value(1);
        let b = EntryId::from_value(2);

        assert!(a < b);
        assert_eq!(a.value(), 1);
    }

    #[test]
    fn test_failure_kind_label_round_trip() {
        for kind in [
            FailureKind::Decryption,
            FailureKind::Recognition,
            FailureKind::ExtractionParse,
            FailureKind::ExtractionTimeout,
        ] {
            assert_eq!(FailureKind::from_label(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn test_failure_kind_unknown_label() {
        assert!(FailureKind::from_label("stack trace goes here").is_err());
        assert!(FailureKind::from_label("").is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!EntryStatus::Pending.is_terminal());
        assert!(EntryStatus::Success.is_terminal());
        assert!(EntryStatus::Failed(FailureKind::Decryption).is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(EntryStatus::Pending.to_string(), "pending");
        assert_eq!(
            EntryStatus::Failed(FailureKind::ExtractionTimeout).to_string(),
            "failed(extraction_timeout)"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: EntryId ordering matches the underlying row-id ordering
        #[test]
        fn test_entry_id_ordering_property(a: i64, b: i64) {
            let id_a = EntryId::from_value(a);
            let id_b = EntryId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: display of an id parses back to the same raw value
        #[test]
        fn test_entry_id_display_round_trip(value: i64) {
            let id = EntryId::from_value(value);
            let parsed: i64 = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}
