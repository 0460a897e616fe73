//! Transient extraction results

use crate::entry::FailureKind;
use crate::fields::CnFields;

/// Result of running the extraction worker over one ledger entry.
///
/// This value is not persisted directly; the reconciler consumes it
/// immediately and performs the single terminal write for the entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// All stages succeeded and the oracle response parsed.
    Extracted {
        /// The recovered field set.
        fields: CnFields,
        /// True iff the recognized text exceeded the character budget and
        /// was cut before prompting.
        truncated: bool,
    },
    /// A stage failed; the entry becomes terminal FAILED.
    Failed {
        /// Classified failure label.
        kind: FailureKind,
        /// Raw oracle output, retained for parse failures only.
        raw_response: Option<String>,
    },
}

impl ExtractionOutcome {
    /// Shorthand for a failure with no retained output.
    pub fn failure(kind: FailureKind) -> Self {
        ExtractionOutcome::Failed {
            kind,
            raw_response: None,
        }
    }

    /// Whether this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Extracted { .. })
    }
}
