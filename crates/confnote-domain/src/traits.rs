//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the core workflow and the
//! services it delegates to. Infrastructure implementations live in other
//! crates and are constructed once at process start; no collaborator is ever
//! reached through hidden global state.

use crate::entry::{EntryId, FailureKind, LedgerEntry, NewEntry};
use crate::fields::CnFields;
use std::path::Path;

/// A rasterized document page, as encoded image bytes.
pub type PageImage = Vec<u8>;

/// Filter for searching the mail source.
///
/// Both parts match case-insensitively as substrings, mirroring the manual
/// inbox scan this pipeline replaces. Whether production data needs anchored
/// or fuzzier matching is an open question recorded in DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailFilter {
    /// Sender address the message must come from.
    pub sender: String,

    /// Term the message subject must contain.
    pub subject_term: String,
}

impl MailFilter {
    /// Whether a message with the given sender and subject matches.
    pub fn matches(&self, sender: &str, subject: &str) -> bool {
        let sender_needle = self.sender.to_lowercase();
        let subject_needle = self.subject_term.to_lowercase();
        sender.to_lowercase().contains(&sender_needle)
            && subject.to_lowercase().contains(&subject_needle)
    }
}

/// An attachment returned by the mail source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedAttachment {
    /// Raw attachment content.
    pub bytes: Vec<u8>,

    /// The file name the message suggested for the attachment.
    pub suggested_name: String,
}

/// Trait for searching mail and returning matching attachments.
///
/// Implemented by the infrastructure layer (confnote-retrieval).
pub trait MailSource {
    /// Error type for connectivity or permission failures.
    type Error;

    /// Return the attachments of every message matching the filter.
    ///
    /// An empty result is a normal outcome, not an error.
    fn search(&self, filter: &MailFilter) -> Result<Vec<RetrievedAttachment>, Self::Error>;
}

/// Result of one open attempt against a possibly protected document.
#[derive(Debug)]
pub enum OpenAttempt<D> {
    /// The document opened with the supplied password.
    Opened(D),
    /// The password was rejected. Trying the next credential is appropriate.
    AuthFailed,
}

/// Trait for opening and rasterizing retrieved documents.
///
/// Implemented by the infrastructure layer (confnote-render).
pub trait DocumentRenderer {
    /// Handle to an opened document.
    type Doc;

    /// Error type for failures other than password rejection.
    type Error;

    /// Attempt to open the document at `path` with `password`.
    ///
    /// An empty password covers unprotected documents.
    fn open(&self, path: &Path, password: &str) -> Result<OpenAttempt<Self::Doc>, Self::Error>;

    /// Rasterize every page of an opened document.
    fn rasterize(&self, doc: &Self::Doc) -> Result<Vec<PageImage>, Self::Error>;
}

/// Trait for optical character recognition over rasterized pages.
///
/// Implemented by the infrastructure layer (confnote-render).
pub trait TextRecognizer {
    /// Error type for recognition failures.
    type Error;

    /// Recognize text across all pages, in page order.
    fn recognize(&self, pages: &[PageImage]) -> Result<String, Self::Error>;
}

/// Trait for the extraction oracle - the free-text-to-JSON inference service.
///
/// The oracle returns raw response text; recovering the first well-formed
/// JSON object from it is the core's job, not the oracle's.
///
/// Implemented by the infrastructure layer (confnote-oracle).
pub trait ExtractionOracle {
    /// Error type for oracle failures.
    type Error;

    /// Run inference over the prompt and return the raw response text.
    fn infer(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for the ledger's durable backing store.
///
/// The store exposes read-all-rows and write-row-by-id; each row write is a
/// single atomic commit so a failed run never leaves a half-written row.
/// Writes take `&mut self`: one writer at a time.
///
/// Implemented by the infrastructure layer (confnote-store).
pub trait LedgerStore {
    /// Error type for store operations.
    type Error;

    /// Append a new PENDING entry and return its assigned id.
    fn append_entry(&mut self, new: NewEntry) -> Result<EntryId, Self::Error>;

    /// Get an entry by id.
    fn entry(&self, id: EntryId) -> Result<Option<LedgerEntry>, Self::Error>;

    /// All entries, in id order.
    fn entries(&self) -> Result<Vec<LedgerEntry>, Self::Error>;

    /// Entries still PENDING, in id order.
    fn pending_entries(&self) -> Result<Vec<LedgerEntry>, Self::Error>;

    /// Entries in terminal FAILED state, in id order.
    fn failed_entries(&self) -> Result<Vec<LedgerEntry>, Self::Error>;

    /// Terminal write: mark the entry SUCCESS and store the full field set.
    fn record_success(
        &mut self,
        id: EntryId,
        fields: &CnFields,
        truncated: bool,
    ) -> Result<(), Self::Error>;

    /// Terminal write: mark the entry FAILED, clearing any field values as a
    /// whole. `raw_response` is retained for parse failures.
    fn record_failure(
        &mut self,
        id: EntryId,
        kind: FailureKind,
        raw_response: Option<&str>,
    ) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_filter_matches_case_insensitive_substrings() {
        let filter = MailFilter {
            sender: "confirmations@acme.example".to_string(),
            subject_term: "ACME-CONF".to_string(),
        };

        assert!(filter.matches(
            "Confirmations@ACME.example",
            "Fwd: acme-conf trade 2026-07-31"
        ));
        assert!(!filter.matches("noreply@other.example", "acme-conf trade"));
        assert!(!filter.matches("confirmations@acme.example", "unrelated subject"));
    }

    #[test]
    fn test_mail_filter_empty_term_matches_any_subject() {
        let filter = MailFilter {
            sender: "a@b".to_string(),
            subject_term: String::new(),
        };
        assert!(filter.matches("a@b", "anything"));
    }
}
