//! Retrieval coordination - from resolved row to PENDING ledger entries

use crate::RetrievalError;
use confnote_domain::traits::{LedgerStore, MailFilter, MailSource};
use confnote_domain::{LedgerEntry, NewEntry, ResolvedRow};
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Drives mail retrieval for one resolved row and records the results.
///
/// For every matching PDF attachment the coordinator persists the bytes under
/// a collision-resistant name and appends one PENDING ledger entry carrying
/// the row's credential snapshot. Finding nothing is a normal outcome; a
/// failing mail source aborts the whole row and is reported to the caller.
pub struct RetrievalCoordinator<M, S> {
    mail: M,
    store: Arc<Mutex<S>>,
    download_dir: PathBuf,
    source_email: String,
}

impl<M, S> RetrievalCoordinator<M, S>
where
    M: MailSource,
    M::Error: Display,
    S: LedgerStore,
    S::Error: Display,
{
    /// Create a coordinator.
    ///
    /// `source_email` is the configured sender address confirmation mail
    /// arrives from; `download_dir` is where artifacts are persisted.
    pub fn new(
        mail: M,
        store: Arc<Mutex<S>>,
        download_dir: impl Into<PathBuf>,
        source_email: impl Into<String>,
    ) -> Self {
        Self {
            mail,
            store,
            download_dir: download_dir.into(),
            source_email: source_email.into(),
        }
    }

    /// Retrieve artifacts for one resolved row.
    ///
    /// Returns the created ledger entries; the empty vector when nothing
    /// matched.
    pub fn retrieve(&self, row: &ResolvedRow) -> Result<Vec<LedgerEntry>, RetrievalError> {
        let filter = MailFilter {
            sender: self.source_email.clone(),
            subject_term: row.search_term.clone(),
        };

        info!(key = %row.source_key, term = %row.search_term, "searching mail");
        let attachments = self
            .mail
            .search(&filter)
            .map_err(|e| RetrievalError::Mail(e.to_string()))?;

        if attachments.is_empty() {
            debug!(key = %row.source_key, "no matching attachments");
            return Ok(Vec::new());
        }

        fs::create_dir_all(&self.download_dir)?;

        let mut entries = Vec::new();
        for attachment in attachments {
            if !is_pdf_name(&attachment.suggested_name) {
                debug!(name = %attachment.suggested_name, "skipping non-PDF attachment");
                continue;
            }

            let file_name = artifact_file_name(&row.source_key, &attachment.suggested_name);
            let artifact_path = self.download_dir.join(file_name);
            fs::write(&artifact_path, &attachment.bytes)?;

            let new = NewEntry {
                artifact_path: artifact_path.clone(),
                source_key: row.source_key.clone(),
                credentials: row.credentials.clone(),
                created_at: unix_seconds(),
            };

            let entry = {
                let mut store = self
                    .store
                    .lock()
                    .map_err(|_| RetrievalError::Store("ledger lock poisoned".to_string()))?;
                let id = store
                    .append_entry(new)
                    .map_err(|e| RetrievalError::Store(e.to_string()))?;
                store
                    .entry(id)
                    .map_err(|e| RetrievalError::Store(e.to_string()))?
                    .ok_or_else(|| {
                        RetrievalError::Store(format!("entry {} missing after append", id))
                    })?
            };

            info!(id = %entry.id, path = %artifact_path.display(), "ledger entry created");
            entries.push(entry);
        }

        Ok(entries)
    }
}

fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Artifact names combine a nanosecond timestamp, the source key, and a
/// fresh UUID: two concurrent retrievals for the same key can never
/// overwrite each other's artifact, even within one clock tick.
fn artifact_file_name(source_key: &str, suggested_name: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let token = uuid::Uuid::now_v7();
    format!(
        "{}_{}_{}_{}",
        nanos,
        sanitize(source_key),
        token.simple(),
        sanitize(suggested_name)
    )
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::{MockMailbox, MockMessage};
    use confnote_domain::traits::RetrievedAttachment;
    use confnote_domain::EntryStatus;
    use confnote_store::SqliteLedger;

    fn resolved_row() -> ResolvedRow {
        ResolvedRow {
            source_key: "42".to_string(),
            search_term: "ACME-CONF".to_string(),
            credentials: vec!["pw1".to_string(), "pw2".to_string()],
        }
    }

    fn message(attachments: Vec<RetrievedAttachment>) -> MockMessage {
        MockMessage {
            sender: "confirmations@acme.example".to_string(),
            subject: "ACME-CONF trade 2026-07-31".to_string(),
            attachments,
        }
    }

    fn coordinator(
        mail: MockMailbox,
        dir: &std::path::Path,
    ) -> (
        RetrievalCoordinator<MockMailbox, SqliteLedger>,
        Arc<Mutex<SqliteLedger>>,
    ) {
        let store = Arc::new(Mutex::new(SqliteLedger::open(":memory:").unwrap()));
        let coordinator = RetrievalCoordinator::new(
            mail,
            Arc::clone(&store),
            dir.join("downloads"),
            "confirmations@acme.example",
        );
        (coordinator, store)
    }

    #[test]
    fn test_one_attachment_becomes_one_pending_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mail = MockMailbox::new(vec![message(vec![RetrievedAttachment {
            bytes: b"%PDF-1.4 fake".to_vec(),
            suggested_name: "confirmation.pdf".to_string(),
        }])]);
        let (coordinator, store) = coordinator(mail, dir.path());

        let entries = coordinator.retrieve(&resolved_row()).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.credentials, vec!["pw1", "pw2"]);
        assert_eq!(entry.source_key, "42");
        assert!(entry.artifact_path.exists());
        assert_eq!(
            fs::read(&entry.artifact_path).unwrap(),
            b"%PDF-1.4 fake".to_vec()
        );

        let store = store.lock().unwrap();
        assert_eq!(store.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_zero_matches_creates_zero_rows() {
        let dir = tempfile::tempdir().unwrap();
        let (coordinator, store) = coordinator(MockMailbox::default(), dir.path());

        let entries = coordinator.retrieve(&resolved_row()).unwrap();
        assert!(entries.is_empty());
        assert!(store.lock().unwrap().entries().unwrap().is_empty());
    }

    #[test]
    fn test_mail_failure_aborts_row_with_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        let (coordinator, store) =
            coordinator(MockMailbox::failing("connection refused"), dir.path());

        let result = coordinator.retrieve(&resolved_row());
        assert!(matches!(result, Err(RetrievalError::Mail(_))));
        assert!(store.lock().unwrap().entries().unwrap().is_empty());
    }

    #[test]
    fn test_non_pdf_attachments_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mail = MockMailbox::new(vec![message(vec![
            RetrievedAttachment {
                bytes: b"binary".to_vec(),
                suggested_name: "logo.png".to_string(),
            },
            RetrievedAttachment {
                bytes: b"%PDF-1.4".to_vec(),
                suggested_name: "Note.PDF".to_string(),
            },
        ])]);
        let (coordinator, _store) = coordinator(mail, dir.path());

        let entries = coordinator.retrieve(&resolved_row()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0]
            .artifact_path
            .to_string_lossy()
            .to_lowercase()
            .ends_with(".pdf"));
    }

    #[test]
    fn test_artifact_names_never_collide() {
        let name_a = artifact_file_name("42", "note.pdf");
        let name_b = artifact_file_name("42", "note.pdf");
        assert_ne!(name_a, name_b);
    }

    #[test]
    fn test_sanitize_keeps_safe_characters_only() {
        assert_eq!(sanitize("Fund House/42"), "Fund-House-42");
        assert_eq!(sanitize("note.pdf"), "note.pdf");
    }
}
