//! Mail-source implementations
//!
//! The production mailbox here is a drop directory: an upstream fetcher (or
//! an operator) exports each message into its own subdirectory holding a
//! small `message.toml` manifest (sender, subject) next to the attachment
//! files. This keeps the pipeline testable and independent of any one mail
//! protocol; the core only sees the `MailSource` trait.

use confnote_domain::traits::{MailFilter, MailSource, RetrievedAttachment};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from mail-source implementations.
#[derive(Error, Debug)]
pub enum MailError {
    /// The mail store cannot be reached at all.
    #[error("Mail store unavailable: {0}")]
    Unavailable(String),

    /// I/O failure while reading messages.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct MessageManifest {
    sender: String,
    subject: String,
}

/// Directory-backed mail source.
///
/// Layout: one subdirectory per message under the root, each containing a
/// `message.toml` manifest plus attachment files. Subdirectories without a
/// manifest are ignored; malformed manifests are skipped with a warning,
/// mirroring how a flaky inbox item should not abort a whole search.
pub struct DirMailbox {
    root: PathBuf,
}

impl DirMailbox {
    /// Create a mailbox over the given drop directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MailSource for DirMailbox {
    type Error = MailError;

    fn search(&self, filter: &MailFilter) -> Result<Vec<RetrievedAttachment>, MailError> {
        if !self.root.is_dir() {
            return Err(MailError::Unavailable(self.root.display().to_string()));
        }

        let mut message_dirs: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        message_dirs.sort();

        let mut checked = 0usize;
        let mut matched = 0usize;
        let mut attachments = Vec::new();

        for dir in message_dirs {
            let manifest_path = dir.join("message.toml");
            if !manifest_path.is_file() {
                continue;
            }
            checked += 1;

            let manifest = match read_manifest(&manifest_path) {
                Ok(manifest) => manifest,
                Err(reason) => {
                    warn!(dir = %dir.display(), %reason, "skipping malformed message");
                    continue;
                }
            };

            if !filter.matches(&manifest.sender, &manifest.subject) {
                continue;
            }
            matched += 1;
            debug!(subject = %manifest.subject, "matched message");

            let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file())
                .filter(|path| path.file_name().map(|n| n != "message.toml").unwrap_or(false))
                .collect();
            files.sort();

            for file in files {
                let suggested_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                attachments.push(RetrievedAttachment {
                    bytes: fs::read(&file)?,
                    suggested_name,
                });
            }
        }

        debug!(checked, matched, "mail search complete");
        Ok(attachments)
    }
}

fn read_manifest(path: &std::path::Path) -> Result<MessageManifest, String> {
    let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
    toml::from_str(&contents).map_err(|e| e.to_string())
}

/// One scripted message for [`MockMailbox`].
#[derive(Debug, Clone)]
pub struct MockMessage {
    /// Message sender address.
    pub sender: String,
    /// Message subject line.
    pub subject: String,
    /// Attachments carried by the message.
    pub attachments: Vec<RetrievedAttachment>,
}

/// In-memory mail source for testing.
#[derive(Debug, Clone, Default)]
pub struct MockMailbox {
    messages: Vec<MockMessage>,
    fail_with: Option<String>,
}

impl MockMailbox {
    /// A mailbox holding the given messages.
    pub fn new(messages: Vec<MockMessage>) -> Self {
        Self {
            messages,
            fail_with: None,
        }
    }

    /// A mailbox that fails every search, as a connectivity failure would.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            fail_with: Some(message.into()),
        }
    }
}

impl MailSource for MockMailbox {
    type Error = MailError;

    fn search(&self, filter: &MailFilter) -> Result<Vec<RetrievedAttachment>, MailError> {
        if let Some(message) = &self.fail_with {
            return Err(MailError::Unavailable(message.clone()));
        }

        Ok(self
            .messages
            .iter()
            .filter(|message| filter.matches(&message.sender, &message.subject))
            .flat_map(|message| message.attachments.iter().cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_message(root: &std::path::Path, dir: &str, sender: &str, subject: &str, files: &[(&str, &[u8])]) {
        let message_dir = root.join(dir);
        fs::create_dir_all(&message_dir).unwrap();
        fs::write(
            message_dir.join("message.toml"),
            format!("sender = \"{}\"\nsubject = \"{}\"\n", sender, subject),
        )
        .unwrap();
        for (name, bytes) in files {
            fs::write(message_dir.join(name), bytes).unwrap();
        }
    }

    fn filter() -> MailFilter {
        MailFilter {
            sender: "confirmations@acme.example".to_string(),
            subject_term: "ACME-CONF".to_string(),
        }
    }

    #[test]
    fn test_missing_root_is_unavailable() {
        let mailbox = DirMailbox::new("/nonexistent/mail");
        assert!(matches!(
            mailbox.search(&filter()),
            Err(MailError::Unavailable(_))
        ));
    }

    #[test]
    fn test_search_returns_matching_attachments_only() {
        let dir = tempfile::tempdir().unwrap();
        write_message(
            dir.path(),
            "msg-001",
            "confirmations@acme.example",
            "Fwd: acme-conf trade",
            &[("note.pdf", b"%PDF-1.4 one")],
        );
        write_message(
            dir.path(),
            "msg-002",
            "spam@other.example",
            "acme-conf but wrong sender",
            &[("other.pdf", b"%PDF-1.4 two")],
        );

        let mailbox = DirMailbox::new(dir.path());
        let attachments = mailbox.search(&filter()).unwrap();

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].suggested_name, "note.pdf");
        assert_eq!(attachments[0].bytes, b"%PDF-1.4 one");
    }

    #[test]
    fn test_malformed_manifest_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("msg-000");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join("message.toml"), "sender = [not toml").unwrap();

        write_message(
            dir.path(),
            "msg-001",
            "confirmations@acme.example",
            "ACME-CONF statement",
            &[("note.pdf", b"ok")],
        );

        let mailbox = DirMailbox::new(dir.path());
        let attachments = mailbox.search(&filter()).unwrap();
        assert_eq!(attachments.len(), 1);
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let mailbox = DirMailbox::new(dir.path());
        assert!(mailbox.search(&filter()).unwrap().is_empty());
    }

    #[test]
    fn test_mock_mailbox_failing() {
        let mailbox = MockMailbox::failing("imap connection refused");
        assert!(matches!(
            mailbox.search(&filter()),
            Err(MailError::Unavailable(_))
        ));
    }
}
