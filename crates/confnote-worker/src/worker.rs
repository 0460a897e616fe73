//! The extraction worker - one ledger entry in, one classified outcome out

use crate::config::WorkerConfig;
use crate::parser::parse_oracle_response;
use crate::prompt::PromptBuilder;
use confnote_domain::traits::{DocumentRenderer, ExtractionOracle, OpenAttempt, TextRecognizer};
use confnote_domain::{ExtractionOutcome, FailureKind, LedgerEntry};
use std::fmt::Display;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Processes one ledger entry through render → recognize → infer.
///
/// The worker holds explicit handles to its three collaborators, constructed
/// once at process start. It has no side effects beyond invoking them: it
/// returns an [`ExtractionOutcome`] and never writes the ledger itself.
///
/// Entries are independent by construction (separate artifacts, separate
/// ledger rows), so a pool of workers may process entries concurrently; the
/// reconciler's per-entry-id writes are the only shared mutation.
pub struct ExtractionWorker<R, T, O> {
    renderer: Arc<R>,
    recognizer: Arc<T>,
    oracle: Arc<O>,
    config: WorkerConfig,
}

impl<R, T, O> ExtractionWorker<R, T, O>
where
    R: DocumentRenderer + Send + Sync + 'static,
    R::Doc: Send,
    R::Error: Display,
    T: TextRecognizer + Send + Sync + 'static,
    T::Error: Display,
    O: ExtractionOracle + Send + Sync + 'static,
    O::Error: Display,
{
    /// Create a worker over the given collaborator handles.
    pub fn new(renderer: R, recognizer: T, oracle: O, config: WorkerConfig) -> Self {
        Self {
            renderer: Arc::new(renderer),
            recognizer: Arc::new(recognizer),
            oracle: Arc::new(oracle),
            config,
        }
    }

    /// Extract structured fields for one entry.
    ///
    /// Strictly sequential, no retries within one invocation. Collaborator
    /// failures are classified into the outcome, never thrown: one entry's
    /// failure must not block the entries after it.
    pub async fn extract(&self, entry: &LedgerEntry) -> ExtractionOutcome {
        let text = match self.render_and_recognize(entry).await {
            Ok(text) => text,
            Err(kind) => return ExtractionOutcome::failure(kind),
        };

        let (text, truncated) = truncate_chars(text, self.config.max_text_chars);
        if truncated {
            debug!(
                id = %entry.id,
                budget = self.config.max_text_chars,
                "recognized text truncated to character budget"
            );
        }

        let prompt = PromptBuilder::new(text).build();
        let raw = match self.infer(prompt).await {
            Ok(raw) => raw,
            Err(kind) => return ExtractionOutcome::failure(kind),
        };

        match parse_oracle_response(&raw) {
            Ok(fields) => {
                info!(id = %entry.id, "fields extracted");
                ExtractionOutcome::Extracted { fields, truncated }
            }
            Err(reason) => {
                warn!(id = %entry.id, %reason, "oracle response did not parse");
                ExtractionOutcome::Failed {
                    kind: FailureKind::ExtractionParse,
                    raw_response: Some(raw),
                }
            }
        }
    }

    /// Open, rasterize, and recognize the entry's artifact.
    ///
    /// Credential trial is deterministic and order-preserving: the empty
    /// password first (unprotected documents), then the entry's snapshot in
    /// stored order, stopping at the first success.
    async fn render_and_recognize(&self, entry: &LedgerEntry) -> Result<String, FailureKind> {
        let renderer = Arc::clone(&self.renderer);
        let recognizer = Arc::clone(&self.recognizer);
        let path = entry.artifact_path.clone();
        let credentials = entry.credentials.clone();
        let id = entry.id;

        let task = tokio::task::spawn_blocking(move || -> Result<String, FailureKind> {
            let mut opened = None;
            for password in std::iter::once(String::new()).chain(credentials) {
                match renderer.open(&path, &password) {
                    Ok(OpenAttempt::Opened(doc)) => {
                        opened = Some(doc);
                        break;
                    }
                    Ok(OpenAttempt::AuthFailed) => continue,
                    Err(e) => {
                        warn!(id = %id, error = %e, "renderer error during open");
                        continue;
                    }
                }
            }
            let doc = opened.ok_or(FailureKind::Decryption)?;

            let pages = renderer.rasterize(&doc).map_err(|e| {
                warn!(id = %id, error = %e, "rasterization failed");
                FailureKind::Decryption
            })?;
            debug!(id = %id, pages = pages.len(), "document rasterized");

            let text = recognizer.recognize(&pages).map_err(|e| {
                warn!(id = %id, error = %e, "recognition failed");
                FailureKind::Recognition
            })?;
            if text.trim().is_empty() {
                warn!(id = %id, "recognizer returned empty text");
                return Err(FailureKind::Recognition);
            }
            Ok(text)
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(id = %entry.id, error = %e, "render task failed");
                Err(FailureKind::Recognition)
            }
        }
    }

    /// Call the oracle under the configured deadline.
    ///
    /// "The oracle never delivered a response" — timeout, transport failure,
    /// task death — all land in `ExtractionTimeout`, keeping it distinct from
    /// `ExtractionParse` ("the oracle answered, but wrongly").
    async fn infer(&self, prompt: String) -> Result<String, FailureKind> {
        let oracle = Arc::clone(&self.oracle);
        let call = tokio::task::spawn_blocking(move || {
            oracle.infer(&prompt).map_err(|e| e.to_string())
        });

        match timeout(self.config.oracle_timeout(), call).await {
            Err(_elapsed) => {
                warn!("oracle call exceeded deadline");
                Err(FailureKind::ExtractionTimeout)
            }
            Ok(Err(join_error)) => {
                error!(error = %join_error, "oracle task failed");
                Err(FailureKind::ExtractionTimeout)
            }
            Ok(Ok(Err(e))) => {
                warn!(error = %e, "oracle unavailable");
                Err(FailureKind::ExtractionTimeout)
            }
            Ok(Ok(Ok(raw))) => Ok(raw),
        }
    }
}

fn truncate_chars(text: String, budget: usize) -> (String, bool) {
    match text.char_indices().nth(budget) {
        Some((byte_index, _)) => (text[..byte_index].to_string(), true),
        None => (text, false),
    }
}
