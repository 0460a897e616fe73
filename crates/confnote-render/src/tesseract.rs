//! Tesseract-backed text recognizer

use crate::{spawn_error, RenderError};
use confnote_domain::traits::{PageImage, TextRecognizer};
use std::io::Write;
use std::process::Command;
use tracing::debug;

/// Default recognition language set.
pub const DEFAULT_LANGUAGES: &str = "eng";

/// Recognizer built on the `tesseract` command-line tool.
pub struct TesseractRecognizer {
    languages: String,
}

impl TesseractRecognizer {
    /// Create a recognizer for the given tesseract language set
    /// (e.g., "eng" or "eng+deu").
    pub fn new(languages: impl Into<String>) -> Self {
        Self {
            languages: languages.into(),
        }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES)
    }
}

impl TextRecognizer for TesseractRecognizer {
    type Error = RenderError;

    fn recognize(&self, pages: &[PageImage]) -> Result<String, RenderError> {
        let mut full_text = Vec::with_capacity(pages.len());

        for (index, page) in pages.iter().enumerate() {
            debug!("recognizing page {}/{}", index + 1, pages.len());

            let mut image = tempfile::Builder::new().suffix(".png").tempfile()?;
            image.write_all(page)?;
            image.flush()?;

            let output = Command::new("tesseract")
                .arg(image.path())
                .arg("stdout")
                .arg("-l")
                .arg(&self.languages)
                .output()
                .map_err(|e| spawn_error("tesseract", e))?;

            if !output.status.success() {
                return Err(RenderError::Tool {
                    tool: "tesseract",
                    detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            full_text.push(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }

        Ok(full_text.join("\n"))
    }
}
