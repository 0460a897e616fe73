//! Poppler-backed document renderer
//!
//! Uses `pdfinfo` to validate a password against a document and `pdftoppm`
//! to rasterize pages to PNG. Both ship with the Poppler utilities.

use crate::{spawn_error, RenderError};
use confnote_domain::traits::{DocumentRenderer, OpenAttempt, PageImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Default rasterization resolution in DPI.
pub const DEFAULT_DPI: u32 = 300;

/// Handle to a document whose password has been validated.
///
/// Poppler has no persistent document object across invocations, so the
/// handle carries the path and the password that opened it; `rasterize`
/// replays them to `pdftoppm`.
#[derive(Debug, Clone)]
pub struct OpenedPdf {
    path: PathBuf,
    password: String,
}

/// Renderer built on the Poppler command-line utilities.
pub struct PopplerRenderer {
    dpi: u32,
}

impl PopplerRenderer {
    /// Create a renderer rasterizing at the given resolution.
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }
}

impl Default for PopplerRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DPI)
    }
}

impl DocumentRenderer for PopplerRenderer {
    type Doc = OpenedPdf;
    type Error = RenderError;

    fn open(&self, path: &Path, password: &str) -> Result<OpenAttempt<OpenedPdf>, RenderError> {
        let output = Command::new("pdfinfo")
            .arg("-upw")
            .arg(password)
            .arg(path)
            .output()
            .map_err(|e| spawn_error("pdfinfo", e))?;

        if output.status.success() {
            return Ok(OpenAttempt::Opened(OpenedPdf {
                path: path.to_path_buf(),
                password: password.to_string(),
            }));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.to_lowercase().contains("incorrect password") {
            debug!(path = %path.display(), "password rejected");
            return Ok(OpenAttempt::AuthFailed);
        }

        Err(RenderError::Tool {
            tool: "pdfinfo",
            detail: stderr.trim().to_string(),
        })
    }

    fn rasterize(&self, doc: &OpenedPdf) -> Result<Vec<PageImage>, RenderError> {
        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join("page");

        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-upw")
            .arg(&doc.password)
            .arg(&doc.path)
            .arg(&prefix)
            .output()
            .map_err(|e| spawn_error("pdftoppm", e))?;

        if !output.status.success() {
            return Err(RenderError::Tool {
                tool: "pdftoppm",
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // pdftoppm names pages page-1.png, page-2.png, ...; zero-padded when
        // the document has ten or more pages, so a name sort is a page sort.
        let mut page_files: Vec<PathBuf> = fs::read_dir(scratch.path())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        page_files.sort();

        if page_files.is_empty() {
            return Err(RenderError::Tool {
                tool: "pdftoppm",
                detail: "produced no pages".to_string(),
            });
        }

        debug!(pages = page_files.len(), path = %doc.path.display(), "rasterized");

        let mut pages = Vec::with_capacity(page_files.len());
        for file in page_files {
            pages.push(fs::read(file)?);
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dpi() {
        let renderer = PopplerRenderer::default();
        assert_eq!(renderer.dpi, DEFAULT_DPI);
    }

    #[test]
    fn test_open_missing_file_is_error_not_auth_failure() {
        let renderer = PopplerRenderer::default();
        let result = renderer.open(Path::new("/nonexistent/file.pdf"), "");

        // Whatever the environment (tool missing or file missing), a missing
        // artifact must never look like a password rejection.
        assert!(!matches!(result, Ok(OpenAttempt::AuthFailed)));
    }
}
