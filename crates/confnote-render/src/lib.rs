//! Confnote Render Layer
//!
//! Document-renderer and text-recognizer adapters. Rendering and OCR are
//! external collaborators: this crate reaches them as external processes
//! (Poppler's `pdfinfo`/`pdftoppm` and the `tesseract` CLI) so the core
//! stays free of native library bindings.
//!
//! # Adapters
//!
//! - `PopplerRenderer`: opens password-protected PDFs and rasterizes pages
//! - `TesseractRecognizer`: OCR over rasterized page images
//! - `MockRenderer` / `MockRecognizer`: deterministic mocks for testing

#![warn(missing_docs)]

pub mod mock;
pub mod poppler;
pub mod tesseract;

pub use mock::{MockRecognizer, MockRenderer};
pub use poppler::PopplerRenderer;
pub use tesseract::TesseractRecognizer;

use thiserror::Error;

/// Errors from the render and recognize adapters.
///
/// Password rejection is not an error; it is reported through
/// [`confnote_domain::traits::OpenAttempt::AuthFailed`].
#[derive(Error, Debug)]
pub enum RenderError {
    /// The external tool binary is not installed or not on PATH
    #[error("External tool not found: {0} (is it installed?)")]
    MissingTool(&'static str),

    /// The external tool ran but reported failure
    #[error("{tool} failed: {detail}")]
    Tool {
        /// Which tool failed
        tool: &'static str,
        /// Trimmed stderr from the tool
        detail: String,
    },

    /// I/O error around scratch files or tool output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn spawn_error(tool: &'static str, e: std::io::Error) -> RenderError {
    if e.kind() == std::io::ErrorKind::NotFound {
        RenderError::MissingTool(tool)
    } else {
        RenderError::Io(e)
    }
}
