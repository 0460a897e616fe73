//! Deterministic renderer and recognizer mocks for testing

use crate::RenderError;
use confnote_domain::traits::{DocumentRenderer, OpenAttempt, PageImage, TextRecognizer};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Scripted in-memory renderer.
///
/// Records every password attempted, in order, so tests can assert the
/// credential trial sequence.
///
/// # Examples
///
/// ```
/// use confnote_render::MockRenderer;
/// use confnote_domain::traits::{DocumentRenderer, OpenAttempt};
/// use std::path::Path;
///
/// let renderer = MockRenderer::protected("pw2", vec![vec![1, 2, 3]]);
/// assert!(matches!(
///     renderer.open(Path::new("a.pdf"), "wrong").unwrap(),
///     OpenAttempt::AuthFailed
/// ));
/// assert!(matches!(
///     renderer.open(Path::new("a.pdf"), "pw2").unwrap(),
///     OpenAttempt::Opened(_)
/// ));
/// assert_eq!(renderer.attempts(), vec!["wrong", "pw2"]);
/// ```
#[derive(Debug, Clone)]
pub struct MockRenderer {
    accepts: Option<String>,
    pages: Vec<PageImage>,
    rasterize_fails: bool,
    attempts: Arc<Mutex<Vec<String>>>,
}

impl MockRenderer {
    /// A document that opens with the empty password.
    pub fn unprotected(pages: Vec<PageImage>) -> Self {
        Self {
            accepts: Some(String::new()),
            pages,
            rasterize_fails: false,
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A document that opens only with the given password.
    pub fn protected(password: impl Into<String>, pages: Vec<PageImage>) -> Self {
        Self {
            accepts: Some(password.into()),
            pages,
            rasterize_fails: false,
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A document no password opens.
    pub fn unreadable() -> Self {
        Self {
            accepts: None,
            pages: Vec::new(),
            rasterize_fails: false,
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A document that opens unprotected but fails to rasterize.
    pub fn broken_pages() -> Self {
        Self {
            accepts: Some(String::new()),
            pages: Vec::new(),
            rasterize_fails: true,
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every password attempted so far, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

impl DocumentRenderer for MockRenderer {
    type Doc = Vec<PageImage>;
    type Error = RenderError;

    fn open(&self, _path: &Path, password: &str) -> Result<OpenAttempt<Self::Doc>, RenderError> {
        self.attempts.lock().unwrap().push(password.to_string());

        match &self.accepts {
            Some(accepted) if accepted == password => Ok(OpenAttempt::Opened(self.pages.clone())),
            _ => Ok(OpenAttempt::AuthFailed),
        }
    }

    fn rasterize(&self, doc: &Self::Doc) -> Result<Vec<PageImage>, RenderError> {
        if self.rasterize_fails {
            return Err(RenderError::Tool {
                tool: "pdftoppm",
                detail: "produced no pages".to_string(),
            });
        }
        Ok(doc.clone())
    }
}

/// Scripted recognizer returning fixed text, empty text, or an error.
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    text: Option<String>,
}

impl MockRecognizer {
    /// A recognizer returning the same text for any input.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// A recognizer that fails every call.
    pub fn failing() -> Self {
        Self { text: None }
    }
}

impl TextRecognizer for MockRecognizer {
    type Error = RenderError;

    fn recognize(&self, _pages: &[PageImage]) -> Result<String, RenderError> {
        match &self.text {
            Some(text) => Ok(text.clone()),
            None => Err(RenderError::Tool {
                tool: "tesseract",
                detail: "mock failure".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_mock_records_attempts_in_order() {
        let renderer = MockRenderer::protected("secret", vec![vec![0u8]]);
        let path = Path::new("doc.pdf");

        assert!(matches!(
            renderer.open(path, "").unwrap(),
            OpenAttempt::AuthFailed
        ));
        assert!(matches!(
            renderer.open(path, "secret").unwrap(),
            OpenAttempt::Opened(_)
        ));
        assert_eq!(renderer.attempts(), vec!["", "secret"]);
    }

    #[test]
    fn test_unreadable_mock_rejects_everything() {
        let renderer = MockRenderer::unreadable();
        for password in ["", "a", "b"] {
            assert!(matches!(
                renderer.open(Path::new("doc.pdf"), password).unwrap(),
                OpenAttempt::AuthFailed
            ));
        }
    }

    #[test]
    fn test_broken_pages_fails_rasterize_only() {
        let renderer = MockRenderer::broken_pages();
        let doc = match renderer.open(Path::new("doc.pdf"), "").unwrap() {
            OpenAttempt::Opened(doc) => doc,
            OpenAttempt::AuthFailed => panic!("expected open"),
        };
        assert!(renderer.rasterize(&doc).is_err());
    }
}
