//! Confnote Oracle Layer
//!
//! Extraction-oracle providers: the external free-text-to-JSON inference
//! services the worker delegates field extraction to.
//!
//! # Providers
//!
//! - `MockOracle`: deterministic mock for testing
//! - `OllamaOracle`: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use confnote_oracle::MockOracle;
//! use confnote_domain::traits::ExtractionOracle;
//!
//! let oracle = MockOracle::new(r#"{"is_cn": "true"}"#);
//! let response = oracle.infer("any prompt").unwrap();
//! assert_eq!(response, r#"{"is_cn": "true"}"#);
//! ```

#![warn(missing_docs)]

pub mod ollama;

use confnote_domain::traits::ExtractionOracle;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaOracle;

/// Errors that can occur during oracle operations.
#[derive(Error, Debug)]
pub enum OracleError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the oracle service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available on the backing service
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Oracle error: {0}")]
    Other(String),
}

/// Mock oracle for deterministic testing.
///
/// Returns a fixed response (or a scripted error) without any network calls,
/// and records every prompt it was handed so tests can assert on prompt
/// contents - for example that truncated text reached the oracle.
///
/// # Examples
///
/// ```
/// use confnote_oracle::MockOracle;
/// use confnote_domain::traits::ExtractionOracle;
///
/// let oracle = MockOracle::new("fixed response");
/// oracle.infer("prompt one").unwrap();
/// assert_eq!(oracle.call_count(), 1);
/// assert_eq!(oracle.prompts()[0], "prompt one");
/// ```
#[derive(Debug, Clone)]
pub struct MockOracle {
    response: String,
    fail_with: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockOracle {
    /// Create a mock that returns the same response for every prompt.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            fail_with: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that fails every call with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: String::new(),
            fail_with: Some(message.into()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of inference calls made so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// All prompts handed to the mock, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ExtractionOracle for MockOracle {
    type Error = OracleError;

    fn infer(&self, prompt: &str) -> Result<String, Self::Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(message) = &self.fail_with {
            return Err(OracleError::Other(message.clone()));
        }
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_oracle_fixed_response() {
        let oracle = MockOracle::new("response");
        assert_eq!(oracle.infer("prompt").unwrap(), "response");
    }

    #[test]
    fn test_mock_oracle_records_prompts() {
        let oracle = MockOracle::new("r");
        oracle.infer("first").unwrap();
        oracle.infer("second").unwrap();

        assert_eq!(oracle.call_count(), 2);
        assert_eq!(oracle.prompts(), vec!["first", "second"]);
    }

    #[test]
    fn test_mock_oracle_failing() {
        let oracle = MockOracle::failing("service down");
        let result = oracle.infer("prompt");
        assert!(matches!(result, Err(OracleError::Other(_))));
        // The failed call is still recorded.
        assert_eq!(oracle.call_count(), 1);
    }

    #[test]
    fn test_mock_oracle_clone_shares_recording() {
        let oracle = MockOracle::new("r");
        let clone = oracle.clone();
        oracle.infer("prompt").unwrap();

        assert_eq!(clone.call_count(), 1);
    }
}
