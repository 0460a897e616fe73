//! Ollama Oracle Implementation
//!
//! Integration with a local Ollama instance. Running the extraction model
//! locally keeps confirmation-note contents off third-party services.
//!
//! # Features
//!
//! - HTTP communication with the Ollama generate API
//! - Configurable endpoint and model identifier
//! - Retry logic with exponential backoff
//! - Timeout handling

use crate::OracleError;
use confnote_domain::traits::ExtractionOracle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for a single HTTP request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama-backed extraction oracle.
pub struct OllamaOracle {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from the Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaOracle {
    /// Create a new Ollama oracle.
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: model identifier (e.g., "llama3")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create an oracle against the default local endpoint.
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of retry attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Run inference against the Ollama API.
    ///
    /// # Errors
    ///
    /// Returns an error if Ollama is not running, the model is not
    /// available, communication fails, or the response body is malformed.
    pub async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        match response.json::<OllamaGenerateResponse>().await {
                            Ok(body) => return Ok(body.response),
                            Err(e) => {
                                return Err(OracleError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                )));
                            }
                        }
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(OracleError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(OracleError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(OracleError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| OracleError::Communication("Max retries exceeded".to_string())))
    }
}

impl ExtractionOracle for OllamaOracle {
    type Error = OracleError;

    fn infer(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper; the worker drives this through spawn_blocking.
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async { self.generate(prompt).await })
    }
}
