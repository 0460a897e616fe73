//! Configuration for the extraction worker

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extraction worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Maximum recognized-text length handed to the oracle (characters).
    ///
    /// Text beyond the budget is cut silently, but the truncation is
    /// recorded on the result so low-confidence extractions stay
    /// distinguishable later.
    pub max_text_chars: usize,

    /// Maximum time for a single oracle call (seconds).
    pub oracle_timeout_secs: u64,
}

impl WorkerConfig {
    /// Get the oracle deadline as a Duration.
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_chars == 0 {
            return Err("max_text_chars must be greater than 0".to_string());
        }
        if self.oracle_timeout_secs == 0 {
            return Err("oracle_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for WorkerConfig {
    /// Defaults matching the operational envelope this pipeline was sized
    /// for: a 4000-character prompt budget and a two-minute oracle deadline.
    fn default() -> Self {
        Self {
            max_text_chars: 4000,
            oracle_timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WorkerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_text_chars, 4000);
    }

    #[test]
    fn test_zero_budget_is_invalid() {
        let config = WorkerConfig {
            max_text_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = WorkerConfig {
            oracle_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = WorkerConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = WorkerConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_text_chars, parsed.max_text_chars);
        assert_eq!(config.oracle_timeout_secs, parsed.oracle_timeout_secs);
    }
}
