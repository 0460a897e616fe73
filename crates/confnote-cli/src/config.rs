//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use confnote_worker::WorkerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ledger database path
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Lookup table (fund houses) path
    #[serde(default = "default_lookup_path")]
    pub lookup_path: PathBuf,

    /// Driving input records path
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Directory artifacts are persisted to
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Mail drop directory scanned for messages
    #[serde(default = "default_mail_dir")]
    pub mail_dir: PathBuf,

    /// Sender address confirmation mail arrives from
    #[serde(default)]
    pub source_email: String,

    /// Maximum recognized-text length handed to the oracle (characters)
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// Rasterization resolution (DPI)
    #[serde(default = "default_render_dpi")]
    pub render_dpi: u32,

    /// OCR language set (tesseract syntax, e.g. "eng" or "eng+deu")
    #[serde(default = "default_ocr_languages")]
    pub ocr_languages: String,

    /// Deadline for one oracle call (seconds)
    #[serde(default = "default_oracle_timeout_secs")]
    pub oracle_timeout_secs: u64,

    /// Oracle service settings
    #[serde(default)]
    pub oracle: OracleConfig,
}

/// Oracle service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Ollama endpoint
    #[serde(default = "default_oracle_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_oracle_model")]
    pub model: String,
}

impl Config {
    /// The default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".confnote").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// With an explicit path the file must exist and parse. Without one, the
    /// default path is read when present and built-in defaults apply
    /// otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path)?;
                Ok(toml::from_str(&contents)?)
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    let contents = fs::read_to_string(&path)?;
                    Ok(toml::from_str(&contents)?)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to the given path.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// The worker-facing slice of this configuration.
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            max_text_chars: self.max_text_chars,
            oracle_timeout_secs: self.oracle_timeout_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_path: default_ledger_path(),
            lookup_path: default_lookup_path(),
            input_path: default_input_path(),
            download_dir: default_download_dir(),
            mail_dir: default_mail_dir(),
            source_email: String::new(),
            max_text_chars: default_max_text_chars(),
            render_dpi: default_render_dpi(),
            ocr_languages: default_ocr_languages(),
            oracle_timeout_secs: default_oracle_timeout_secs(),
            oracle: OracleConfig::default(),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_oracle_endpoint(),
            model: default_oracle_model(),
        }
    }
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("confnote.db")
}

fn default_lookup_path() -> PathBuf {
    PathBuf::from("lookup.toml")
}

fn default_input_path() -> PathBuf {
    PathBuf::from("input.toml")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_mail_dir() -> PathBuf {
    PathBuf::from("mail")
}

fn default_max_text_chars() -> usize {
    4000
}

fn default_render_dpi() -> u32 {
    300
}

fn default_ocr_languages() -> String {
    "eng".to_string()
}

fn default_oracle_timeout_secs() -> u64 {
    120
}

fn default_oracle_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_oracle_model() -> String {
    "llama3".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_text_chars, 4000);
        assert_eq!(config.render_dpi, 300);
        assert_eq!(config.oracle.endpoint, "http://localhost:11434");
        assert!(config.source_email.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.source_email = "confirmations@acme.example".to_string();
        config.max_text_chars = 2000;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.source_email, "confirmations@acme.example");
        assert_eq!(loaded.max_text_chars, 2000);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "source_email = \"a@b.example\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.source_email, "a@b.example");
        assert_eq!(config.max_text_chars, 4000);
        assert_eq!(config.oracle.model, "llama3");
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_worker_config_projection() {
        let mut config = Config::default();
        config.max_text_chars = 123;
        config.oracle_timeout_secs = 7;

        let worker = config.worker_config();
        assert_eq!(worker.max_text_chars, 123);
        assert_eq!(worker.oracle_timeout_secs, 7);
    }
}
