//! Runtime configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::DEFAULT_EXPORT_FILE_NAME;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Front-end settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Path to the classifier artifact (JSON)
    pub model_path: PathBuf,
    /// Suggested file name for result downloads
    pub export_file_name: String,
    /// `tracing` env-filter directive
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("svm_model.json"),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            log_filter: "pulse_predict=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }
}
