//! Tool configuration from docblocks.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "docblocks.toml";

/// Environment variable overriding `api_url`
pub const API_URL_ENV: &str = "DOCBLOCKS_API_URL";

/// Configuration for talking to the document API and storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the document API
    pub api_url: String,

    /// Storage bucket holding uploaded images
    pub storage_bucket: String,

    /// Timeout for a single API request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            storage_bucket: "document-files".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` - Loaded configuration, missing keys take defaults
    /// * `Err(AppConfigError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| AppConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| AppConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AppConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(AppConfigError::SerializeError)?;

        fs::write(path, content).map_err(|source| AppConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the effective configuration
    ///
    /// An explicit path must exist. Without one, `docblocks.toml` in the
    /// working directory is used when present, defaults otherwise. The
    /// `DOCBLOCKS_API_URL` environment variable wins over both.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, AppConfigError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(CONFIG_FILE_NAME).exists() => Self::load(CONFIG_FILE_NAME)?,
            None => {
                log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Self::default()
            }
        };

        Ok(config.with_api_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Replace `api_url` when an override is given and non-empty
    pub fn with_api_url_override(self, api_url: Option<String>) -> Self {
        match api_url.filter(|url| !url.trim().is_empty()) {
            Some(api_url) => {
                log::debug!("Using API URL from {}: {}", API_URL_ENV, api_url);
                Self { api_url, ..self }
            }
            None => self,
        }
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("IO error for {path}: {source}", path = .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}", path = .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialize error: {0}")]
    SerializeError(#[source] toml::ser::Error),
}
