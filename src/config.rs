//! Client configuration.
//!
//! Values come from three layers, lowest precedence first:
//!
//! 1. Built-in defaults ([`DEFAULT_BASE_URL`], [`DEFAULT_API_KEY_PATH`])
//! 2. An optional YAML file
//! 3. Command-line flags and environment variables (applied by the binary)
//!
//! ```yaml
//! base_url: https://monitoring.bbc.co.uk/api/v0/
//! api_key_path: /etc/bbc_monitoring/api_key.json
//! ```

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://monitoring.bbc.co.uk/api/v0/";
pub const DEFAULT_API_KEY_PATH: &str = "data/api_key.json";

/// Where the API lives and where the login is stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root. A missing trailing `/` is added before use.
    pub base_url: String,
    /// JSON credentials file, see [`crate::credentials`].
    pub api_key_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_path: PathBuf::from(DEFAULT_API_KEY_PATH),
        }
    }
}

impl ClientConfig {
    /// Load a YAML config file. Missing keys keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ApiError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw).map_err(|source| ApiError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!(base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        // an empty file deserializes to unit, not a mapping
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Override fields that were given explicitly.
    pub fn with_overrides(mut self, base_url: Option<String>, api_key_path: Option<PathBuf>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(api_key_path) = api_key_path {
            self.api_key_path = api_key_path;
        }
        self
    }

    /// The base URL, normalized and parsed.
    pub fn base_url(&self) -> Result<Url, ApiError> {
        normalize_base_url(&self.base_url)
    }
}

/// Parse a base URL, making sure it ends with `/`.
///
/// Without the trailing slash `Url::join` would replace the last path
/// segment instead of appending to it (`.../api/v0` + `login/` gives
/// `.../api/login/`).
pub fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Ok(Url::parse(&raw)?)
}
