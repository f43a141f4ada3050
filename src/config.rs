//! TOML configuration, resolved once at startup.
//!
//! ```toml
//! [panelapp]
//! host = "https://panelapp.genomicsengland.co.uk/api/v1"
//!
//! [cipapi]
//! host = "https://cipapi.genomicsengland.nhs.uk"
//! token = "..."
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::input::cipapi::DEFAULT_CIPAPI_HOST;
use crate::panels::panelapp::DEFAULT_PANELAPP_HOST;

/// Environment variable that takes precedence over `cipapi.token`.
pub const CIPAPI_TOKEN_ENV: &str = "TIERUP_CIPAPI_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing config value: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TierUpConfig {
    #[serde(default)]
    pub panelapp: PanelAppConfig,
    #[serde(default)]
    pub cipapi: CipApiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PanelAppConfig {
    #[serde(default = "default_panelapp_host")]
    pub host: String,
}

impl Default for PanelAppConfig {
    fn default() -> Self {
        Self {
            host: default_panelapp_host(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CipApiConfig {
    #[serde(default = "default_cipapi_host")]
    pub host: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for CipApiConfig {
    fn default() -> Self {
        Self {
            host: default_cipapi_host(),
            token: None,
        }
    }
}

fn default_panelapp_host() -> String {
    DEFAULT_PANELAPP_HOST.to_string()
}

fn default_cipapi_host() -> String {
    DEFAULT_CIPAPI_HOST.to_string()
}

impl TierUpConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// A non-blank override replaces the configured CIP-API token.
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.cipapi.token = Some(token);
        }
        self
    }

    pub fn cipapi_token(&self) -> Result<&str, ConfigError> {
        self.cipapi
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("cipapi.token"))
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
