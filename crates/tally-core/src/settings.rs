//! Settings file for tuning the AI layer
//!
//! Settings are loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the data dir (~/.local/share/tally/config/settings.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Settings never carry credentials and never change which backend is chosen;
//! they only tune model names, the request timeout and the OpenRouter title.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default settings (compiled into binary)
const DEFAULT_SETTINGS: &str = include_str!("../config/settings.toml");

/// Top-level settings file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub ai: AiSettings,
}

/// `[ai]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub openrouter_model: String,
    pub openai_model: String,
    pub request_timeout_secs: u64,
    pub app_title: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            openrouter_model: "gpt-4.1".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            request_timeout_secs: 30,
            app_title: "ExpenseTracker AI".to_string(),
        }
    }
}

impl AiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::parse(DEFAULT_SETTINGS).unwrap_or(Self {
            ai: AiSettings::default(),
        })
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from an explicit file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::NotFound(format!("settings file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Load settings, preferring `path`, then the data-dir override, then defaults
    ///
    /// An explicit path must exist; a missing data-dir override is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match default_settings_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "Loading settings override");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Default override location for the settings file
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("settings.toml"))
}
