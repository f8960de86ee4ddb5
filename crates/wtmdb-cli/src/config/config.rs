//! `AppConfig` struct and TOML loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default search debounce in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB connection settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Browser defaults.
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Log output settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// TMDB connection settings.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API key. `TMDB_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Response language (e.g. "en-US").
    #[serde(default)]
    pub language: Option<String>,
    /// API base URL override.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Browser defaults.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Quiet period before a typed query is searched.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Initial sort mode ("title", "rating", or "date").
    #[serde(default)]
    pub sort: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            sort: None,
        }
    }
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Log output settings.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// File receiving log output. Logs are discarded when unset.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}
