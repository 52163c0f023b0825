//! Configuration for Tally
//!
//! ## Resolution
//!
//! Settings are layered, later layers win:
//! 1. Built-in defaults
//! 2. Config file (`~/.local/share/tally/config.toml`, or an explicit path)
//! 3. Environment variables (`TALLY_ANALYSIS_URL`, `TALLY_ANALYSIS_TIMEOUT_SECS`)
//!
//! Command-line flags are applied on top by the CLI.
//!
//! ```toml
//! [analysis]
//! url = "https://example.com/analyze"
//! timeout_secs = 20
//! retries = 1
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable for the remote analysis endpoint
pub const ANALYSIS_URL_ENV: &str = "TALLY_ANALYSIS_URL";

/// Environment variable for the remote analysis timeout in seconds
pub const ANALYSIS_TIMEOUT_ENV: &str = "TALLY_ANALYSIS_TIMEOUT_SECS";

/// Remote analysis settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Endpoint that receives uploaded rows. Local analysis when unset.
    pub url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Extra attempts for idempotent GET requests (never applied to POST)
    pub retries: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout: Duration::from_secs(30),
            retries: 1,
        }
    }
}

/// All settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub analysis: AnalysisSettings,
}

impl Settings {
    /// Load from the default config path and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path().as_deref())
    }

    /// Load from an explicit config path (if it exists) and the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                let content = fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                parse_settings(&content)?
            }
            _ => Settings::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply environment overrides through a lookup function
    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ANALYSIS_URL_ENV) {
            self.analysis.url = normalize_url(&url);
        }
        if let Some(secs) = lookup(ANALYSIS_TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ANALYSIS_TIMEOUT_ENV, secs
                ))
            })?;
            self.analysis.timeout = Duration::from_secs(secs);
        }
        Ok(())
    }
}

/// Default config path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config.toml"))
}

/// Blank URLs mean "not configured"
fn normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    analysis: Option<RawAnalysis>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    url: Option<String>,
    timeout_secs: Option<u64>,
    retries: Option<u32>,
}

/// Parse settings from TOML content
fn parse_settings(content: &str) -> Result<Settings> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut settings = Settings::default();

    if let Some(analysis) = raw.analysis {
        if let Some(url) = analysis.url {
            settings.analysis.url = normalize_url(&url);
        }
        if let Some(timeout) = analysis.timeout_secs {
            settings.analysis.timeout = Duration::from_secs(timeout);
        }
        if let Some(retries) = analysis.retries {
            settings.analysis.retries = retries;
        }
    }

    Ok(settings)
}
