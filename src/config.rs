//! SDK configuration
//!
//! Loaded from TOML (all fields optional) and optionally overridden from the
//! environment:
//!
//! ```toml
//! base_url = "https://api.lovejourney.app"
//! api_key = "..."
//! request_timeout_ms = 15000
//! page_size = 12
//! upcoming_window_days = 30
//! ```

use crate::error::{JourneyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const ENV_BASE_URL: &str = "JOURNEY_BASE_URL";
pub const ENV_API_KEY: &str = "JOURNEY_API_KEY";
pub const ENV_TIMEOUT_MS: &str = "JOURNEY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyConfig {
    /// REST backend root (e.g. "https://api.lovejourney.app")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token attached to every backend request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound for each fetch/create/update call
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Records per page in grid views
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Look-ahead window for "upcoming" calendar events and capsules
    #[serde(default = "default_upcoming_window")]
    pub upcoming_window_days: i64,
}

// Defaults
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_timeout_ms() -> u64 {
    15_000
}
fn default_page_size() -> usize {
    12
}
fn default_upcoming_window() -> i64 {
    30
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_ms: default_timeout_ms(),
            page_size: default_page_size(),
            upcoming_window_days: default_upcoming_window(),
        }
    }
}

impl JourneyConfig {
    /// Configuration for the in-memory mock backend (short timeouts)
    pub fn for_mock() -> Self {
        Self {
            base_url: "memory://".to_string(),
            request_timeout_ms: 1_000,
            ..Default::default()
        }
    }

    /// Configuration for interactive pages (fail fast, small pages)
    pub fn for_interactive(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_ms: 8_000,
            page_size: 9,
            ..Default::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            base_url = %config.api_root(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Apply `JOURNEY_*` environment overrides
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            self.api_key = (!key.trim().is_empty()).then_some(key);
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_MS) {
            self.request_timeout_ms = raw.trim().parse().map_err(|_| {
                JourneyError::Config(format!(
                    "{} must be milliseconds, got {:?}",
                    ENV_TIMEOUT_MS, raw
                ))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(JourneyError::Config("base_url must not be empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(JourneyError::Config("request_timeout_ms must be positive".into()));
        }
        if self.page_size == 0 {
            return Err(JourneyError::Config("page_size must be positive".into()));
        }
        if self.upcoming_window_days < 0 {
            return Err(JourneyError::Config("upcoming_window_days must not be negative".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Backend root without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
