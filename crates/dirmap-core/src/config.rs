//! Configuration management for dirmap.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".dirmap.toml";

/// dirmap configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub-specific settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Retry/backoff settings for API requests.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if file can't be read, parsed, or holds unusable values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check that the values can drive a client.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        self.retry.validate()?;
        if self.github.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "github.request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// GitHub-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Custom API URL for GitHub Enterprise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// OAuth token. Prefer the environment or `gh auth token` over storing it here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl GitHubConfig {
    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            oauth_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

const fn default_request_timeout_secs() -> u64 {
    30
}

/// Retry/backoff settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound for any single delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Fraction of the delay added as random jitter (0.0 to 1.0).
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

impl RetryConfig {
    /// Delay before the second attempt.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Upper bound for any single delay.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Check the retry values.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(Error::InvalidConfig(format!(
                "retry.jitter_factor must be between 0.0 and 1.0, got {}",
                self.jitter_factor
            )));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(Error::InvalidConfig(format!(
                "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.base_delay_ms, self.max_delay_ms
            )));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_base_delay_ms() -> u64 {
    1_000
}

const fn default_max_delay_ms() -> u64 {
    60_000
}

const fn default_jitter_factor() -> f64 {
    0.1
}
