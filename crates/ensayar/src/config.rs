//! Harness configuration.
//!
//! Supplies the base URL, default credentials and timing knobs as a plain
//! serde structure. Files are YAML; every field has a default so a partial
//! file (or no file at all) works.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::result::{EnsayarError, EnsayarResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};

/// Default slow-login threshold for the performance-glitch check (5 seconds)
pub const DEFAULT_SLOW_LOGIN_THRESHOLD_MS: u64 = 5_000;

/// Harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Base URL of the site under test
    pub base_url: String,
    /// Default login username
    pub username: String,
    /// Default login password
    pub password: String,
    /// Wait timeout in milliseconds
    pub wait_timeout_ms: u64,
    /// Wait polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Elapsed-login-time threshold for the performance-glitch check.
    ///
    /// This check is a timing diagnostic and depends on the environment;
    /// tune it (or read the outcome with a grain of salt) accordingly.
    pub slow_login_threshold_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.saucedemo.com/".to_string(),
            username: "standard_user".to_string(),
            password: "secret_sauce".to_string(),
            wait_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            slow_login_threshold_ms: DEFAULT_SLOW_LOGIN_THRESHOLD_MS,
        }
    }
}

impl HarnessConfig {
    /// Parse a YAML configuration string.
    ///
    /// # Errors
    ///
    /// Returns [`EnsayarError::Config`] on malformed YAML.
    pub fn from_yaml_str(text: &str) -> EnsayarResult<Self> {
        let config: Self =
            serde_yaml_ng::from_str(text).map_err(|e| EnsayarError::Config {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`EnsayarError::Io`] if the file cannot be read and
    /// [`EnsayarError::Config`] on malformed content.
    pub fn from_file(path: impl AsRef<Path>) -> EnsayarResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Wait options derived from the configured timings
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.wait_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Slow-login threshold as a duration
    #[must_use]
    pub const fn slow_login_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_login_threshold_ms)
    }

    fn validate(&self) -> EnsayarResult<()> {
        if self.base_url.is_empty() {
            return Err(EnsayarError::Config {
                message: "base_url must not be empty".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(EnsayarError::Config {
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
