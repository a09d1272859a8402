//! Trainer configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable for the collaborator base URL
pub const ENV_API_URL: &str = "PST_API_URL";
/// Environment variable for the number of scenarios per session
pub const ENV_SESSION_LENGTH: &str = "PST_SESSION_LENGTH";
/// Environment variable for the pass threshold percentage
pub const ENV_PASS_THRESHOLD: &str = "PST_PASS_THRESHOLD";
/// Environment variable for the HTTP request timeout, in seconds
pub const ENV_REQUEST_TIMEOUT: &str = "PST_REQUEST_TIMEOUT_SECS";

/// Session and collaborator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Base URL of the scenario, grading and session service
    pub api_url: String,
    /// Scenarios per session; longer lists are truncated
    pub session_length: usize,
    /// Minimum session percentage that counts as a pass
    pub pass_threshold: u32,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl TrainerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by any `PST_*` variables that are set
    ///
    /// Values that fail to parse are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`TrainerConfig::from_env`] with an injected lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(length) = parse_var(&lookup, ENV_SESSION_LENGTH) {
            config.session_length = length;
        }
        if let Some(threshold) = parse_var(&lookup, ENV_PASS_THRESHOLD) {
            config.pass_threshold = threshold;
        }
        if let Some(secs) = parse_var(&lookup, ENV_REQUEST_TIMEOUT) {
            config.request_timeout_secs = secs;
        }
        config
    }

    /// With collaborator base URL
    #[inline]
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// With session length
    #[inline]
    #[must_use]
    pub fn with_session_length(mut self, length: usize) -> Self {
        self.session_length = length;
        self
    }

    /// With pass threshold
    #[inline]
    #[must_use]
    pub fn with_pass_threshold(mut self, threshold: u32) -> Self {
        self.pass_threshold = threshold;
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Request timeout as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            session_length: 5,
            pass_threshold: 70,
            request_timeout_secs: 30,
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable configuration value");
            None
        }
    }
}
