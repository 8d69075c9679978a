//! Admin API client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;

/// Configuration for [`AdminClient`](crate::client::AdminClient)
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminApiConfig {
    /// Control-plane base URL (e.g. "http://localhost:3903")
    pub base_url: String,
    /// Static bearer token carried on every request; rotation is handled
    /// by restarting the console. Never serialized: config dumps and
    /// structured logs must not carry the secret.
    #[serde(skip_serializing)]
    pub token: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retry behavior for transient transport failures
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl AdminApiConfig {
    /// Create a new admin API config
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout_ms: default_timeout_ms(),
            retry: RetryConfig::default(),
        }
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the retry configuration
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Per-request timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl std::fmt::Debug for AdminApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("retry", &self.retry)
            .finish()
    }
}
