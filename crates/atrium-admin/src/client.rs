//! Reqwest-based client for the control-plane admin API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::AdminApiConfig;
use crate::error::{AdminError, Result};
use crate::types::{BucketInfo, KeyInfo};

/// Tracing target for admin API client operations
pub const TRACING_TARGET: &str = "atrium_admin::client";

/// Typed access to the control-plane operations the console depends on.
///
/// The credential broker and the test suites depend on this seam rather
/// than on a concrete HTTP client.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Look up a bucket by global alias, including its key grants
    async fn bucket_info_by_global_alias(
        &self,
        alias: &str,
        cancel: &CancellationToken,
    ) -> Result<BucketInfo>;

    /// Look up an access key, optionally revealing its secret
    async fn key_info(
        &self,
        key_id: &str,
        show_secret: bool,
        cancel: &CancellationToken,
    ) -> Result<KeyInfo>;
}

/// JSON-over-HTTP client for the control-plane admin API.
///
/// Every request carries the configured bearer token and is routed through
/// the retry executor: transport failures are retried with backoff, while
/// any received response — success or error status — is handled exactly
/// once.
pub struct AdminClient {
    http: reqwest::Client,
    config: AdminApiConfig,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Create a new admin API client
    pub fn new(config: AdminApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AdminError::configuration(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            "created admin API client"
        );

        Ok(Self { http, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &AdminApiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Url> {
        let base = self.config.base_url.trim_end_matches('/');
        reqwest::Url::parse_with_params(&format!("{base}{path}"), params)
            .map_err(|e| AdminError::configuration(format!("invalid admin API URL: {e}")))
    }

    /// Issue one GET and classify the outcome. Transport failures surface
    /// as retryable errors; a received response of any status is terminal.
    async fn fetch<T: DeserializeOwned>(&self, url: reqwest::Url) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(AdminError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(AdminError::from)?;

        if !status.is_success() {
            return Err(AdminError::Rejection {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| AdminError::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn bucket_info_by_global_alias(
        &self,
        alias: &str,
        cancel: &CancellationToken,
    ) -> Result<BucketInfo> {
        let url = self.endpoint("/v1/bucket", &[("globalAlias", alias)])?;
        self.config
            .retry
            .run(cancel, "bucket_info", || self.fetch(url.clone()))
            .await
    }

    async fn key_info(
        &self,
        key_id: &str,
        show_secret: bool,
        cancel: &CancellationToken,
    ) -> Result<KeyInfo> {
        let show = if show_secret { "true" } else { "false" };
        let url = self.endpoint("/v1/key", &[("id", key_id), ("showSecretKey", show)])?;
        self.config
            .retry
            .run(cancel, "key_info", || self.fetch(url.clone()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_query_params() {
        let client = AdminClient::new(AdminApiConfig::new("http://localhost:3903/", "t"))
            .expect("client");

        let url = client
            .endpoint("/v1/bucket", &[("globalAlias", "my photos")])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:3903/v1/bucket?globalAlias=my+photos"
        );
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client = AdminClient::new(AdminApiConfig::new("http://localhost:3903", "token123"))
            .expect("client");
        let debug = format!("{client:?}");
        assert!(!debug.contains("token123"), "token leaked: {debug}");
    }
}
