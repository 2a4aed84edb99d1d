//! Configuration for the store API client.

use std::fmt;

use assetproc_core::defaults;
use assetproc_core::{Error, Result};

/// Connection settings for the store API.
#[derive(Clone)]
pub struct StoreConfig {
    /// Base URL of the web application, without trailing slash.
    pub api_base_url: String,
    /// Bearer token accepted by the service-only routes.
    pub server_api_key: String,
    /// Timeout for API requests (not file downloads).
    pub timeout_secs: u64,
}

impl StoreConfig {
    pub fn new(api_base_url: impl Into<String>, server_api_key: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            server_api_key: server_api_key.into(),
            timeout_secs: defaults::API_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `API_BASE_URL` | required | Web application base URL |
    /// | `SERVER_API_KEY` | required | Service bearer token |
    /// | `API_TIMEOUT_SECS` | `30` | Per-request timeout |
    pub fn from_env() -> Result<Self> {
        let api_base_url = required_env(defaults::ENV_API_BASE_URL)?;
        let server_api_key = required_env(defaults::ENV_SERVER_API_KEY)?;

        let timeout_secs = std::env::var(defaults::ENV_API_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::API_TIMEOUT_SECS)
            .max(1);

        Ok(Self::new(api_base_url, server_api_key).with_timeout_secs(timeout_secs))
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Absolute URL for a route relative to the API base.
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.api_base_url, route)
    }
}

// The API key must never end up in logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_base_url", &self.api_base_url)
            .field("server_api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Config(format!("{} is not set", name))),
    }
}
