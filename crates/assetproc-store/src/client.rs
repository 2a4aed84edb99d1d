//! reqwest-backed [`AssetStore`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Response, StatusCode};
use serde_json::json;
use tracing::{debug, trace};

use assetproc_core::defaults;
use assetproc_core::{Asset, AssetStore, Error, JobUpdate, Result};

use crate::config::StoreConfig;

/// Client for the web application's service API.
#[derive(Debug, Clone)]
pub struct HttpAssetStore {
    config: StoreConfig,
    client: reqwest::Client,
}

impl HttpAssetStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Create from environment variables. See [`StoreConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    async fn patch_job(&self, job_id: &str, body: &serde_json::Value) -> Result<()> {
        let response = self
            .client
            .patch(self.config.url(defaults::JOB_ROUTE))
            .query(&[("jobId", job_id)])
            .bearer_auth(&self.config.server_api_key)
            .json(body)
            .timeout(self.api_timeout())
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Check whether the API answers at all. Any HTTP response counts.
    pub async fn health_check(&self) -> Result<bool> {
        match self
            .client
            .get(self.config.url(defaults::JOB_ROUTE))
            .bearer_auth(&self.config.server_api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(!resp.status().is_server_error()),
            Err(_) => Ok(false),
        }
    }
}

/// Turn a non-2xx response into [`Error::Api`].
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn fetch_asset(&self, asset_id: &str) -> Result<Option<Asset>> {
        let response = self
            .client
            .get(self.config.url(defaults::ASSET_ROUTE))
            .query(&[("assetId", asset_id)])
            .bearer_auth(&self.config.server_api_key)
            .timeout(self.api_timeout())
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(asset_id, "Asset not found");
            return Ok(None);
        }

        let body = ensure_success(response).await?.text().await?;
        // The route answers `null` for unknown ids on some deployments.
        let asset: Option<Asset> = serde_json::from_str(&body)?;
        Ok(asset)
    }

    async fn fetch_asset_file(&self, file_url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(file_url)
            .timeout(Duration::from_secs(defaults::FILE_DOWNLOAD_TIMEOUT_SECS))
            .send()
            .await?;

        let bytes = ensure_success(response).await?.bytes().await?;
        debug!(byte_len = bytes.len(), "Downloaded asset file");
        Ok(bytes.to_vec())
    }

    async fn update_asset_content(&self, asset_id: &str, content: &str) -> Result<()> {
        let response = self
            .client
            .patch(self.config.url(defaults::ASSET_ROUTE))
            .query(&[("assetId", asset_id)])
            .bearer_auth(&self.config.server_api_key)
            .json(&json!({ "content": content }))
            .timeout(self.api_timeout())
            .send()
            .await?;

        ensure_success(response).await?;
        debug!(asset_id, content_len = content.len(), "Updated asset content");
        Ok(())
    }

    async fn update_job_details(&self, job_id: &str, update: &JobUpdate) -> Result<()> {
        let body = serde_json::to_value(update)?;
        self.patch_job(job_id, &body).await?;
        debug!(job_id, status = ?update.status, "Updated job details");
        Ok(())
    }

    async fn update_job_heartbeat(&self, job_id: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.patch_job(job_id, &json!({ "lastHeartBeat": now }))
            .await?;
        trace!(job_id, "Heartbeat recorded");
        Ok(())
    }
}
