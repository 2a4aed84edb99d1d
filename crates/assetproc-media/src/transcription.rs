//! Transcription backend traits and implementations for audio-to-text.

use async_trait::async_trait;
use serde::Deserialize;

use assetproc_core::defaults;
use assetproc_core::{Error, Result};

/// Backend for transcribing a single audio file.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Transcribe audio data. `file_name` is sent as the upload name.
    async fn transcribe(&self, audio_data: &[u8], mime_type: &str, file_name: &str)
        -> Result<String>;

    /// Check if the transcription backend is available.
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// OpenAI-compatible Whisper backend (OpenAI, Speaches, faster-whisper-server).
pub struct WhisperBackend {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl WhisperBackend {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key: None,
            client: reqwest::Client::new(),
            timeout_secs: defaults::TRANSCRIPTION_TIMEOUT_SECS,
        }
    }

    /// Set the bearer token for hosted endpoints.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `WHISPER_BASE_URL` | `http://localhost:8000` | Server URL |
    /// | `WHISPER_MODEL` | `Systran/faster-distil-whisper-large-v3` | Model name |
    /// | `WHISPER_API_KEY` | unset | Bearer token |
    pub fn from_env() -> Self {
        let base_url = std::env::var(defaults::ENV_WHISPER_BASE_URL)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| defaults::DEFAULT_WHISPER_BASE_URL.to_string());
        let model = std::env::var(defaults::ENV_WHISPER_MODEL)
            .unwrap_or_else(|_| defaults::DEFAULT_WHISPER_MODEL.to_string());
        let api_key = std::env::var(defaults::ENV_WHISPER_API_KEY).ok();
        Self::new(base_url, model).with_api_key(api_key)
    }
}

/// OpenAI Whisper API response format.
#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
}

#[async_trait]
impl TranscriptionBackend for WhisperBackend {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        mime_type: &str,
        file_name: &str,
    ) -> Result<String> {
        let url = format!("{}/v1/audio/transcriptions", self.base_url);

        let file_part = reqwest::multipart::Part::bytes(audio_data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| Error::Internal(format!("Failed to create multipart: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let mut request = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(std::time::Duration::from_secs(self.timeout_secs));
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transcription(format!("Transcription request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transcription(format!(
                "Whisper API returned {}: {}",
                status, body
            )));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            Error::Transcription(format!("Failed to parse whisper response: {}", e))
        })?;

        Ok(result.text)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
