//! Typed facade over the recording service's HTTP surface.
//!
//! One method per server capability.  Each method issues exactly one request
//! and resolves with the parsed body — no retries, no timeouts, no backoff,
//! no caching.  Failure is surfaced verbatim to the caller, split into two
//! channels: transport faults, and domain failures (a transported response
//! whose payload carries an `error` field — the service reports those with
//! both 2xx and 4xx/5xx statuses, so the body is checked before the status).

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::protocol::{
    AuthInit, Channel, Recording, ServiceStatus, Settings, UploadOutcome, UploadRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed: connect/IO fault, or the body could not
    /// be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response arrived but did not decode as the expected shape.
    #[error("unexpected response body: {0}")]
    Payload(#[from] serde_json::Error),
    /// The service answered with a logical error message.
    #[error("{0}")]
    Domain(String),
}

impl ApiError {
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the body once, surface a payload-level `error` as a domain
    /// failure, then decode the expected type.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let bytes = resp.bytes().await?;
        if let Ok(probe) = serde_json::from_slice::<serde_json::Value>(&bytes) {
            if let Some(err) = probe.get("error").and_then(|e| e.as_str()) {
                return Err(ApiError::Domain(err.to_string()));
            }
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Like [`Self::decode`] for endpoints whose ack body the panel discards.
    async fn ack(resp: reqwest::Response) -> Result<(), ApiError> {
        Self::decode::<serde_json::Value>(resp).await.map(|_| ())
    }

    pub async fn status(&self) -> Result<ServiceStatus, ApiError> {
        let resp = self.http.get(self.url("/api/status")).send().await?;
        Self::decode(resp).await
    }

    pub async fn toggle_service(&self) -> Result<(), ApiError> {
        debug!("toggle service");
        let resp = self
            .http
            .post(self.url("/api/service/toggle"))
            .send()
            .await?;
        Self::ack(resp).await
    }

    pub async fn channels(&self) -> Result<Vec<Channel>, ApiError> {
        let resp = self.http.get(self.url("/api/channels")).send().await?;
        Self::decode(resp).await
    }

    pub async fn add_channel(&self, name: &str) -> Result<(), ApiError> {
        debug!(channel = name, "add channel");
        let resp = self
            .http
            .post(self.url("/api/channels"))
            .json(&serde_json::json!({ "channel": name }))
            .send()
            .await?;
        Self::ack(resp).await
    }

    pub async fn delete_channel(&self, name: &str) -> Result<(), ApiError> {
        debug!(channel = name, "delete channel");
        let resp = self
            .http
            .delete(self.url(&format!("/api/channels/{}", name)))
            .send()
            .await?;
        Self::ack(resp).await
    }

    pub async fn toggle_channel(&self, name: &str) -> Result<(), ApiError> {
        debug!(channel = name, "toggle channel");
        let resp = self
            .http
            .post(self.url(&format!("/api/channels/toggle/{}", name)))
            .send()
            .await?;
        Self::ack(resp).await
    }

    pub async fn recordings(&self) -> Result<Vec<Recording>, ApiError> {
        let resp = self.http.get(self.url("/api/recordings")).send().await?;
        Self::decode(resp).await
    }

    pub async fn stop_recording(&self, channel: &str) -> Result<(), ApiError> {
        debug!(channel, "stop recording");
        let resp = self
            .http
            .post(self.url(&format!("/api/recording/stop/{}", channel)))
            .send()
            .await?;
        Self::ack(resp).await
    }

    pub async fn delete_recording(&self, filename: &str) -> Result<(), ApiError> {
        debug!(filename, "delete recording");
        let resp = self
            .http
            .delete(self.url(&format!("/api/recording/{}", filename)))
            .send()
            .await?;
        Self::ack(resp).await
    }

    pub async fn settings(&self) -> Result<Settings, ApiError> {
        let resp = self.http.get(self.url("/api/settings")).send().await?;
        Self::decode(resp).await
    }

    pub async fn update_settings(&self, settings: &Settings) -> Result<(), ApiError> {
        debug!("update settings");
        let resp = self
            .http
            .post(self.url("/api/settings"))
            .json(settings)
            .send()
            .await?;
        Self::ack(resp).await
    }

    pub async fn init_youtube_auth(&self, client_secrets: &str) -> Result<AuthInit, ApiError> {
        debug!("init youtube auth");
        let resp = self
            .http
            .post(self.url("/api/auth/youtube/init"))
            .json(&serde_json::json!({ "client_secrets": client_secrets }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn upload(&self, req: &UploadRequest) -> Result<UploadOutcome, ApiError> {
        debug!(
            filename = req.filename(),
            target = req.target_label(),
            "dispatch upload"
        );
        let resp = self
            .http
            .post(self.url(req.endpoint()))
            .json(req)
            .send()
            .await?;
        Self::decode(resp).await
    }
}
