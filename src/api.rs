//! REST client for the renamer backend.
//!
//! `ApiClient` wraps a `reqwest::Client` and the backend base URL and exposes
//! one method per endpoint. Every call is a single request with no retry;
//! callers decide how a failure is surfaced.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::model::{
    Acknowledgement, InventoryItem, RunStatus, SchedulerState, ServerConfig, UpdateDbResponse,
};

/// User agent for API requests
const USER_AGENT: &str = concat!("renamer-dash/", env!("CARGO_PKG_VERSION"));

/// Errors returned by backend calls
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend REST client
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the backend at `base_url` (e.g. `http://127.0.0.1:8000`)
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }
        // Url::join drops the last path segment unless it ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, base })
    }

    /// Backend base URL
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// WebSocket URL of the log feed at `stream_path`
    pub fn log_stream_url(&self, stream_path: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(stream_path)?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| ApiError::InvalidUrl(format!("cannot derive {} URL", scheme)))?;
        Ok(url)
    }

    /// URL of the inventory export download
    pub fn export_url(&self) -> Result<Url, ApiError> {
        self.endpoint("api/export_inventory")
    }

    /// URL of a cover image, from an item's `cover_path` (served under `/files/`)
    pub fn cover_url(&self, cover_path: &str) -> Result<Url, ApiError> {
        self.endpoint(cover_path)
    }

    /// Raw bytes of a cover image
    pub async fn cover(&self, cover_path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(self.cover_url(cover_path)?).send().await?;
        Ok(Self::check(response).await?.bytes().await?.to_vec())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status, body })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_ack(&self, url: Url) -> Result<Acknowledgement, ApiError> {
        let response = Self::check(self.client.post(url).send().await?).await?;
        // Acknowledgement bodies are informational; an unparseable one is still a success
        let value: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);
        Ok(Acknowledgement::from_value(&value))
    }

    /// `GET /api/status`
    pub async fn status(&self) -> Result<RunStatus, ApiError> {
        self.get_json("api/status").await
    }

    /// `GET /api/config`
    pub async fn config(&self) -> Result<ServerConfig, ApiError> {
        self.get_json("api/config").await
    }

    /// `POST /api/config` with the full configuration
    pub async fn save_config(&self, config: &ServerConfig) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("api/config")?)
            .json(config)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `POST /api/start`
    pub async fn start(&self) -> Result<Acknowledgement, ApiError> {
        self.post_ack(self.endpoint("api/start")?).await
    }

    /// `POST /api/stop`
    pub async fn stop(&self) -> Result<Acknowledgement, ApiError> {
        self.post_ack(self.endpoint("api/stop")?).await
    }

    /// `POST /api/update_db`
    pub async fn update_db(&self) -> Result<UpdateDbResponse, ApiError> {
        let response = self
            .client
            .post(self.endpoint("api/update_db")?)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /api/scheduler`
    pub async fn scheduler(&self) -> Result<SchedulerState, ApiError> {
        self.get_json("api/scheduler").await
    }

    /// `POST /api/scheduler?enable={bool}`
    pub async fn set_scheduler(&self, enable: bool) -> Result<Acknowledgement, ApiError> {
        let mut url = self.endpoint("api/scheduler")?;
        url.query_pairs_mut()
            .append_pair("enable", if enable { "true" } else { "false" });
        self.post_ack(url).await
    }

    /// `GET /api/inventory`
    pub async fn inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        let start = std::time::Instant::now();
        let items: Vec<InventoryItem> = self.get_json("api/inventory").await?;
        tracing::info!(
            "Fetched {} inventory items in {:.1}s",
            items.len(),
            start.elapsed().as_secs_f32()
        );
        Ok(items)
    }

    /// Stream the inventory export to `dest`, returning the bytes written.
    ///
    /// Writes to a `.part` file first and renames on success.
    pub async fn download_export(&self, dest: &Path) -> Result<u64, ApiError> {
        let response = self.client.get(self.export_url()?).send().await?;
        let response = Self::check(response).await?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = part_path(dest);
        let mut file = tokio::fs::File::create(&temp_path).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&temp_path, dest).await?;
        tracing::info!("Exported inventory to {:?} ({} bytes)", dest, written);
        Ok(written)
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
