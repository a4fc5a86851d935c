//! Ruleset manifest sources.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::fetch::{FetchClient, RetryConfig};
use crate::ruleset::Ruleset;

/// Errors fetching a ruleset manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Transport failure after retries.
    #[error("manifest fetch failed: {0}")]
    Fetch(String),

    /// Non-success response.
    #[error("manifest returned HTTP {0}")]
    Status(u16),

    /// Document could not be decoded.
    #[error("failed to parse manifest: {0}")]
    Parse(String),
}

/// Source of the complete ruleset collection.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetch the full collection.
    async fn fetch(&self) -> Result<Vec<Ruleset>, ManifestError>;
}

/// Remote JSON manifest over HTTP with retrying transport.
pub struct HttpManifestSource {
    client: Client,
    fetch: FetchClient,
    url: String,
}

impl HttpManifestSource {
    pub fn new(url: String, retry: RetryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            fetch: FetchClient::new(retry),
            url,
        }
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self) -> Result<Vec<Ruleset>, ManifestError> {
        debug!(url = %self.url, "fetching ruleset manifest");

        let response = self
            .fetch
            .execute(self.client.get(&self.url))
            .await
            .map_err(|e| ManifestError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::Status(status.as_u16()));
        }

        response
            .json::<Vec<Ruleset>>()
            .await
            .map_err(|e| ManifestError::Parse(e.to_string()))
    }
}
