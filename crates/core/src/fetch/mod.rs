//! HTTP transport with retry and backoff.
//!
//! Thin wrapper over reqwest used by the catalog and manifest clients:
//! network failures and retryable status codes (5xx, 429) are retried with
//! capped exponential backoff; anything else returns immediately. When
//! retries are exhausted, the last response (or the last error) is handed to
//! the caller.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Retry behavior for outbound requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Additional attempts after the first (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff delay in milliseconds (default: 1000).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Backoff ceiling in milliseconds (default: 10000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

/// Errors from the retrying transport.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request body cannot be cloned for a retry (streaming body).
    #[error("request cannot be retried")]
    NotCloneable,

    /// Transport-level failure after all retries.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Retrying executor for reqwest requests.
#[derive(Debug, Clone, Default)]
pub struct FetchClient {
    config: RetryConfig,
}

impl FetchClient {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute the request, retrying transient failures.
    ///
    /// Non-success responses that are not retryable (4xx except 429) are
    /// returned as-is; status handling is the caller's concern.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let mut attempt = 0;
        loop {
            let req = request.try_clone().ok_or(FetchError::NotCloneable)?;
            let last_attempt = attempt >= self.config.max_retries;

            match req.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() || !is_retryable_status(status) || last_attempt {
                        return Ok(response);
                    }
                    debug!(
                        status = status.as_u16(),
                        attempt,
                        "retryable response, backing off"
                    );
                }
                Err(error) => {
                    if last_attempt {
                        return Err(FetchError::Http(error));
                    }
                    debug!(error = %error, attempt, "request failed, backing off");
                }
            }

            tokio::time::sleep(self.backoff_delay(attempt)).await;
            attempt += 1;
        }
    }

    /// Exponential backoff capped at the configured ceiling.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponential = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(16));
        Duration::from_millis(exponential.min(self.config.max_delay_ms))
    }
}

/// Server errors and rate limiting warrant a retry; other statuses do not.
fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
