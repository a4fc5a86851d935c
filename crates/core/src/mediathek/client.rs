//! MediathekView API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CatalogItem, CatalogSearch};
use crate::fetch::{FetchClient, RetryConfig};

/// MediathekView API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediathekConfig {
    /// Base URL (default: https://mediathekviewweb.de).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Maximum results per search (default: 50, the API's observed cap).
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
    /// Retry behavior for search requests.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for MediathekConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            result_limit: default_result_limit(),
            retry: RetryConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://mediathekviewweb.de".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_result_limit() -> u32 {
    50
}

/// MediathekView catalog search client.
pub struct MediathekClient {
    client: Client,
    fetch: FetchClient,
    config: MediathekConfig,
}

impl MediathekClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MediathekConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");
        let fetch = FetchClient::new(config.retry.clone());

        Self {
            client,
            fetch,
            config,
        }
    }

    fn build_request_body(&self, query: &str) -> SearchRequest {
        SearchRequest {
            queries: vec![QuerySpec {
                fields: vec!["topic"],
                query: query.to_string(),
            }],
            sort_by: "timestamp",
            sort_order: "desc",
            future: false,
            offset: 0,
            size: self.config.result_limit,
        }
    }
}

#[async_trait]
impl CatalogSearch for MediathekClient {
    async fn search_topic(&self, query: &str) -> Vec<CatalogItem> {
        let url = format!(
            "{}/api/query",
            self.config.base_url.trim_end_matches('/')
        );
        let body = match serde_json::to_string(&self.build_request_body(query)) {
            Ok(body) => body,
            Err(error) => {
                warn!(error = %error, "failed to encode catalog query");
                return Vec::new();
            }
        };

        debug!(query, "searching catalog");

        // The API rejects application/json; it expects the JSON body with a
        // text/plain content type.
        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body);

        let response = match self.fetch.execute(request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, query, "catalog search failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                status = response.status().as_u16(),
                query, "catalog search returned non-success"
            );
            return Vec::new();
        }

        match response.json::<SearchResponse>().await {
            Ok(parsed) => {
                debug!(query, results = parsed.results.len(), "catalog search complete");
                parsed.results
            }
            Err(error) => {
                warn!(error = %error, query, "failed to parse catalog response");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// MediathekView API Request/Response Types (private)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    queries: Vec<QuerySpec>,
    sort_by: &'static str,
    sort_order: &'static str,
    future: bool,
    offset: u32,
    size: u32,
}

#[derive(Debug, Serialize)]
struct QuerySpec {
    fields: Vec<&'static str>,
    query: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CatalogItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let client = MediathekClient::new(MediathekConfig::default());
        let body = serde_json::to_value(client.build_request_body("Tatort")).unwrap();

        assert_eq!(body["queries"][0]["fields"][0], "topic");
        assert_eq!(body["queries"][0]["query"], "Tatort");
        assert_eq!(body["sortBy"], "timestamp");
        assert_eq!(body["sortOrder"], "desc");
        assert_eq!(body["future"], false);
        assert_eq!(body["size"], 50);
    }

    #[test]
    fn test_response_parsing_tolerates_missing_fields() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"results":[{"topic":"Tatort","title":"Tatort - Borowski"}]}"#)
                .unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].topic, "Tatort");
        assert!(parsed.results[0].channel.is_none());

        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.results.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_catalog_degrades_to_empty() {
        let client = MediathekClient::new(MediathekConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            result_limit: 50,
            retry: RetryConfig {
                max_retries: 0,
                base_delay_ms: 1,
                max_delay_ms: 1,
            },
        });

        let results = client.search_topic("Tatort").await;
        assert!(results.is_empty());
    }
}
