//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MediaLookup, MetadataError, MetadataSearch};
use crate::category::MediaCategory;

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// TMDB multi-search client.
pub struct TmdbMetadataSearch {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbMetadataSearch {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl MetadataSearch for TmdbMetadataSearch {
    async fn search_multi(&self, query: &str) -> Result<MediaLookup, MetadataError> {
        let url = format!("{}/search/multi", self.base_url);

        debug!("TMDB multi search: query='{}'", query);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", &self.api_key), ("query", &query.to_string())])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(MetadataError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let search_result: TmdbSearchResponse = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse multi search response: {}", e))
        })?;

        Ok(lookup_from_results(&search_result.results))
    }
}

/// Infer a [`MediaLookup`] from a ranked multi-search result list.
///
/// The first entry with a movie or TV media type decides the category;
/// person entries and anything else are skipped. An empty or unclassifiable
/// list yields unknown.
fn lookup_from_results(results: &[TmdbMultiResult]) -> MediaLookup {
    for result in results {
        match result.media_type.as_deref() {
            Some("movie") => {
                return MediaLookup {
                    category: MediaCategory::Movie,
                    external_id: Some(result.id),
                }
            }
            Some("tv") => {
                return MediaLookup {
                    category: MediaCategory::Series,
                    external_id: Some(result.id),
                }
            }
            _ => continue,
        }
    }
    MediaLookup::unknown()
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbMultiResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMultiResult {
    id: u32,
    media_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_prefers_first_classifiable_result() {
        let results = vec![
            TmdbMultiResult {
                id: 7,
                media_type: Some("person".to_string()),
            },
            TmdbMultiResult {
                id: 1396,
                media_type: Some("tv".to_string()),
            },
            TmdbMultiResult {
                id: 603,
                media_type: Some("movie".to_string()),
            },
        ];

        let lookup = lookup_from_results(&results);
        assert_eq!(lookup.category, MediaCategory::Series);
        assert_eq!(lookup.external_id, Some(1396));
    }

    #[test]
    fn test_lookup_movie() {
        let results = vec![TmdbMultiResult {
            id: 603,
            media_type: Some("movie".to_string()),
        }];

        let lookup = lookup_from_results(&results);
        assert_eq!(lookup.category, MediaCategory::Movie);
        assert_eq!(lookup.external_id, Some(603));
    }

    #[test]
    fn test_lookup_empty_results_is_unknown() {
        let lookup = lookup_from_results(&[]);
        assert_eq!(lookup.category, MediaCategory::Unknown);
        assert_eq!(lookup.external_id, None);
    }

    #[test]
    fn test_lookup_unclassifiable_results_is_unknown() {
        let results = vec![
            TmdbMultiResult {
                id: 1,
                media_type: Some("person".to_string()),
            },
            TmdbMultiResult {
                id: 2,
                media_type: None,
            },
        ];

        let lookup = lookup_from_results(&results);
        assert_eq!(lookup, MediaLookup::unknown());
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = TmdbMetadataSearch::new(TmdbConfig {
            api_key: String::new(),
            base_url: None,
        });
        assert!(matches!(result, Err(MetadataError::NotConfigured(_))));
    }
}
