//! External metadata search.
//!
//! The classifier needs one thing from the outside world: given a free-text
//! topic, which media type does it most likely name? The [`MetadataSearch`]
//! trait captures that contract; [`TmdbMetadataSearch`] implements it against
//! TMDB's multi-search endpoint.

mod tmdb;

pub use tmdb::{TmdbConfig, TmdbMetadataSearch};

use async_trait::async_trait;
use thiserror::Error;

use crate::category::MediaCategory;

/// Outcome of a multi-type metadata search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaLookup {
    /// Inferred media type of the best-ranked match.
    pub category: MediaCategory,
    /// External identifier of that match, when one exists.
    pub external_id: Option<u32>,
}

impl MediaLookup {
    /// Lookup for a query the service could not classify.
    pub fn unknown() -> Self {
        Self {
            category: MediaCategory::Unknown,
            external_id: None,
        }
    }
}

/// Errors from the metadata search service.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Service credentials missing or rejected.
    #[error("metadata service not configured: {0}")]
    NotConfigured(String),

    /// Service rate limit hit.
    #[error("metadata service rate limit exceeded")]
    RateLimitExceeded,

    /// Non-success response from the service.
    #[error("metadata service error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("failed to parse metadata response: {0}")]
    ParseError(String),

    /// Transport-level failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Multi-type metadata search contract.
#[async_trait]
pub trait MetadataSearch: Send + Sync {
    /// Run a multi-type search and infer the media type of the best match.
    async fn search_multi(&self, query: &str) -> Result<MediaLookup, MetadataError>;
}
