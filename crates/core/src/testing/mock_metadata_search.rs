//! Mock metadata search for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::metadata::{MediaLookup, MetadataError, MetadataSearch};

/// Mock implementation of the [`MetadataSearch`] trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable lookups per query
/// - Track search queries for assertions
/// - Simulate failures
pub struct MockMetadataSearch {
    /// Configured lookups by query.
    lookups: Arc<RwLock<HashMap<String, MediaLookup>>>,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<String>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<MetadataError>>>,
}

impl Default for MockMetadataSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMetadataSearch {
    /// Create a new mock with no configured lookups; unknown queries resolve
    /// to [`MediaLookup::unknown`].
    pub fn new() -> Self {
        Self {
            lookups: Arc::new(RwLock::new(HashMap::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Configure the lookup returned for a query.
    pub async fn set_lookup(&self, query: &str, lookup: MediaLookup) {
        self.lookups.write().await.insert(query.to_string(), lookup);
    }

    /// Get recorded search queries.
    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<MetadataError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MetadataSearch for MockMetadataSearch {
    async fn search_multi(&self, query: &str) -> Result<MediaLookup, MetadataError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.searches.write().await.push(query.to_string());

        Ok(self
            .lookups
            .read()
            .await
            .get(query)
            .copied()
            .unwrap_or_else(MediaLookup::unknown))
    }
}
