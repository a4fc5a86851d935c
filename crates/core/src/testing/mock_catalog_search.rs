//! Mock catalog search for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::mediathek::{CatalogItem, CatalogSearch};

/// A query handler that produces results dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<CatalogItem>> + Send + Sync>;

/// Mock implementation of the [`CatalogSearch`] trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable catalog items
/// - Track search queries for assertions
/// - Dynamic per-query results via a handler (useful for fallback scenarios
///   where different queries should return different results)
pub struct MockCatalogSearch {
    /// Configured items to return.
    items: Arc<RwLock<Vec<CatalogItem>>>,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<String>>>,
    /// Query handler for dynamic result generation.
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
}

impl Default for MockCatalogSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogSearch {
    /// Create a new mock with no items.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            query_handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the items to return for subsequent searches.
    pub async fn set_items(&self, items: Vec<CatalogItem>) {
        *self.items.write().await = items;
    }

    /// Get recorded search queries.
    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Set a handler that generates results per query string. Return
    /// `Some(items)` to override the configured items for that query, or
    /// `None` to fall through to them.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<CatalogItem>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }
}

#[async_trait]
impl CatalogSearch for MockCatalogSearch {
    async fn search_topic(&self, query: &str) -> Vec<CatalogItem> {
        self.searches.write().await.push(query.to_string());

        let handler = self.query_handler.read().await;
        if let Some(ref h) = *handler {
            if let Some(handler_items) = h(query) {
                return handler_items;
            }
        }
        drop(handler);

        // Default: filter by query substring in topic or title
        // (case-insensitive); an empty query returns everything.
        let query_lower = query.to_lowercase();
        self.items
            .read()
            .await
            .iter()
            .filter(|item| {
                query_lower.is_empty()
                    || item.topic.to_lowercase().contains(&query_lower)
                    || item.title.to_lowercase().contains(&query_lower)
            })
            .cloned()
            .collect()
    }
}
