//! Cache-backed topic classifier.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::{MediaCategory, TopicCategoryRecord};
use crate::cache::{CacheError, KeyValueStore, ResolutionCache, StoreError};
use crate::metadata::{MetadataError, MetadataSearch};

/// Errors from topic classification.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Category store failure.
    #[error("category store error: {0}")]
    Store(#[from] StoreError),

    /// The metadata search failed for an uncached topic. No retries at this
    /// layer; transient failures surface to the caller.
    #[error("metadata search failed: {0}")]
    Metadata(#[from] MetadataError),
}

impl From<CacheError<MetadataError>> for ClassifyError {
    fn from(err: CacheError<MetadataError>) -> Self {
        match err {
            CacheError::Store(e) => ClassifyError::Store(e),
            CacheError::Resolver(e) => ClassifyError::Metadata(e),
        }
    }
}

/// Resolves catalog topics to a media category.
///
/// Cache-aside over the category store: a hit returns the stored verdict, a
/// miss runs a multi-type metadata search and persists the result.
pub struct CategoryClassifier {
    cache: ResolutionCache<TopicCategoryRecord>,
    metadata: Arc<dyn MetadataSearch>,
}

impl CategoryClassifier {
    pub fn new(
        store: Arc<dyn KeyValueStore<TopicCategoryRecord>>,
        metadata: Arc<dyn MetadataSearch>,
    ) -> Self {
        Self {
            cache: ResolutionCache::new("topic_categories", store),
            metadata,
        }
    }

    /// Classify a single topic.
    ///
    /// Blank topics are `Unknown` without touching the store.
    pub async fn classify(&self, topic: &str) -> Result<MediaCategory, ClassifyError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Ok(MediaCategory::Unknown);
        }

        let metadata = Arc::clone(&self.metadata);
        let record = self
            .cache
            .resolve(topic, move |key| async move {
                let lookup = metadata.search_multi(&key).await?;
                Ok(TopicCategoryRecord {
                    topic: key,
                    category: lookup.category,
                    external_id: lookup.external_id,
                })
            })
            .await?;

        Ok(record.category)
    }

    /// Classify a batch of topics.
    ///
    /// Blank topics are dropped before deduplication. All cached verdicts are
    /// collected in one store query before any metadata search is issued, and
    /// at most one search runs per distinct uncached topic.
    pub async fn classify_batch(
        &self,
        topics: &[String],
    ) -> Result<HashMap<String, MediaCategory>, ClassifyError> {
        let keys: Vec<String> = topics
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        debug!(topics = keys.len(), "classifying topic batch");

        let metadata = Arc::clone(&self.metadata);
        let records = self
            .cache
            .resolve_many(&keys, move |key| {
                let metadata = Arc::clone(&metadata);
                async move {
                    let lookup = metadata.search_multi(&key).await?;
                    Ok(TopicCategoryRecord {
                        topic: key,
                        category: lookup.category,
                        external_id: lookup.external_id,
                    })
                }
            })
            .await?;

        Ok(records
            .into_iter()
            .map(|(topic, record)| (topic, record.category))
            .collect())
    }
}
