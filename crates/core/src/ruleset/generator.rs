//! Ruleset generation orchestration.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::patterns::synthesize;
use super::store::RulesetStore;
use super::strategy::detect;
use super::topic_match::match_topic;
use super::types::{default_duration_filter, GeneratedRuleset, Ruleset, ShowMetadata};
use crate::cache::StoreError;
use crate::mediathek::CatalogSearch;
use crate::metrics;

/// Errors from ruleset generation.
///
/// Catalog failures never show up here; the search contract degrades them to
/// zero results, which is a `None` outcome.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Ruleset store failure.
    #[error("ruleset store error: {0}")]
    Store(#[from] StoreError),

    /// A synthesized artifact could not be serialized.
    #[error("failed to serialize ruleset artifact: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Generates (or returns the existing) parsing ruleset for a show.
pub struct RulesetGenerator {
    store: Arc<dyn RulesetStore>,
    catalog: Arc<dyn CatalogSearch>,
}

impl RulesetGenerator {
    pub fn new(store: Arc<dyn RulesetStore>, catalog: Arc<dyn CatalogSearch>) -> Self {
        Self { store, catalog }
    }

    /// Generate a ruleset for the given show.
    ///
    /// Idempotent per external id: once any record exists for the id, it is
    /// returned without touching the catalog again. Returns `None` when the
    /// catalog has no usable results or no candidate topic matches the show's
    /// names - an expected outcome, not an error.
    pub async fn generate(&self, show: &ShowMetadata) -> Result<Option<Ruleset>, GeneratorError> {
        info!(
            media_id = show.external_id,
            name = %show.search_name(),
            "generating ruleset"
        );

        if let Some(existing) = self.store.find_by_media_id(show.external_id)? {
            debug!(topic = %existing.topic, "existing ruleset for media id");
            metrics::GENERATION_OUTCOMES
                .with_label_values(&["existing"])
                .inc();
            return Ok(Some(existing.to_ruleset()));
        }

        let mut results = self.catalog.search_topic(show.search_name()).await;
        debug!(results = results.len(), "catalog search complete");

        if results.is_empty() {
            if let Some(localized) = &show.localized_name {
                if localized != &show.primary_name {
                    debug!(name = %show.primary_name, "retrying search with primary name");
                    results = self.catalog.search_topic(&show.primary_name).await;
                }
            }
        }

        if results.is_empty() {
            debug!("no catalog results for show");
            metrics::GENERATION_OUTCOMES
                .with_label_values(&["no_results"])
                .inc();
            return Ok(None);
        }

        let Some(matched) = match_topic(&results, show) else {
            metrics::GENERATION_OUTCOMES
                .with_label_values(&["no_topic_match"])
                .inc();
            return Ok(None);
        };

        // Topic beats external id as the uniqueness key: an existing record
        // for the matched topic wins even when its media id differs.
        if let Some(existing) = self.store.find_by_topic(&matched.topic)? {
            if existing.media_id != show.external_id {
                warn!(
                    topic = %matched.topic,
                    stored_media_id = existing.media_id,
                    requested_media_id = show.external_id,
                    "topic already mapped to a different media id, keeping stored ruleset"
                );
            }
            metrics::GENERATION_OUTCOMES
                .with_label_values(&["existing"])
                .inc();
            return Ok(Some(existing.to_ruleset()));
        }

        let topic_titles: Vec<&str> = results
            .iter()
            .filter(|item| item.topic == matched.topic)
            .map(|item| item.title.as_str())
            .collect();

        let detection = detect(&topic_titles);
        let patterns = synthesize(&topic_titles, detection.strategy, &matched.topic);

        let record = GeneratedRuleset {
            id: Uuid::new_v4().to_string(),
            topic: matched.topic.clone(),
            media_id: show.external_id,
            show_name: show.primary_name.clone(),
            localized_name: show.localized_name.clone(),
            matching_strategy: detection.strategy,
            filters: serde_json::to_string(&default_duration_filter())?,
            episode_regex: patterns.episode_regex,
            season_regex: patterns.season_regex,
            title_regex_rules: serde_json::to_string(&patterns.title_rules)?,
            created_at: Utc::now(),
        };

        info!(
            topic = %record.topic,
            strategy = ?record.matching_strategy,
            pass = ?matched.pass,
            source = ?patterns.source,
            "creating ruleset"
        );

        let created = self.store.create(&record)?;
        metrics::GENERATION_OUTCOMES
            .with_label_values(&["created"])
            .inc();
        Ok(Some(created.to_ruleset()))
    }
}
