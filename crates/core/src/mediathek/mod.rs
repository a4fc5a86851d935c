//! Public-media catalog search.
//!
//! The ruleset generator needs topic-grouped search results from the
//! MediathekView catalog. [`CatalogSearch`] is the contract it consumes;
//! [`MediathekClient`] implements it against the public API. Catalog
//! failures are never fatal here: a broken search degrades to zero results.

mod client;

pub use client::{MediathekClient, MediathekConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One catalog entry from a topic search. Multiple items share a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Grouping label assigned by the catalog.
    pub topic: String,
    /// Item title as broadcast.
    pub title: String,
    /// Broadcasting channel, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Item duration in seconds, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Unix timestamp of the broadcast, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Catalog topic search contract.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Search the catalog by topic.
    ///
    /// Non-success responses and transport errors degrade to an empty result
    /// set; "no results" is the only failure mode callers see.
    async fn search_topic(&self, query: &str) -> Vec<CatalogItem>;
}
