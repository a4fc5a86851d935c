//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Cache-aside resolution (hits/misses per collection)
//! - Ruleset generation outcomes
//! - Ruleset index refreshes

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts, Registry};

/// Cache-aside lookups by collection and result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mediarr_cache_lookups_total", "Cache-aside lookups"),
        &["collection", "result"], // result: "hit", "miss"
    )
    .unwrap()
});

/// Ruleset generation outcomes.
pub static GENERATION_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "mediarr_ruleset_generation_total",
            "Ruleset generation outcomes",
        ),
        &["result"], // "existing", "created", "no_results", "no_topic_match"
    )
    .unwrap()
});

/// Ruleset index refreshes by source.
pub static INDEX_REFRESHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "mediarr_index_refreshes_total",
            "Ruleset index refreshes by source",
        ),
        &["source"], // "remote", "snapshot", "failed"
    )
    .unwrap()
});

/// Register all core metrics with a registry.
pub fn register_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(CACHE_LOOKUPS.clone()))?;
    registry.register(Box::new(GENERATION_OUTCOMES.clone()))?;
    registry.register(Box::new(INDEX_REFRESHES.clone()))?;
    Ok(())
}
