//! Mock manifest source for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::index::{ManifestError, ManifestSource};
use crate::ruleset::Ruleset;

/// Mock implementation of the [`ManifestSource`] trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable rulesets
/// - Count fetches for staleness/single-flight assertions
/// - Simulate persistent failures and slow fetches
pub struct MockManifestSource {
    /// Configured rulesets to return.
    rulesets: Arc<RwLock<Vec<Ruleset>>>,
    /// Number of fetches performed.
    fetches: Arc<RwLock<usize>>,
    /// When set, every fetch fails with this message until cleared.
    failure: Arc<RwLock<Option<String>>>,
    /// Artificial delay before each fetch returns.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockManifestSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockManifestSource {
    /// Create a new mock with no rulesets.
    pub fn new() -> Self {
        Self {
            rulesets: Arc::new(RwLock::new(Vec::new())),
            fetches: Arc::new(RwLock::new(0)),
            failure: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the rulesets to return for subsequent fetches.
    pub async fn set_rulesets(&self, rulesets: Vec<Ruleset>) {
        *self.rulesets.write().await = rulesets;
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        *self.fetches.read().await
    }

    /// Make every fetch fail with the given message until cleared.
    pub async fn fail_with(&self, message: &str) {
        *self.failure.write().await = Some(message.to_string());
    }

    /// Clear a configured failure.
    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    /// Delay each fetch by the given duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }
}

#[async_trait]
impl ManifestSource for MockManifestSource {
    async fn fetch(&self) -> Result<Vec<Ruleset>, ManifestError> {
        *self.fetches.write().await += 1;

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failure.read().await.clone() {
            return Err(ManifestError::Fetch(message));
        }

        Ok(self.rulesets.read().await.clone())
    }
}
