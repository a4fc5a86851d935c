//! In-memory, topic-keyed view over all known rulesets.
//!
//! The index is rebuilt wholesale from a remote manifest (with a local
//! snapshot file as fallback) and answers topic lookups at query time.
//! Readers never observe a partially rebuilt mapping: the new one is
//! published in a single swap under the write lock. Initial loading is
//! single-flight - the first caller starts it, concurrent callers await the
//! same outcome, and a failed load stays retryable.

mod clock;
mod manifest;

pub use clock::{Clock, SystemClock};
pub use manifest::{HttpManifestSource, ManifestError, ManifestSource};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::metrics;
use crate::ruleset::Ruleset;

/// Ruleset index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesetIndexConfig {
    /// Remote manifest URL.
    #[serde(default = "default_manifest_url")]
    pub manifest_url: String,
    /// Local snapshot file, the fallback source of the same document.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Staleness interval in seconds (default: 1 hour).
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for RulesetIndexConfig {
    fn default() -> Self {
        Self {
            manifest_url: default_manifest_url(),
            snapshot_path: default_snapshot_path(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

fn default_manifest_url() -> String {
    "https://raw.githubusercontent.com/lelloman/mediarr-rulesets/main/data/rulesets.json"
        .to_string()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/rulesets.json")
}

fn default_refresh_interval_secs() -> u64 {
    60 * 60
}

/// Errors from index loading.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Both the remote manifest and the local snapshot failed; the previous
    /// index state is retained.
    #[error("ruleset load failed: remote: {remote}; snapshot: {snapshot}")]
    LoadFailed { remote: String, snapshot: String },

    /// The single-flight initial load failed.
    #[error("initial ruleset load failed: {0}")]
    InitFailed(String),
}

#[derive(Default)]
struct IndexState {
    by_topic: HashMap<String, Vec<Ruleset>>,
    last_refresh: Option<DateTime<Utc>>,
}

type LoadOutcome = Option<Result<(), String>>;

/// Process-wide topic → rulesets mapping with periodic refresh.
pub struct RulesetIndex {
    manifest: Arc<dyn ManifestSource>,
    snapshot_path: PathBuf,
    refresh_interval: Duration,
    clock: Arc<dyn Clock>,
    state: RwLock<IndexState>,
    in_flight: Mutex<Option<watch::Receiver<LoadOutcome>>>,
}

impl RulesetIndex {
    pub fn new(
        config: RulesetIndexConfig,
        manifest: Arc<dyn ManifestSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            manifest,
            snapshot_path: config.snapshot_path,
            refresh_interval: Duration::seconds(config.refresh_interval_secs as i64),
            clock,
            state: RwLock::new(IndexState::default()),
            in_flight: Mutex::new(None),
        }
    }

    /// Fetch the full ruleset collection and rebuild the index wholesale.
    ///
    /// Remote failure falls back to the local snapshot; when both fail the
    /// previous state (possibly empty, possibly stale) is retained.
    pub async fn load(&self) -> Result<(), IndexError> {
        let rulesets = match self.manifest.fetch().await {
            Ok(rulesets) => {
                info!(count = rulesets.len(), "loaded rulesets from remote manifest");
                metrics::INDEX_REFRESHES.with_label_values(&["remote"]).inc();
                rulesets
            }
            Err(remote_error) => {
                warn!(
                    error = %remote_error,
                    "remote manifest fetch failed, falling back to snapshot"
                );
                match self.load_snapshot().await {
                    Ok(rulesets) => {
                        metrics::INDEX_REFRESHES
                            .with_label_values(&["snapshot"])
                            .inc();
                        rulesets
                    }
                    Err(snapshot_error) => {
                        metrics::INDEX_REFRESHES.with_label_values(&["failed"]).inc();
                        return Err(IndexError::LoadFailed {
                            remote: remote_error.to_string(),
                            snapshot: snapshot_error,
                        });
                    }
                }
            }
        };

        let count = rulesets.len();
        let by_topic = Self::index_by_topic(rulesets);
        let topics = by_topic.len();

        let mut state = self.state.write().await;
        state.by_topic = by_topic;
        state.last_refresh = Some(self.clock.now());
        drop(state);

        info!(rulesets = count, topics, "ruleset index rebuilt");
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Vec<Ruleset>, String> {
        let content = tokio::fs::read_to_string(&self.snapshot_path)
            .await
            .map_err(|e| e.to_string())?;
        let rulesets: Vec<Ruleset> = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        info!(
            count = rulesets.len(),
            path = %self.snapshot_path.display(),
            "loaded rulesets from local snapshot"
        );
        Ok(rulesets)
    }

    /// Group by topic, each group sorted ascending by priority.
    fn index_by_topic(rulesets: Vec<Ruleset>) -> HashMap<String, Vec<Ruleset>> {
        let mut by_topic: HashMap<String, Vec<Ruleset>> = HashMap::new();
        for ruleset in rulesets {
            by_topic
                .entry(ruleset.topic.clone())
                .or_default()
                .push(ruleset);
        }
        for group in by_topic.values_mut() {
            group.sort_by_key(|r| r.priority);
        }
        by_topic
    }

    /// Make sure the index has data.
    ///
    /// When already loaded, a best-effort staleness refresh runs in the
    /// background and this returns immediately. When empty, the initial load
    /// is single-flight: the first caller starts it, every concurrent caller
    /// awaits the same outcome. The in-flight marker is cleared on success
    /// and failure alike, so a failed load is retryable by the next caller.
    pub async fn ensure_loaded(self: &Arc<Self>) -> Result<(), IndexError> {
        if self.is_loaded().await {
            let index = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(error) = index.refresh_if_needed().await {
                    warn!(%error, "background ruleset refresh failed");
                }
            });
            return Ok(());
        }

        let mut rx = {
            let mut guard = self.in_flight.lock().await;
            match guard.as_ref() {
                Some(rx) => rx.clone(),
                None => {
                    let (tx, rx) = watch::channel(None);
                    *guard = Some(rx.clone());
                    let index = Arc::clone(self);
                    tokio::spawn(async move {
                        let outcome = index.load().await.map_err(|e| e.to_string());
                        *index.in_flight.lock().await = None;
                        let _ = tx.send(Some(outcome));
                    });
                    rx
                }
            }
        };

        loop {
            {
                let value = rx.borrow_and_update();
                if let Some(outcome) = value.as_ref() {
                    return outcome.clone().map_err(IndexError::InitFailed);
                }
            }
            if rx.changed().await.is_err() {
                return Err(IndexError::InitFailed("load task dropped".to_string()));
            }
        }
    }

    /// Reload when more than the staleness interval has elapsed since the
    /// last successful load.
    pub async fn refresh_if_needed(&self) -> Result<(), IndexError> {
        let stale = {
            let state = self.state.read().await;
            match state.last_refresh {
                Some(at) => self.clock.now() - at > self.refresh_interval,
                None => true,
            }
        };

        if stale {
            debug!("ruleset index stale, refreshing");
            self.load().await
        } else {
            Ok(())
        }
    }

    /// Rulesets for a topic, ascending by priority. Empty when unknown.
    pub async fn rulesets_for_topic(&self, topic: &str) -> Vec<Ruleset> {
        self.state
            .read()
            .await
            .by_topic
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }

    /// Rulesets for a topic whose nested media id matches.
    pub async fn rulesets_for_topic_and_media_id(
        &self,
        topic: &str,
        media_id: u32,
    ) -> Vec<Ruleset> {
        self.rulesets_for_topic(topic)
            .await
            .into_iter()
            .filter(|r| r.media.id == media_id)
            .collect()
    }

    /// All indexed topics.
    pub async fn all_topics(&self) -> Vec<String> {
        self.state.read().await.by_topic.keys().cloned().collect()
    }

    /// Whether the index holds any rulesets.
    pub async fn is_loaded(&self) -> bool {
        !self.state.read().await.by_topic.is_empty()
    }

    /// Timestamp of the last successful load.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_refresh
    }
}
