//! Cache-aside resolution over a persistent key-value store.
//!
//! Topic classification and ruleset lookup both follow the same pattern:
//! consult the persistent store first, compute the value through an external
//! resolver only on a miss, then persist the result. `ResolutionCache`
//! captures that pattern once, generically over the stored value type.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tracing::debug;

use crate::metrics;

/// Errors from a persistent key-value store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(String),
    /// A plain create hit an existing key.
    #[error("duplicate key: {0}")]
    Duplicate(String),
    /// Stored payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistent key-value storage for one cached collection.
///
/// Implementations are synchronous (rusqlite is), like the other store traits
/// in this crate; async callers invoke them directly.
pub trait KeyValueStore<V>: Send + Sync {
    /// Look up a single key.
    fn find(&self, key: &str) -> Result<Option<V>, StoreError>;

    /// Look up many keys in one query. Missing keys are absent from the
    /// result.
    fn find_many(&self, keys: &[String]) -> Result<Vec<(String, V)>, StoreError>;

    /// Insert a new entry. Fails with [`StoreError::Duplicate`] if the key
    /// already exists.
    fn create(&self, key: &str, value: &V) -> Result<(), StoreError>;

    /// Insert the entry unless the key already exists, returning whatever is
    /// stored afterwards. An existing row wins over the new value.
    fn upsert(&self, key: &str, value: &V) -> Result<V, StoreError>;
}

/// Errors from a cache-aside resolution.
#[derive(Debug, Error)]
pub enum CacheError<E: std::error::Error> {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The external resolver failed for a missing key.
    #[error("resolver failed: {0}")]
    Resolver(E),
}

/// Cache-aside lookup over a [`KeyValueStore`].
///
/// No in-process memoization: the persistent store is the only cache layer.
pub struct ResolutionCache<V> {
    name: &'static str,
    store: Arc<dyn KeyValueStore<V>>,
}

impl<V> ResolutionCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache over the given store. `name` labels log lines and
    /// metrics for this collection.
    pub fn new(name: &'static str, store: Arc<dyn KeyValueStore<V>>) -> Self {
        Self { name, store }
    }

    /// Resolve a single key: stored value on hit, otherwise compute through
    /// `resolve_missing`, persist with a plain create, and return it.
    ///
    /// Not race-hardened: two concurrent callers for the same missing key can
    /// collide on the create. High-contention callers should use
    /// [`resolve_many`](Self::resolve_many).
    pub async fn resolve<F, Fut, E>(&self, key: &str, resolve_missing: F) -> Result<V, CacheError<E>>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: std::error::Error,
    {
        if let Some(value) = self.store.find(key)? {
            debug!(collection = self.name, key, "cache hit");
            metrics::CACHE_LOOKUPS
                .with_label_values(&[self.name, "hit"])
                .inc();
            return Ok(value);
        }

        debug!(collection = self.name, key, "cache miss, resolving");
        metrics::CACHE_LOOKUPS
            .with_label_values(&[self.name, "miss"])
            .inc();

        let value = resolve_missing(key.to_string())
            .await
            .map_err(CacheError::Resolver)?;
        self.store.create(key, &value)?;
        Ok(value)
    }

    /// Resolve a batch of keys with one store query and at most one external
    /// resolution per distinct missing key.
    ///
    /// All hits are collected before any resolution is issued. Results are
    /// persisted with an upsert: concurrent batches racing on the same
    /// missing key must not fail on the second write, the existing row simply
    /// wins (and is what gets returned).
    pub async fn resolve_many<F, Fut, E>(
        &self,
        keys: &[String],
        resolve_missing: F,
    ) -> Result<HashMap<String, V>, CacheError<E>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: std::error::Error,
    {
        let mut unique: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for key in keys {
            if seen.insert(key.as_str()) {
                unique.push(key.clone());
            }
        }

        let mut resolved: HashMap<String, V> =
            self.store.find_many(&unique)?.into_iter().collect();

        let missing: Vec<String> = unique
            .iter()
            .filter(|key| !resolved.contains_key(*key))
            .cloned()
            .collect();

        metrics::CACHE_LOOKUPS
            .with_label_values(&[self.name, "hit"])
            .inc_by(resolved.len() as u64);
        metrics::CACHE_LOOKUPS
            .with_label_values(&[self.name, "miss"])
            .inc_by(missing.len() as u64);

        if missing.is_empty() {
            return Ok(resolved);
        }

        debug!(
            collection = self.name,
            hits = resolved.len(),
            misses = missing.len(),
            "batch cache lookup"
        );

        let pending: Vec<_> = missing
            .iter()
            .map(|key| resolve_missing(key.clone()))
            .collect();
        let outcomes = join_all(pending).await;

        for (key, outcome) in missing.into_iter().zip(outcomes) {
            let value = outcome.map_err(CacheError::Resolver)?;
            let stored = self.store.upsert(&key, &value)?;
            resolved.insert(key, stored);
        }

        Ok(resolved)
    }
}
