//! Write-once memoization of existence results.
//!
//! Each cache maps a lookup input to the result of checking it. An entry is
//! written at most once and never updated or evicted, so a result observed
//! once stays valid for the lifetime of the owning service.
//!
//! The map is guarded by an async `RwLock` so a service shared between tasks
//! stays race free. The lock is never held across a fetch: two tasks missing
//! on the same key may both fetch, and the first value written wins.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use tokio::sync::RwLock;

use crate::types::{ReleaseId, RepoId};

use super::Existence;

/// A lookup input usable as a cache key.
pub trait CacheKey: Eq + Hash {
    /// The compound key as written to logs: `owner`, `owner:repo` or
    /// `owner:repo:release`.
    fn cache_key(&self) -> String;
}

impl CacheKey for String {
    fn cache_key(&self) -> String {
        self.clone()
    }
}

impl CacheKey for RepoId {
    fn cache_key(&self) -> String {
        format!("{}:{}", self.owner, self.repo)
    }
}

impl CacheKey for ReleaseId {
    fn cache_key(&self) -> String {
        format!("{}:{}", self.repo.cache_key(), self.name)
    }
}

/// A write-once map from lookup input to existence result.
#[derive(Debug)]
pub struct ExistenceCache<K> {
    /// Name used in log events, e.g. `"owner"`.
    label: &'static str,
    entries: RwLock<HashMap<K, Existence>>,
}

impl<K: CacheKey> ExistenceCache<K> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached result for `key`, if any.
    pub async fn get(&self, key: &K) -> Option<Existence> {
        self.entries.read().await.get(key).copied()
    }

    /// Stores `value` under `key` unless a value is already present.
    ///
    /// Returns the value that ends up cached, which is the earlier one if the
    /// key was already written.
    pub async fn insert_once(&self, key: K, value: Existence) -> Existence {
        *self.entries.write().await.entry(key).or_insert(value)
    }

    /// Returns the cached result for `key`, computing and caching it on a miss.
    ///
    /// Errors from `compute` are returned as-is and leave the cache untouched.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, compute: F) -> Result<Existence, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Existence, E>>,
    {
        if let Some(cached) = self.get(&key).await {
            tracing::debug!(cache = self.label, key = %key.cache_key(), result = %cached, "cache hit");
            return Ok(cached);
        }

        tracing::debug!(cache = self.label, key = %key.cache_key(), "cache miss");
        let computed = compute().await?;
        Ok(self.insert_once(key, computed).await)
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn compound_keys_join_with_colons() {
        let repo = RepoId::new("KinsonDigital", "Velaptor");
        assert_eq!("KinsonDigital".to_string().cache_key(), "KinsonDigital");
        assert_eq!(repo.cache_key(), "KinsonDigital:Velaptor");
        assert_eq!(ReleaseId::new(repo, "v1.0.0").cache_key(), "KinsonDigital:Velaptor:v1.0.0");
    }

    #[tokio::test]
    async fn entries_are_write_once() {
        let cache = ExistenceCache::new("test");

        let key = "a".to_string();

        assert_eq!(cache.insert_once(key.clone(), Existence::NotFound).await, Existence::NotFound);
        assert_eq!(cache.insert_once(key.clone(), Existence::Found).await, Existence::NotFound);
        assert_eq!(cache.get(&key).await, Some(Existence::NotFound));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn compute_runs_once_per_key() {
        let cache = ExistenceCache::new("test");
        let counter = AtomicU32::new(0);
        let calls = &counter;

        for _ in 0..3 {
            let result = cache
                .get_or_try_insert_with("key".to_string(), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(Existence::Found)
                })
                .await;
            assert_eq!(result, Ok(Existence::Found));
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn negative_results_are_cached() {
        let cache = ExistenceCache::new("test");
        let counter = AtomicU32::new(0);
        let calls = &counter;

        for _ in 0..2 {
            let result = cache
                .get_or_try_insert_with(RepoId::new("o", "r"), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(Existence::NotFound)
                })
                .await;
            assert_eq!(result, Ok(Existence::NotFound));
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = ExistenceCache::new("test");

        let failed = cache
            .get_or_try_insert_with("flaky".to_string(), || async { Err::<Existence, _>("boom") })
            .await;
        assert_eq!(failed, Err("boom"));
        assert!(cache.is_empty().await);

        let retried = cache
            .get_or_try_insert_with("flaky".to_string(), || async { Ok::<_, &str>(Existence::Found) })
            .await;
        assert_eq!(retried, Ok(Existence::Found));
    }
}
