//! Read-through lookup over a store and a retriever

use file_blob_cache::CacheStore;
use tracing::{debug, trace};

use crate::retriever::Retriever;

/// Serves bytes from the store, falling back to the retriever on a miss.
///
/// Holds no state of its own. Concurrent misses for the same key may each
/// call the retriever; the last write-back wins.
pub struct ReadThroughCache<S, R> {
    store: S,
    retriever: R,
}

impl<S, R> ReadThroughCache<S, R>
where
    S: CacheStore,
    R: Retriever,
{
    pub fn new(store: S, retriever: R) -> Self {
        Self { store, retriever }
    }

    /// Return the bytes for `key`, fetching and caching them on a miss.
    ///
    /// Blank keys return `None` without touching the store or the retriever.
    /// `None` otherwise means neither the cache nor the origin could supply
    /// the bytes. A failed write-back does not affect the result.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        if key.trim().is_empty() {
            trace!("Ignoring blank cache key");
            return None;
        }

        if let Some(data) = self.store.retrieve(key).await {
            return Some(data);
        }

        let Some(data) = self.retriever.retrieve(key).await else {
            debug!(key = %key, "Origin has no data for key");
            return None;
        };

        if !self.store.store(key, &data).await {
            debug!(key = %key, "Write-back failed, serving fetched data uncached");
        }

        Some(data)
    }

    /// Drop the cached entry for `key`, returning whether one existed
    pub async fn invalidate(&self, key: &str) -> bool {
        if key.trim().is_empty() {
            return false;
        }
        self.store.remove(key).await
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }
}
