use crate::core::cache::SeriesStore;
use crate::core::series::{SeriesCache, SeriesKind};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory series store, keeping every saved cache in a HashMap
pub struct MemorySeriesStore {
    inner: Mutex<HashMap<SeriesKind, SeriesCache>>,
    saves: AtomicUsize,
}

impl MemorySeriesStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            saves: AtomicUsize::new(0),
        }
    }

    /// Seeds the store with an already persisted cache.
    pub fn with_cache(mut self, kind: SeriesKind, cache: SeriesCache) -> Self {
        self.inner.get_mut().insert(kind, cache);
        self
    }

    /// Number of `save` calls received so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Currently persisted cache for `kind`, if any.
    pub async fn snapshot(&self, kind: SeriesKind) -> Option<SeriesCache> {
        self.inner.lock().await.get(&kind).cloned()
    }
}

impl Default for MemorySeriesStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeriesStore for MemorySeriesStore {
    async fn load(&self, kind: SeriesKind) -> Result<SeriesCache> {
        let caches = self.inner.lock().await;
        let cache = caches.get(&kind).cloned().unwrap_or_default();
        debug!(%kind, rows = cache.len(), "Memory store LOAD");
        Ok(cache)
    }

    async fn save(&self, kind: SeriesKind, cache: &SeriesCache) -> Result<()> {
        let mut caches = self.inner.lock().await;
        caches.insert(kind, cache.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        debug!(%kind, rows = cache.len(), "Memory store SAVE");
        Ok(())
    }
}
