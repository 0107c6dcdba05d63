//! Incremental, year-keyed caching of fetched quotes.
//!
//! Only successfully fetched years are ever persisted. A year that could not
//! be acquired simply stays missing and is attempted again on the next run.

use crate::core::fetcher::NearestDateFetcher;
use crate::core::series::{Quote, SeriesCache, SeriesKind};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Durable home of the per-series caches.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Loads the cache for `kind`; an absent store yields an empty cache.
    async fn load(&self, kind: SeriesKind) -> Result<SeriesCache>;

    /// Replaces the persisted cache for `kind` with `cache` in full.
    async fn save(&self, kind: SeriesKind, cache: &SeriesCache) -> Result<()>;
}

/// Source of one quote per year key, bound to a single series.
#[async_trait]
pub trait YearFetcher: Send + Sync {
    async fn fetch(&self, year: &str) -> Option<Quote>;
}

/// [`NearestDateFetcher`] bound to one series kind.
pub struct SeriesFetcher<'a> {
    fetcher: &'a NearestDateFetcher<'a>,
    kind: SeriesKind,
}

impl<'a> SeriesFetcher<'a> {
    pub fn new(fetcher: &'a NearestDateFetcher<'a>, kind: SeriesKind) -> Self {
        Self { fetcher, kind }
    }
}

#[async_trait]
impl YearFetcher for SeriesFetcher<'_> {
    async fn fetch(&self, year: &str) -> Option<Quote> {
        match year.parse::<i32>() {
            Ok(year) => self.fetcher.fetch_nearest(year, self.kind).await,
            Err(_) => {
                warn!(kind = %self.kind, year, "Not a numeric year key");
                None
            }
        }
    }
}

/// Years handled by one gap-fill pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub fetched: Vec<String>,
    pub unavailable: Vec<String>,
}

pub struct IncrementalCache<'a> {
    store: &'a dyn SeriesStore,
}

impl<'a> IncrementalCache<'a> {
    pub fn new(store: &'a dyn SeriesStore) -> Self {
        Self { store }
    }

    pub async fn load(&self, kind: SeriesKind) -> Result<SeriesCache> {
        let cache = self.store.load(kind).await?;
        debug!(%kind, rows = cache.len(), "Loaded series cache");
        Ok(cache)
    }

    /// Fetches the requested years absent from `cache` and persists the
    /// extended cache if anything was added.
    ///
    /// Years are fetched once each, in requested order. Persistence errors
    /// are returned; fetch failures only leave the year missing.
    pub async fn sync(
        &self,
        kind: SeriesKind,
        mut cache: SeriesCache,
        requested: &[String],
        fetcher: &dyn YearFetcher,
    ) -> Result<(SeriesCache, SyncOutcome)> {
        let missing = cache.missing(requested);
        let mut outcome = SyncOutcome::default();
        if missing.is_empty() {
            debug!(%kind, "Cache complete for requested years");
            return Ok((cache, outcome));
        }

        info!(%kind, missing = missing.len(), "Filling cache gaps");
        for year in missing {
            match fetcher.fetch(year).await {
                Some(value) => {
                    cache.insert(year.to_string(), value);
                    outcome.fetched.push(year.to_string());
                }
                None => outcome.unavailable.push(year.to_string()),
            }
        }

        if !outcome.fetched.is_empty() {
            self.store.save(kind, &cache).await?;
            info!(%kind, added = outcome.fetched.len(), rows = cache.len(), "Persisted series cache");
        }
        Ok((cache, outcome))
    }
}
