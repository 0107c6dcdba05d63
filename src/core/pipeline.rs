//! End-to-end run: validate the range, gap-fill each series cache, then align
//! and normalise everything into one table.

use crate::core::align::{AlignedRow, align};
use crate::core::cache::{IncrementalCache, SeriesFetcher, SeriesStore};
use crate::core::config::{AppConfig, ProbeConfig};
use crate::core::fetcher::NearestDateFetcher;
use crate::core::inflation::InflationTable;
use crate::core::normalize::{annualized_growth, final_multiplier, has_data};
use crate::core::quote::QuoteProvider;
use crate::core::series::{SeriesCache, SeriesKind, YearRange};
use anyhow::Result;
use tracing::{info, warn};

/// Growth totals of one cumulative column.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub label: String,
    /// Last defined cumulative value divided by 100.
    pub multiplier: Option<f64>,
    /// Compound annual growth in percent.
    pub annual_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub rows: Vec<AlignedRow>,
    pub summaries: Vec<SeriesSummary>,
}

pub struct Pipeline<'a> {
    provider: &'a dyn QuoteProvider,
    store: &'a dyn SeriesStore,
    inflation: InflationTable,
    probe: ProbeConfig,
    stock_symbol: String,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        provider: &'a dyn QuoteProvider,
        store: &'a dyn SeriesStore,
        inflation: InflationTable,
        probe: ProbeConfig,
        stock_symbol: &str,
    ) -> Self {
        Self {
            provider,
            store,
            inflation,
            probe,
            stock_symbol: stock_symbol.to_string(),
        }
    }

    pub fn from_config(
        config: &AppConfig,
        provider: &'a dyn QuoteProvider,
        store: &'a dyn SeriesStore,
    ) -> Self {
        Self::new(
            provider,
            store,
            InflationTable::builtin().with_overrides(&config.inflation),
            config.probe.clone(),
            &config.stock.symbol,
        )
    }

    /// Runs the comparison for `start_year..=end_year`, reporting progress
    /// through `status`.
    ///
    /// Fails before touching the store or the provider if the range is
    /// inverted. Store errors abort the run; missing data never does.
    pub async fn run<F>(&self, start_year: i32, end_year: i32, mut status: F) -> Result<PipelineReport>
    where
        F: FnMut(&str),
    {
        let range = YearRange::new(start_year, end_year)?;
        status(&format!("Starting comparison for {start_year}-{end_year}"));
        info!(start_year, end_year, years = range.year_count(), "Pipeline started");

        let requested = range.keys();
        let fetcher = NearestDateFetcher::new(self.provider, self.probe.clone(), &self.stock_symbol);
        let cache = IncrementalCache::new(self.store);

        let mut caches = Vec::with_capacity(SeriesKind::ALL.len());
        for kind in SeriesKind::ALL {
            let loaded = cache.load(kind).await?;
            let missing = loaded.missing(&requested).len();
            if missing > 0 {
                status(&format!("{}: fetching {missing} missing year(s)", kind.label()));
            }

            let series_fetcher = SeriesFetcher::new(&fetcher, kind);
            let (synced, outcome) = cache.sync(kind, loaded, &requested, &series_fetcher).await?;
            for year in &outcome.unavailable {
                status(&format!("{}: no data found for {year}", kind.label()));
            }
            caches.push(synced);
        }

        let [usd, index, stock]: [SeriesCache; 3] = caches
            .try_into()
            .map_err(|_| anyhow::anyhow!("Expected one cache per series"))?;
        let rows = align(&range, &self.inflation, &usd, &index, &stock);

        let columns: [(&str, Vec<Option<f64>>); 4] = [
            ("Inflation", rows.iter().map(|r| r.inflation_growth).collect()),
            (SeriesKind::Usd.label(), rows.iter().map(|r| r.usd_growth).collect()),
            (SeriesKind::Index.label(), rows.iter().map(|r| r.index_growth).collect()),
            (SeriesKind::Stock.label(), rows.iter().map(|r| r.stock_growth).collect()),
        ];

        let mut summaries = Vec::with_capacity(columns.len());
        for (label, column) in columns {
            if !has_data(&column) {
                warn!(series = label, "No usable base value");
                status(&format!("{label}: no data available for the selected years"));
            }
            summaries.push(SeriesSummary {
                label: label.to_string(),
                multiplier: final_multiplier(&column),
                annual_rate: annualized_growth(&column)?,
            });
        }

        status(&format!("Comparison complete: {} year(s)", rows.len()));
        info!(rows = rows.len(), "Pipeline finished");
        Ok(PipelineReport { rows, summaries })
    }
}
