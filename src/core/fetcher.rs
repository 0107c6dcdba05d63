//! Nearest-trading-day acquisition of one yearly quote.
//!
//! Markets are closed on many of the first days of a year, so a year's quote
//! is taken from the first candidate date that actually has data. Provider
//! errors on a single date are never fatal: the fetcher moves on to the next
//! candidate and reports "no value" once the window is exhausted.

use crate::core::config::ProbeConfig;
use crate::core::quote::{QueryFlags, QuoteProvider, QuoteQuery, QuoteTable, SourceDate};
use crate::core::series::{Quote, SeriesKind};
use anyhow::Result;
use tracing::{debug, info, warn};

const ADJ_CLOSE: &str = "Adj Close";

/// Series quoted one day at a time.
#[derive(Debug, Clone, Copy)]
enum DailySeries {
    Usd,
    Index,
}

impl DailySeries {
    fn kind(self) -> SeriesKind {
        match self {
            DailySeries::Usd => SeriesKind::Usd,
            DailySeries::Index => SeriesKind::Index,
        }
    }
}

pub struct NearestDateFetcher<'a> {
    provider: &'a dyn QuoteProvider,
    probe: ProbeConfig,
    stock_symbol: String,
}

impl<'a> NearestDateFetcher<'a> {
    pub fn new(provider: &'a dyn QuoteProvider, probe: ProbeConfig, stock_symbol: &str) -> Self {
        Self {
            provider,
            probe,
            stock_symbol: stock_symbol.to_string(),
        }
    }

    /// Candidate dates probed for `year`, in probing order.
    pub fn candidate_dates(&self, year: i32) -> Vec<SourceDate> {
        (self.probe.first_day..=self.probe.last_day)
            .map(|day| SourceDate::new(year, 1, day))
            .collect()
    }

    /// Quote for `year`, or `None` when no candidate yielded data.
    pub async fn fetch_nearest(&self, year: i32, kind: SeriesKind) -> Option<Quote> {
        match kind {
            SeriesKind::Stock => self.fetch_stock_window(year).await,
            SeriesKind::Usd => self.probe_days(year, DailySeries::Usd).await,
            SeriesKind::Index => self.probe_days(year, DailySeries::Index).await,
        }
    }

    async fn probe_days(&self, year: i32, series: DailySeries) -> Option<Quote> {
        let kind = series.kind();
        let candidates = self.candidate_dates(year);
        let total = candidates.len();

        for (attempt, date) in candidates.into_iter().enumerate() {
            match self.query_day(series, date).await {
                Ok(Some(value)) => {
                    info!(%kind, %date, value, "Fetched quote");
                    return Some(value);
                }
                Ok(None) => debug!(%kind, %date, "No data for date"),
                Err(e) => debug!(%kind, %date, error = %e, "Probe failed"),
            }

            if attempt + 1 < total && !self.probe.delay().is_zero() {
                tokio::time::sleep(self.probe.delay()).await;
            }
        }

        warn!(%kind, year, "No data in probe window");
        None
    }

    async fn query_day(&self, series: DailySeries, date: SourceDate) -> Result<Option<Quote>> {
        let table = match series {
            DailySeries::Usd => {
                let query = QuoteQuery::single_day(date, QueryFlags::default());
                self.provider.usd_rial(&query).await?
            }
            DailySeries::Index => {
                let flags = QueryFlags {
                    just_adj_close: true,
                    ..QueryFlags::default()
                };
                self.provider
                    .equal_weight_index(&QuoteQuery::single_day(date, flags))
                    .await?
            }
        };
        Ok(extract_day_value(series, &table))
    }

    async fn fetch_stock_window(&self, year: i32) -> Option<Quote> {
        let query = QuoteQuery::window(
            SourceDate::new(year, 1, 1),
            SourceDate::new(year, 1, self.probe.stock_window_end_day),
            QueryFlags {
                adjust_price: true,
                ..QueryFlags::default()
            },
        );

        let table = match self.provider.price_history(&self.stock_symbol, &query).await {
            Ok(table) => table,
            Err(e) => {
                warn!(symbol = %self.stock_symbol, year, error = %e, "Price history request failed");
                return None;
            }
        };

        match table.first_defined(ADJ_CLOSE) {
            Some((date, value)) => {
                info!(symbol = %self.stock_symbol, date, value, "Fetched adjusted price");
                Some(value)
            }
            None => {
                warn!(
                    symbol = %self.stock_symbol,
                    year,
                    rows = table.rows.len(),
                    "Empty price window or no adjusted close"
                );
                None
            }
        }
    }
}

/// The USD table carries the rate in its second column, the index table in its first.
fn extract_day_value(series: DailySeries, table: &QuoteTable) -> Option<Quote> {
    if table.is_empty() {
        return None;
    }
    match series {
        DailySeries::Usd => table.cell(0, 1),
        DailySeries::Index => table.cell(0, 0),
    }
}
