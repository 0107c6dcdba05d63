use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::core::config::TseProviderConfig;
use crate::core::quote::{QuoteProvider, QuoteQuery, QuoteTable};
use crate::providers::util::RetryPolicy;

/// Tehran market-data service speaking JSON over HTTP.
///
/// Every endpoint answers `{"columns": [...], "rows": [{"date", "values"}]}`;
/// an empty `rows` array means the source had nothing for the window.
pub struct TseHttpProvider {
    base_url: String,
    retry: RetryPolicy,
}

impl TseHttpProvider {
    pub fn from_config(config: &TseProviderConfig) -> Self {
        TseHttpProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from_config(config),
        }
    }

    /// URL for `segments` below the base URL. Each segment is percent-encoded.
    fn endpoint_url(&self, segments: &[&str], query: &QuoteQuery) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid provider base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Provider base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(Some(&query_string(query)));
        Ok(url)
    }

    async fn get_table(&self, segments: &[&str], query: &QuoteQuery) -> Result<QuoteTable> {
        let endpoint = format!("/{}", segments.join("/"));
        let url = self.endpoint_url(segments, query)?;
        debug!("Requesting quotes from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("yearly-growth/0.1")
            .build()?;
        let response = self
            .retry
            .run(|| client.get(url.clone()).send())
            .await
            .with_context(|| format!("Request error for {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for {}",
                response.status(),
                endpoint
            ));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(QuoteTable::default());
        }

        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", endpoint, e))
    }
}

fn query_string(query: &QuoteQuery) -> String {
    let flags = &query.flags;
    format!(
        "start={}&end={}&adjust_price={}&just_adj_close={}&ignore_date={}&show_weekday={}&double_date={}",
        query.start,
        query.end,
        flags.adjust_price,
        flags.just_adj_close,
        flags.ignore_date,
        flags.show_weekday,
        flags.double_date
    )
}

#[async_trait]
impl QuoteProvider for TseHttpProvider {
    #[instrument(name = "UsdRialFetch", skip(self), fields(start = %query.start))]
    async fn usd_rial(&self, query: &QuoteQuery) -> Result<QuoteTable> {
        self.get_table(&["usd"], query).await
    }

    #[instrument(name = "EqualIndexFetch", skip(self), fields(start = %query.start))]
    async fn equal_weight_index(&self, query: &QuoteQuery) -> Result<QuoteTable> {
        self.get_table(&["index", "equal-weight"], query).await
    }

    #[instrument(
        name = "PriceHistoryFetch",
        skip(self),
        fields(symbol = %symbol, start = %query.start, end = %query.end)
    )]
    async fn price_history(&self, symbol: &str, query: &QuoteQuery) -> Result<QuoteTable> {
        self.get_table(&["stock", symbol, "history"], query).await
    }
}
