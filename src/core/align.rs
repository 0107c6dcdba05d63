//! Outer join of the independently cached series onto the requested years.

use crate::core::inflation::InflationTable;
use crate::core::normalize::{compound_rates, rebase_ratio};
use crate::core::series::{SeriesCache, YearRange, year_key};
use serde::Serialize;

/// One requested year with its raw inputs and cumulative-growth values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow {
    pub year: String,
    pub inflation_rate: Option<f64>,
    pub usd: Option<f64>,
    pub index: Option<f64>,
    pub stock: Option<f64>,
    pub inflation_growth: Option<f64>,
    pub usd_growth: Option<f64>,
    pub index_growth: Option<f64>,
    pub stock_growth: Option<f64>,
}

/// Builds exactly one row per requested year, in chronological order.
///
/// Years a series has no quote for get `None` in that column; rows are never
/// dropped. The output depends only on the arguments.
pub fn align(
    range: &YearRange,
    inflation: &InflationTable,
    usd: &SeriesCache,
    index: &SeriesCache,
    stock: &SeriesCache,
) -> Vec<AlignedRow> {
    let years: Vec<i32> = range.years().collect();
    let keys: Vec<String> = years.iter().copied().map(year_key).collect();

    let join = |cache: &SeriesCache| -> Vec<Option<f64>> {
        keys.iter().map(|key| cache.get(key)).collect()
    };
    let usd_raw = join(usd);
    let index_raw = join(index);
    let stock_raw = join(stock);

    let inflation_growth = compound_rates(&years, inflation);
    let usd_growth = rebase_ratio(&usd_raw);
    let index_growth = rebase_ratio(&index_raw);
    let stock_growth = rebase_ratio(&stock_raw);

    keys.into_iter()
        .enumerate()
        .map(|(i, year)| AlignedRow {
            inflation_rate: inflation.rate(years[i]),
            usd: usd_raw[i],
            index: index_raw[i],
            stock: stock_raw[i],
            inflation_growth: inflation_growth[i],
            usd_growth: usd_growth[i],
            index_growth: index_growth[i],
            stock_growth: stock_growth[i],
            year,
        })
        .collect()
}
