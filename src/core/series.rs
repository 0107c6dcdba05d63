//! Series identities, year keys and the per-series year cache.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// A single numeric observation (rate, index level or price) for one year.
pub type Quote = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Usd,
    Index,
    Stock,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 3] = [SeriesKind::Usd, SeriesKind::Index, SeriesKind::Stock];

    /// File holding the persisted cache for this series.
    pub fn file_name(&self) -> &'static str {
        match self {
            SeriesKind::Usd => "usd_cache.csv",
            SeriesKind::Index => "equal_index_cache.csv",
            SeriesKind::Stock => "stock_cache.csv",
        }
    }

    /// Header of the value column in the persisted cache.
    pub fn value_column(&self) -> &'static str {
        match self {
            SeriesKind::Usd => "usd_rate",
            SeriesKind::Index => "equal_index",
            SeriesKind::Stock => "stock_price",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::Usd => "USD",
            SeriesKind::Index => "Equal-weight index",
            SeriesKind::Stock => "Stock",
        }
    }
}

impl Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SeriesKind::Usd => "usd",
                SeriesKind::Index => "index",
                SeriesKind::Stock => "stock",
            }
        )
    }
}

/// Canonical string key for a year. All joins and lookups go through this.
pub fn year_key(year: i32) -> String {
    year.to_string()
}

/// Normalises a year key read from an external source, e.g. `" 1399.0"` to `"1399"`.
pub fn canonical_year_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year_key(year));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Some(year_key(value as i32)),
        _ => None,
    }
}

/// Earliest and latest year accepted in a comparison.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;
/// Widest comparison accepted, in years.
pub const MAX_SPAN: usize = 200;

/// Contiguous, inclusive range of requested years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        for year in [start, end] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                bail!("Year {year} is outside {MIN_YEAR}..={MAX_YEAR}");
            }
        }
        if start > end {
            bail!("Start year {start} is after end year {end}");
        }
        let range = Self { start, end };
        if range.year_count() > MAX_SPAN {
            bail!(
                "Range {start}-{end} spans {} years, at most {MAX_SPAN} are supported",
                range.year_count()
            );
        }
        Ok(range)
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of years in the range, both ends included.
    pub fn year_count(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start) + 1).max(0) as usize
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }

    pub fn keys(&self) -> Vec<String> {
        self.years().map(year_key).collect()
    }
}

/// Year-keyed quotes for one series.
///
/// Rows are only ever added; an existing year is never overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesCache {
    rows: BTreeMap<String, Quote>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, year: &str) -> Option<Quote> {
        self.rows.get(year).copied()
    }

    pub fn contains(&self, year: &str) -> bool {
        self.rows.contains_key(year)
    }

    /// Adds a row for `year`. Returns `false` and leaves the cache untouched
    /// if the year is already present.
    pub fn insert(&mut self, year: String, value: Quote) -> bool {
        if self.rows.contains_key(&year) {
            return false;
        }
        self.rows.insert(year, value);
        true
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Quote)> {
        self.rows.iter().map(|(year, value)| (year.as_str(), *value))
    }

    /// Requested years absent from the cache, in requested order.
    pub fn missing<'a>(&self, requested: &'a [String]) -> Vec<&'a str> {
        requested
            .iter()
            .filter(|year| !self.rows.contains_key(year.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl FromIterator<(String, Quote)> for SeriesCache {
    fn from_iter<I: IntoIterator<Item = (String, Quote)>>(iter: I) -> Self {
        let mut cache = SeriesCache::new();
        for (year, value) in iter {
            cache.insert(year, value);
        }
        cache
    }
}
