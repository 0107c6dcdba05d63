//! Market-data provider abstractions and core types

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A calendar date in the data source's own calendar system.
///
/// No conversion to any other calendar is attempted; the source is queried
/// with exactly these components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct SourceDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl SourceDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl Display for SourceDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for SourceDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(anyhow!("Invalid date: {}", s));
        };
        Ok(SourceDate {
            year: year.parse().map_err(|_| anyhow!("Invalid year in date: {}", s))?,
            month: month.parse().map_err(|_| anyhow!("Invalid month in date: {}", s))?,
            day: day.parse().map_err(|_| anyhow!("Invalid day in date: {}", s))?,
        })
    }
}

/// Switches forwarded to the data source alongside a date window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryFlags {
    pub adjust_price: bool,
    pub just_adj_close: bool,
    pub ignore_date: bool,
    pub show_weekday: bool,
    pub double_date: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteQuery {
    pub start: SourceDate,
    pub end: SourceDate,
    pub flags: QueryFlags,
}

impl QuoteQuery {
    pub fn single_day(date: SourceDate, flags: QueryFlags) -> Self {
        Self {
            start: date,
            end: date,
            flags,
        }
    }

    pub fn window(start: SourceDate, end: SourceDate, flags: QueryFlags) -> Self {
        Self { start, end, flags }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRow {
    pub date: String,
    #[serde(default)]
    pub values: Vec<Option<f64>>,
}

/// Tabular answer from the data source: one row per trading day, value
/// columns named by `columns`. An empty table means "no data for that window".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteTable {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<QuoteRow>,
}

impl QuoteTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Finite value at `row`/`column`, if any.
    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        self.rows
            .get(row)
            .and_then(|r| r.values.get(column).copied().flatten())
            .filter(|v| v.is_finite())
    }

    /// Earliest row (by date) holding a value in `column`, with its date.
    pub fn first_defined(&self, column: &str) -> Option<(&str, f64)> {
        let index = self.column_index(column)?;
        let mut rows: Vec<&QuoteRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        rows.into_iter().find_map(|row| {
            row.values
                .get(index)
                .copied()
                .flatten()
                .filter(|v| v.is_finite())
                .map(|v| (row.date.as_str(), v))
        })
    }
}

/// Point-in-time quotes from the external financial-data source.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Free-market USD rate in rial.
    async fn usd_rial(&self, query: &QuoteQuery) -> Result<QuoteTable>;

    /// Equal-weight equity index.
    async fn equal_weight_index(&self, query: &QuoteQuery) -> Result<QuoteTable>;

    /// Daily price history for a single listed stock.
    async fn price_history(&self, symbol: &str, query: &QuoteQuery) -> Result<QuoteTable>;
}
