//! Canned providers shared by the unit tests.

use crate::core::quote::{QuoteProvider, QuoteQuery, QuoteRow, QuoteTable};
use crate::core::series::SeriesKind;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Answer {
    Table(QuoteTable),
    Fail(String),
}

/// Answers keyed by series and query start date. Unknown keys yield an empty table.
#[derive(Default)]
pub struct FakeProvider {
    answers: HashMap<(SeriesKind, String), Answer>,
    calls: Mutex<Vec<(SeriesKind, String)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// USD answer in the provider's layout: the rate sits in the second column.
    pub fn with_usd(mut self, date: &str, rate: f64) -> Self {
        let table = single_row(date, &["Open", "Close"], vec![Some(rate - 1.0), Some(rate)]);
        self.answers
            .insert((SeriesKind::Usd, date.to_string()), Answer::Table(table));
        self
    }

    pub fn with_index(mut self, date: &str, level: f64) -> Self {
        let table = single_row(date, &["Adj Close"], vec![Some(level)]);
        self.answers
            .insert((SeriesKind::Index, date.to_string()), Answer::Table(table));
        self
    }

    /// Stock window starting at `start`, one `Adj Close` value per row.
    pub fn with_stock(mut self, start: &str, rows: &[(&str, Option<f64>)]) -> Self {
        let table = QuoteTable {
            columns: vec!["Close".to_string(), "Adj Close".to_string()],
            rows: rows
                .iter()
                .map(|(date, value)| QuoteRow {
                    date: date.to_string(),
                    values: vec![value.map(|v| v * 2.0), *value],
                })
                .collect(),
        };
        self.answers
            .insert((SeriesKind::Stock, start.to_string()), Answer::Table(table));
        self
    }

    pub fn with_failure(mut self, kind: SeriesKind, date: &str) -> Self {
        self.answers.insert(
            (kind, date.to_string()),
            Answer::Fail(format!("connection reset on {date}")),
        );
        self
    }

    pub fn calls(&self) -> Vec<(SeriesKind, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, kind: SeriesKind) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, date)| date)
            .collect()
    }

    fn answer(&self, kind: SeriesKind, query: &QuoteQuery) -> Result<QuoteTable> {
        let start = query.start.to_string();
        self.calls.lock().unwrap().push((kind, start.clone()));
        match self.answers.get(&(kind, start)) {
            Some(Answer::Table(table)) => Ok(table.clone()),
            Some(Answer::Fail(message)) => Err(anyhow!(message.clone())),
            None => Ok(QuoteTable::default()),
        }
    }
}

fn single_row(date: &str, columns: &[&str], values: Vec<Option<f64>>) -> QuoteTable {
    QuoteTable {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: vec![QuoteRow {
            date: date.to_string(),
            values,
        }],
    }
}

#[async_trait]
impl QuoteProvider for FakeProvider {
    async fn usd_rial(&self, query: &QuoteQuery) -> Result<QuoteTable> {
        self.answer(SeriesKind::Usd, query)
    }

    async fn equal_weight_index(&self, query: &QuoteQuery) -> Result<QuoteTable> {
        self.answer(SeriesKind::Index, query)
    }

    async fn price_history(&self, _symbol: &str, query: &QuoteQuery) -> Result<QuoteTable> {
        self.answer(SeriesKind::Stock, query)
    }
}
