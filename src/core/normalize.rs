//! Cumulative-growth normalisation to a base of 100.
//!
//! Two input shapes are supported: a table of annual rates that is compounded
//! forward, and a sparse series of absolute observations that is rebased on
//! its first defined value. Both produce a [`GrowthSeries`] aligned
//! positionally to the requested years, `None` marking an absent point.

use crate::core::inflation::InflationTable;
use anyhow::{Result, anyhow};
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use tracing::debug;

pub const BASE: f64 = 100.0;

pub type GrowthSeries = Vec<Option<f64>>;

/// Compounds annual rates into a cumulative series starting at [`BASE`].
///
/// Growth into year `i` uses the rate recorded for year `i - 1`. A year whose
/// predecessor has no rate is blanked, and the running value carries on
/// unchanged past it.
pub fn compound_rates(years: &[i32], table: &InflationTable) -> GrowthSeries {
    let mut values = Vec::with_capacity(years.len());
    if years.is_empty() {
        return values;
    }

    let mut current = BASE;
    values.push(Some(current));
    for window in years.windows(2) {
        match table.rate(window[0]) {
            Some(rate) => {
                current *= 1.0 + rate / 100.0;
                values.push(Some(current));
            }
            None => {
                debug!(year = window[0], "No inflation rate");
                values.push(None);
            }
        }
    }
    values
}

/// Rebases raw observations on the first defined one, scaled to [`BASE`].
///
/// Returns an all-`None` series when no usable base exists (every point is
/// missing, or the first defined point is zero).
pub fn rebase_ratio(raw: &[Option<f64>]) -> GrowthSeries {
    let base = raw.iter().flatten().copied().next();
    match base {
        Some(base) if base != 0.0 => raw
            .iter()
            .map(|value| value.map(|v| v / base * BASE))
            .collect(),
        _ => vec![None; raw.len()],
    }
}

/// Whether the series has at least one defined point.
pub fn has_data(series: &[Option<f64>]) -> bool {
    series.iter().any(Option::is_some)
}

/// Total growth multiple of a cumulative series: its last defined value over [`BASE`].
pub fn final_multiplier(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().flatten().next().map(|v| v / BASE)
}

/// Compound annual growth (%) between the first and last defined points.
///
/// `None` with fewer than two defined points; adjacent years give a one-year rate.
pub fn annualized_growth(series: &[Option<f64>]) -> Result<Option<f64>> {
    let mut defined = series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)));
    let Some((first_index, first)) = defined.next() else {
        return Ok(None);
    };
    let Some((last_index, last)) = defined.last() else {
        return Ok(None);
    };
    if first <= 0.0 || last <= 0.0 {
        return Ok(None);
    }

    let begin_bal = Decimal::from_f64(first).ok_or_else(|| anyhow!("Invalid starting value"))?;
    let end_bal = Decimal::from_f64(last).ok_or_else(|| anyhow!("Invalid ending value"))?;
    let n_years = Decimal::from(last_index - first_index);

    let rate = cagr(begin_bal, end_bal, n_years);
    let percentage = (rate * Decimal::from(100))
        .to_f64()
        .ok_or_else(|| anyhow!("CAGR percentage conversion failed"))?;
    debug!("cagr: {begin_bal}, {end_bal}, {n_years} = {rate}, {percentage}");
    Ok(Some(percentage))
}
