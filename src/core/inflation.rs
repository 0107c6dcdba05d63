use std::collections::BTreeMap;

/// Point-to-point annual consumer inflation (%), keyed by year.
const BUILTIN_RATES: [(i32, f64); 14] = [
    (1391, 30.5),
    (1392, 34.7),
    (1393, 15.6),
    (1394, 11.9),
    (1395, 6.9),
    (1396, 8.2),
    (1397, 26.9),
    (1398, 34.8),
    (1399, 36.4),
    (1400, 40.2),
    (1401, 45.8),
    (1402, 40.7),
    (1403, 32.5),
    (1404, 33.2),
];

/// Static reference table of annual inflation rates. Never fetched or cached.
#[derive(Debug, Clone, PartialEq)]
pub struct InflationTable {
    rates: BTreeMap<i32, f64>,
}

impl InflationTable {
    pub fn builtin() -> Self {
        Self {
            rates: BUILTIN_RATES.into_iter().collect(),
        }
    }

    pub fn from_rates(rates: impl IntoIterator<Item = (i32, f64)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    /// Overrides or extends entries of this table.
    pub fn with_overrides(mut self, overrides: &BTreeMap<i32, f64>) -> Self {
        self.rates
            .extend(overrides.iter().map(|(year, rate)| (*year, *rate)));
        self
    }

    pub fn rate(&self, year: i32) -> Option<f64> {
        self.rates.get(&year).copied()
    }
}

impl Default for InflationTable {
    fn default() -> Self {
        Self::builtin()
    }
}
