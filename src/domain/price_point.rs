//! Single OHLC sample from a market-data provider.

use chrono::{DateTime, FixedOffset};

/// One provider bar, timestamped in the exchange's local offset. Values share a
/// currency unit; the high/low envelope is trusted from upstream and never
/// re-checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PricePoint {
    /// Exchange-local calendar date, `YYYY-MM-DD`.
    pub fn date_label(&self) -> String {
        self.timestamp.date_naive().format("%Y-%m-%d").to_string()
    }
}
