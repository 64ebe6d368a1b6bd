//! Series normalizer: provider history → chart line + candle series.

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::error::GatewayError;
use crate::domain::interval::IntervalName;
use crate::domain::price_point::PricePoint;
use crate::ports::market_data_port::MarketDataPort;

/// One candle in the shape the chart front end consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub x: String,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

/// Three parallel sequences built from the same ordered rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesResult {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    #[serde(rename = "candleData")]
    pub candle_data: Vec<Candle>,
}

/// Reshape provider rows, preserving their order. Empty input is `NoDataFound`.
pub fn normalize(
    symbol: &str,
    interval: IntervalName,
    points: &[PricePoint],
) -> Result<SeriesResult, GatewayError> {
    if points.is_empty() {
        return Err(GatewayError::NoDataFound {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
        });
    }

    let mut labels = Vec::with_capacity(points.len());
    let mut data = Vec::with_capacity(points.len());
    let mut candle_data = Vec::with_capacity(points.len());

    for point in points {
        let label = point.date_label();
        data.push(point.close);
        candle_data.push(Candle {
            x: label.clone(),
            o: point.open,
            h: point.high,
            l: point.low,
            c: point.close,
        });
        labels.push(label);
    }

    Ok(SeriesResult {
        labels,
        data,
        candle_data,
    })
}

/// Resolve the interval, fetch history for `symbol`, and normalize it.
pub async fn get_series(
    market_data: &dyn MarketDataPort,
    symbol: &str,
    interval_name: &str,
) -> Result<SeriesResult, GatewayError> {
    let interval: IntervalName = interval_name.parse()?;
    let spec = interval.spec();
    debug!(
        symbol,
        range = spec.window.as_range(),
        granularity = spec.granularity.as_interval(),
        "fetching history"
    );

    let points = market_data.fetch_history(symbol, spec).await?;
    let series = normalize(symbol, interval, &points)?;
    info!(symbol, %interval, rows = series.labels.len(), "series normalized");
    Ok(series)
}
