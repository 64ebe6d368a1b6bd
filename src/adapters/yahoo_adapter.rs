//! Yahoo Finance chart and search client.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::error::GatewayError;
use crate::domain::interval::IntervalSpec;
use crate::domain::price_point::PricePoint;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const PROVIDER: &str = "yahoo";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; stockgate/0.1)";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<ChartIndicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    long_name: Option<String>,
    short_name: Option<String>,
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Debug, Deserialize)]
struct SearchQuote {
    symbol: Option<String>,
}

pub struct YahooAdapter {
    client: Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, GatewayError> {
        let base_url = config
            .get_string("yahoo", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// GET and decode; `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, GatewayError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::provider(PROVIDER, format!("{}: {}", status, text)));
        }

        let body = resp
            .json()
            .await
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;
        Ok(Some(body))
    }

    /// Chart URL with `symbol` encoded as a single path segment.
    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, urlencoding::encode(symbol))
    }

    async fn chart(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<Option<ChartResult>, GatewayError> {
        let url = self.chart_url(symbol);
        let envelope: Option<ChartEnvelope> = self
            .get_json(&url, &[("range", range), ("interval", interval)])
            .await?;
        match envelope {
            Some(envelope) => first_result(envelope.chart),
            None => Ok(None),
        }
    }
}

fn first_result(body: ChartBody) -> Result<Option<ChartResult>, GatewayError> {
    if let Some(err) = body.error {
        // "Not Found" means an unknown or delisted symbol, not a provider fault.
        if err.code.as_deref() == Some("Not Found") {
            return Ok(None);
        }
        return Err(GatewayError::provider(
            PROVIDER,
            err.description
                .or(err.code)
                .unwrap_or_else(|| "chart error".to_string()),
        ));
    }
    Ok(body.result.and_then(|r| r.into_iter().next()))
}

fn exchange_offset(meta: Option<&ChartMeta>) -> FixedOffset {
    meta.and_then(|m| m.gmtoffset)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Zip timestamps with OHLC columns, skipping rows with any missing value.
/// Timestamps are shifted into the exchange's offset so dates are exchange-local.
fn price_points(result: ChartResult) -> Vec<PricePoint> {
    let offset = exchange_offset(result.meta.as_ref());
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result
        .indicators
        .and_then(|i| i.quote.into_iter().next())
    else {
        return Vec::new();
    };

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let timestamp = DateTime::<Utc>::from_timestamp(ts, 0)?.with_timezone(&offset);
            Some(PricePoint {
                timestamp,
                open: quote.open.get(i).copied().flatten()?,
                high: quote.high.get(i).copied().flatten()?,
                low: quote.low.get(i).copied().flatten()?,
                close: quote.close.get(i).copied().flatten()?,
            })
        })
        .collect()
}

fn display_name_from(result: &ChartResult) -> Option<String> {
    let meta = result.meta.as_ref()?;
    meta.long_name
        .clone()
        .or_else(|| meta.short_name.clone())
        .filter(|n| !n.trim().is_empty())
}

#[async_trait]
impl MarketDataPort for YahooAdapter {
    async fn fetch_history(
        &self,
        symbol: &str,
        spec: IntervalSpec,
    ) -> Result<Vec<PricePoint>, GatewayError> {
        let result = self
            .chart(symbol, spec.window.as_range(), spec.granularity.as_interval())
            .await?;
        let points = result.map(price_points).unwrap_or_default();
        debug!(symbol, rows = points.len(), "yahoo chart fetched");
        Ok(points)
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/v1/finance/search", self.base_url);
        let resp: Option<SearchResponse> = self
            .get_json(&url, &[("q", query), ("quotesCount", "10"), ("newsCount", "0")])
            .await?;
        let symbols = resp
            .map(|r| r.quotes.into_iter().filter_map(|q| q.symbol).collect())
            .unwrap_or_default();
        Ok(symbols)
    }

    async fn display_name(&self, symbol: &str) -> Result<Option<String>, GatewayError> {
        let result = self.chart(symbol, "1d", "1d").await?;
        Ok(result.as_ref().and_then(display_name_from))
    }
}
