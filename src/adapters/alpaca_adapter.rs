//! Alpaca market data and paper-trading client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::error::GatewayError;
use crate::domain::order::{AccountSummary, OrderType, PlacedOrder, ResolvedOrder, Side, TimeInForce};
use crate::domain::quote::{LastTrade, Quote};
use crate::ports::brokerage_port::BrokeragePort;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

const PROVIDER: &str = "alpaca";
pub const DATA_URL: &str = "https://data.alpaca.markets";
pub const PAPER_TRADING_URL: &str = "https://paper-api.alpaca.markets";
pub const LIVE_TRADING_URL: &str = "https://api.alpaca.markets";

#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub data_url: String,
    pub trading_url: String,
}

impl AlpacaConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, GatewayError> {
        let api_key = config.require_string("alpaca", "api_key")?;
        let api_secret = config.require_string("alpaca", "api_secret")?;
        let paper = config.get_bool("alpaca", "paper", true);
        let default_trading = if paper {
            PAPER_TRADING_URL
        } else {
            LIVE_TRADING_URL
        };
        Ok(Self {
            api_key,
            api_secret,
            data_url: config
                .get_string("alpaca", "data_url")
                .unwrap_or_else(|| DATA_URL.to_string()),
            trading_url: config
                .get_string("alpaca", "trading_url")
                .unwrap_or_else(|| default_trading.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestQuoteResponse {
    quote: AlpacaQuote,
}

#[derive(Debug, Deserialize)]
struct AlpacaQuote {
    #[serde(default)]
    ap: Option<f64>,
    #[serde(default)]
    bp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LatestTradeResponse {
    trade: AlpacaTrade,
}

#[derive(Debug, Deserialize)]
struct AlpacaTrade {
    p: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    id: String,
    status: String,
    cash: String,
    buying_power: String,
    equity: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    symbol: String,
    qty: String,
    side: String,
    #[serde(rename = "type")]
    order_type: String,
    time_in_force: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    symbol: String,
    qty: Option<String>,
    side: String,
    #[serde(rename = "type")]
    order_type: String,
    time_in_force: String,
    status: String,
}

pub struct AlpacaAdapter {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaAdapter {
    pub fn new(config: AlpacaConfig) -> Result<Self, GatewayError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&config.api_key).map_err(|e| {
                GatewayError::ConfigInvalid {
                    section: "alpaca".to_string(),
                    key: "api_key".to_string(),
                    reason: e.to_string(),
                }
            })?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&config.api_secret).map_err(|e| {
                GatewayError::ConfigInvalid {
                    section: "alpaca".to_string(),
                    key: "api_secret".to_string(),
                    reason: e.to_string(),
                }
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, GatewayError> {
        Self::new(AlpacaConfig::from_config(config)?)
    }

    /// Market-data URL with `symbol` encoded as a single path segment.
    fn stock_url(&self, symbol: &str, endpoint: &str) -> String {
        format!(
            "{}/v2/stocks/{}/{}",
            self.config.data_url,
            urlencoding::encode(symbol),
            endpoint
        )
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let resp = request
            .send()
            .await
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::provider(PROVIDER, format!("{}: {}", status, text)));
        }

        resp.json()
            .await
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))
    }
}

/// Zero or negative sides mean "nothing posted".
fn quote_from(raw: AlpacaQuote) -> Quote {
    let posted = |p: Option<f64>| p.filter(|v| *v > 0.0);
    Quote {
        ask: posted(raw.ap),
        bid: posted(raw.bp),
    }
}

fn order_body(order: &ResolvedOrder) -> CreateOrderRequest {
    CreateOrderRequest {
        symbol: order.symbol.clone(),
        qty: order.quantity.to_string(),
        side: order.side.as_str().to_string(),
        order_type: order.order_type.as_str().to_string(),
        time_in_force: order.time_in_force.as_str().to_string(),
        limit_price: order.limit_price().map(|p| format!("{:.2}", p)),
    }
}

fn parse_amount(field: &str, value: &str) -> Result<f64, GatewayError> {
    value
        .parse()
        .map_err(|_| GatewayError::provider(PROVIDER, format!("invalid {} '{}'", field, value)))
}

fn placed_order_from(raw: AlpacaOrder, order: &ResolvedOrder) -> Result<PlacedOrder, GatewayError> {
    let qty = match raw.qty.as_deref() {
        Some(q) => parse_amount("qty", q)?,
        None => order.quantity,
    };
    Ok(PlacedOrder {
        id: raw.id,
        symbol: raw.symbol,
        qty,
        side: raw.side.parse::<Side>().unwrap_or(order.side),
        order_type: raw.order_type.parse::<OrderType>().unwrap_or(order.order_type),
        time_in_force: raw
            .time_in_force
            .parse::<TimeInForce>()
            .unwrap_or(order.time_in_force),
        status: raw.status,
        reference_price: order.reference_price,
    })
}

fn account_from(raw: AlpacaAccount) -> Result<AccountSummary, GatewayError> {
    Ok(AccountSummary {
        cash: parse_amount("cash", &raw.cash)?,
        buying_power: parse_amount("buying_power", &raw.buying_power)?,
        equity: parse_amount("equity", &raw.equity)?,
        id: raw.id,
        status: raw.status,
    })
}

#[async_trait]
impl QuotePort for AlpacaAdapter {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, GatewayError> {
        let url = self.stock_url(symbol, "quotes/latest");
        let resp: LatestQuoteResponse = self.send_json(self.client.get(&url)).await?;
        let quote = quote_from(resp.quote);
        debug!(symbol, ask = ?quote.ask, bid = ?quote.bid, "latest quote");
        Ok(quote)
    }

    async fn latest_trade(&self, symbol: &str) -> Result<LastTrade, GatewayError> {
        let url = self.stock_url(symbol, "trades/latest");
        let resp: LatestTradeResponse = self.send_json(self.client.get(&url)).await?;
        debug!(symbol, price = resp.trade.p, "latest trade");
        Ok(LastTrade {
            price: resp.trade.p,
        })
    }
}

#[async_trait]
impl BrokeragePort for AlpacaAdapter {
    async fn account(&self) -> Result<AccountSummary, GatewayError> {
        let url = format!("{}/v2/account", self.config.trading_url);
        let raw: AlpacaAccount = self.send_json(self.client.get(&url)).await?;
        account_from(raw)
    }

    async fn submit_order(&self, order: &ResolvedOrder) -> Result<PlacedOrder, GatewayError> {
        let url = format!("{}/v2/orders", self.config.trading_url);
        let body = order_body(order);
        let raw: AlpacaOrder = self.send_json(self.client.post(&url).json(&body)).await?;
        info!(
            order_id = %raw.id,
            symbol = %order.symbol,
            qty = order.quantity,
            side = %order.side,
            "order submitted"
        );
        placed_order_from(raw, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn resolved(order_type: OrderType) -> ResolvedOrder {
        ResolvedOrder {
            symbol: "AAPL".to_string(),
            quantity: 0.67,
            reference_price: 150.0,
            side: Side::Buy,
            order_type,
            time_in_force: TimeInForce::Day,
        }
    }

    #[test]
    fn quote_zero_sides_are_missing() {
        let raw: LatestQuoteResponse =
            serde_json::from_str(r#"{"symbol":"AAPL","quote":{"ap":0,"bp":189.5,"as":0,"bs":3}}"#)
                .unwrap();
        let quote = quote_from(raw.quote);
        assert_eq!(quote.ask, None);
        assert_eq!(quote.bid, Some(189.5));
    }

    #[test]
    fn trade_price_parsed() {
        let raw: LatestTradeResponse =
            serde_json::from_str(r#"{"symbol":"AAPL","trade":{"p":190.12,"s":100}}"#).unwrap();
        assert_eq!(raw.trade.p, 190.12);
    }

    #[test]
    fn market_order_body_has_no_limit_price() {
        let json = serde_json::to_value(order_body(&resolved(OrderType::Market))).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["qty"], "0.67");
        assert_eq!(json["side"], "buy");
        assert_eq!(json["type"], "market");
        assert_eq!(json["time_in_force"], "day");
        assert!(json.get("limit_price").is_none());
    }

    #[test]
    fn limit_order_body_uses_reference_price() {
        let json = serde_json::to_value(order_body(&resolved(OrderType::Limit))).unwrap();
        assert_eq!(json["type"], "limit");
        assert_eq!(json["limit_price"], "150.00");
    }

    #[test]
    fn placed_order_parsed_from_response() {
        let raw: AlpacaOrder = serde_json::from_str(
            r#"{"id":"61e69015-8549-4bfd-b9c3-01e75843f47d","symbol":"AAPL","qty":"0.67",
                "side":"buy","type":"market","time_in_force":"day","status":"accepted"}"#,
        )
        .unwrap();
        let placed = placed_order_from(raw, &resolved(OrderType::Market)).unwrap();
        assert_eq!(placed.id, "61e69015-8549-4bfd-b9c3-01e75843f47d");
        assert_eq!(placed.qty, 0.67);
        assert_eq!(placed.status, "accepted");
        assert_eq!(placed.reference_price, 150.0);
    }

    #[test]
    fn account_amounts_parsed() {
        let raw: AlpacaAccount = serde_json::from_str(
            r#"{"id":"acc","status":"ACTIVE","cash":"1000.50","buying_power":"2001","equity":"1000.50"}"#,
        )
        .unwrap();
        let account = account_from(raw).unwrap();
        assert_eq!(account.cash, 1000.5);
        assert_eq!(account.buying_power, 2001.0);
    }

    #[test]
    fn config_defaults_to_paper_endpoints() {
        let config =
            FileConfigAdapter::from_string("[alpaca]\napi_key = k\napi_secret = s\n").unwrap();
        let alpaca = AlpacaConfig::from_config(&config).unwrap();
        assert_eq!(alpaca.trading_url, PAPER_TRADING_URL);
        assert_eq!(alpaca.data_url, DATA_URL);
    }

    #[test]
    fn live_mode_switches_trading_url() {
        let config = FileConfigAdapter::from_string(
            "[alpaca]\napi_key = k\napi_secret = s\npaper = false\n",
        )
        .unwrap();
        let alpaca = AlpacaConfig::from_config(&config).unwrap();
        assert_eq!(alpaca.trading_url, LIVE_TRADING_URL);
    }

    #[test]
    fn stock_url_encodes_symbol_segment() {
        let config =
            FileConfigAdapter::from_string("[alpaca]\napi_key = k\napi_secret = s\n").unwrap();
        let adapter = AlpacaAdapter::from_config(&config).unwrap();
        assert_eq!(
            adapter.stock_url("BRK.B", "quotes/latest"),
            format!("{DATA_URL}/v2/stocks/BRK.B/quotes/latest")
        );
        assert_eq!(
            adapter.stock_url("X/../V2/ACCOUNT?", "trades/latest"),
            format!("{DATA_URL}/v2/stocks/X%2F..%2FV2%2FACCOUNT%3F/trades/latest")
        );
    }

    #[test]
    fn missing_secret_is_not_configured() {
        let config = FileConfigAdapter::from_string("[alpaca]\napi_key = k\n").unwrap();
        let err = AlpacaConfig::from_config(&config).unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured { ref key, .. } if key == "api_secret"));
    }
}
