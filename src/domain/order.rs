//! Order request / resolved order types for the trading simulation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::GatewayError;
use crate::domain::symbol::parse_symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    Day,
    Gtc,
    Ioc,
    Fok,
}

impl FromStr for Side {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(unsupported("side", other)),
        }
    }
}

impl FromStr for OrderType {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            other => Err(unsupported("order type", other)),
        }
    }
}

impl FromStr for TimeInForce {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimeInForce::Day),
            "gtc" => Ok(TimeInForce::Gtc),
            "ioc" => Ok(TimeInForce::Ioc),
            "fok" => Ok(TimeInForce::Fok),
            other => Err(unsupported("time in force", other)),
        }
    }
}

fn unsupported(field: &str, value: &str) -> GatewayError {
    GatewayError::invalid_request(format!("unsupported {field} '{value}'"))
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
        }
    }
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Day => "day",
            TimeInForce::Gtc => "gtc",
            TimeInForce::Ioc => "ioc",
            TimeInForce::Fok => "fok",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client order intent expressed in dollars.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub dollar_amount: f64,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    /// Validates the symbol and amount; defaults mirror the trading form.
    pub fn new(
        symbol: &str,
        dollar_amount: f64,
        side: Option<Side>,
        order_type: Option<OrderType>,
        time_in_force: Option<TimeInForce>,
    ) -> Result<Self, GatewayError> {
        let symbol = parse_symbol(symbol)?;
        if !dollar_amount.is_finite() || dollar_amount <= 0.0 {
            return Err(GatewayError::invalid_request(
                "dollarAmount must be a positive number",
            ));
        }
        Ok(Self {
            symbol,
            dollar_amount,
            side: side.unwrap_or(Side::Buy),
            order_type: order_type.unwrap_or(OrderType::Market),
            time_in_force: time_in_force.unwrap_or(TimeInForce::Day),
        })
    }
}

/// An order sized in shares, ready for the brokerage.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOrder {
    pub symbol: String,
    pub quantity: f64,
    pub reference_price: f64,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
}

impl ResolvedOrder {
    /// Limit orders are pinned to the reference price.
    pub fn limit_price(&self) -> Option<f64> {
        match self.order_type {
            OrderType::Limit => Some(self.reference_price),
            OrderType::Market => None,
        }
    }
}

/// Brokerage acknowledgement of a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub id: String,
    pub symbol: String,
    pub qty: f64,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub status: String,
    pub reference_price: f64,
}

/// Paper account snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub status: String,
    pub cash: f64,
    pub buying_power: f64,
    pub equity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = OrderRequest::new(" aapl ", 100.0, None, None, None).unwrap();
        assert_eq!(req.symbol, "AAPL");
        assert_eq!(req.side, Side::Buy);
        assert_eq!(req.order_type, OrderType::Market);
        assert_eq!(req.time_in_force, TimeInForce::Day);
    }

    #[test]
    fn request_rejects_bad_amounts() {
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = OrderRequest::new("AAPL", amount, None, None, None).unwrap_err();
            assert!(matches!(err, GatewayError::InvalidRequest { .. }), "{amount}");
        }
    }

    #[test]
    fn request_rejects_blank_symbol() {
        assert!(OrderRequest::new("  ", 10.0, None, None, None).is_err());
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
        assert_eq!("Limit".parse::<OrderType>().unwrap(), OrderType::Limit);
        assert_eq!("gtc".parse::<TimeInForce>().unwrap(), TimeInForce::Gtc);
        assert!("short".parse::<Side>().is_err());
        assert!("stop".parse::<OrderType>().is_err());
    }

    #[test]
    fn limit_price_only_for_limit_orders() {
        let mut order = ResolvedOrder {
            symbol: "AAPL".into(),
            quantity: 1.0,
            reference_price: 150.0,
            side: Side::Buy,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
        };
        assert_eq!(order.limit_price(), None);
        order.order_type = OrderType::Limit;
        assert_eq!(order.limit_price(), Some(150.0));
    }

    #[test]
    fn placed_order_json_shape() {
        let placed = PlacedOrder {
            id: "abc".into(),
            symbol: "AAPL".into(),
            qty: 2.0,
            side: Side::Buy,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
            status: "accepted".into(),
            reference_price: 50.0,
        };
        let json = serde_json::to_value(&placed).unwrap();
        assert_eq!(json["type"], "market");
        assert_eq!(json["timeInForce"], "day");
        assert_eq!(json["referencePrice"], 50.0);
        assert_eq!(json["side"], "buy");
    }
}
