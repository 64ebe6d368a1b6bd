//! Dollar-notional → share-quantity sizing with a quote-then-trade price chain.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::error::GatewayError;
use crate::domain::fallback::Attempt;
use crate::domain::order::{OrderRequest, ResolvedOrder};
use crate::ports::quote_port::QuotePort;

/// One step in the reference-price chain.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn reference_price(&self, symbol: &str) -> Attempt<f64>;
}

/// Latest quote: ask, or bid when no ask is posted.
pub struct QuotePrice<'a>(pub &'a dyn QuotePort);

/// Latest executed trade.
pub struct TradePrice<'a>(pub &'a dyn QuotePort);

#[async_trait]
impl PriceSource for QuotePrice<'_> {
    fn name(&self) -> &'static str {
        "quote"
    }

    async fn reference_price(&self, symbol: &str) -> Attempt<f64> {
        match self.0.latest_quote(symbol).await {
            Ok(quote) => Attempt::from_option(quote.usable_price(), "quote has no bid or ask"),
            Err(e) => Attempt::Next(e.to_string()),
        }
    }
}

#[async_trait]
impl PriceSource for TradePrice<'_> {
    fn name(&self) -> &'static str {
        "trade"
    }

    async fn reference_price(&self, symbol: &str) -> Attempt<f64> {
        match self.0.latest_trade(symbol).await {
            Ok(trade) => Attempt::from_option(trade.usable_price(), "trade has no price"),
            Err(e) => Attempt::Next(e.to_string()),
        }
    }
}

/// Share quantity and the price it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizedOrder {
    pub share_quantity: f64,
    pub reference_price: f64,
}

/// Round half away from zero to two decimal places.
pub fn round_shares(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First source in order that yields a price; `MarketUnavailable` if none do.
pub async fn resolve_reference_price(
    sources: &[&dyn PriceSource],
    symbol: &str,
) -> Result<f64, GatewayError> {
    for source in sources {
        match source.reference_price(symbol).await {
            Attempt::Hit(price) => {
                info!(symbol, source = source.name(), price, "reference price resolved");
                return Ok(price);
            }
            Attempt::Next(reason) => {
                warn!(symbol, source = source.name(), %reason, "price source missed");
            }
        }
    }
    Err(GatewayError::MarketUnavailable {
        symbol: symbol.to_string(),
    })
}

/// Convert `dollar_amount` into shares at the best available live price.
pub async fn size_order(
    quotes: &dyn QuotePort,
    symbol: &str,
    dollar_amount: f64,
) -> Result<SizedOrder, GatewayError> {
    let quote = QuotePrice(quotes);
    let trade = TradePrice(quotes);
    let sources: [&dyn PriceSource; 2] = [&quote, &trade];
    let reference_price = resolve_reference_price(&sources, symbol).await?;

    let share_quantity = round_shares(dollar_amount / reference_price);
    if share_quantity <= 0.0 {
        return Err(GatewayError::OrderTooSmall {
            symbol: symbol.to_string(),
            dollar_amount,
            reference_price,
        });
    }

    Ok(SizedOrder {
        share_quantity,
        reference_price,
    })
}

/// Size a validated request into a brokerage-ready order.
pub async fn resolve_order(
    quotes: &dyn QuotePort,
    request: &OrderRequest,
) -> Result<ResolvedOrder, GatewayError> {
    let sized = size_order(quotes, &request.symbol, request.dollar_amount).await?;
    Ok(ResolvedOrder {
        symbol: request.symbol.clone(),
        quantity: sized.share_quantity,
        reference_price: sized.reference_price,
        side: request.side,
        order_type: request.order_type,
        time_in_force: request.time_in_force,
    })
}
