//! Latest quote / latest trade port.

use async_trait::async_trait;

use crate::domain::error::GatewayError;
use crate::domain::quote::{LastTrade, Quote};

#[async_trait]
pub trait QuotePort: Send + Sync {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, GatewayError>;

    async fn latest_trade(&self, symbol: &str) -> Result<LastTrade, GatewayError>;
}
