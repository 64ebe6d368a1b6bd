//! Historical bars and symbol lookup port.

use async_trait::async_trait;

use crate::domain::error::GatewayError;
use crate::domain::interval::IntervalSpec;
use crate::domain::price_point::PricePoint;

#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Bars for `symbol` over the window/granularity, ascending by time.
    async fn fetch_history(
        &self,
        symbol: &str,
        spec: IntervalSpec,
    ) -> Result<Vec<PricePoint>, GatewayError>;

    /// Symbols the provider associates with a free-text query.
    async fn search_symbols(&self, query: &str) -> Result<Vec<String>, GatewayError>;

    /// Company name for a symbol, if the provider knows one.
    async fn display_name(&self, symbol: &str) -> Result<Option<String>, GatewayError>;
}
