//! Paper-trading brokerage port.

use async_trait::async_trait;

use crate::domain::error::GatewayError;
use crate::domain::order::{AccountSummary, PlacedOrder, ResolvedOrder};

#[async_trait]
pub trait BrokeragePort: Send + Sync {
    async fn account(&self) -> Result<AccountSummary, GatewayError>;

    async fn submit_order(&self, order: &ResolvedOrder) -> Result<PlacedOrder, GatewayError>;
}
