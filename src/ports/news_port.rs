//! News search port.

use async_trait::async_trait;

use crate::domain::error::GatewayError;
use crate::domain::news::NewsArticle;

#[async_trait]
pub trait NewsPort: Send + Sync {
    /// English articles matching `query`, most relevant first.
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, GatewayError>;
}
