//! Hosted chat-completion port.

use async_trait::async_trait;

use crate::domain::chat::ChatMessage;
use crate::domain::error::GatewayError;

#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Reply text of the first completion choice.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError>;
}
