//! Investment-assistant chat prompt building.

use serde::Serialize;

use crate::domain::error::GatewayError;

pub const SYSTEM_PROMPT: &str = "You are a helpful investment assistant for a stock research and \
paper-trading app. Answer questions about stocks, markets, and personal investing clearly and \
concisely. Explain financial terms in plain language. You do not give personalised financial \
advice; remind the user to do their own research before making investment decisions.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.1,
            max_tokens: 300,
        }
    }
}

/// System prompt followed by the user's message.
pub fn build_conversation(user_message: &str) -> Result<Vec<ChatMessage>, GatewayError> {
    let trimmed = user_message.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::invalid_request("message is required"));
    }
    Ok(vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(trimmed)])
}
