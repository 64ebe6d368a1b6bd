//! OpenAI-compatible chat-completion client (SambaNova by default).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::chat::{ChatMessage, SamplingParams};
use crate::domain::error::GatewayError;
use crate::ports::chat_port::ChatPort;
use crate::ports::config_port::ConfigPort;

const PROVIDER: &str = "chat";
pub const DEFAULT_BASE_URL: &str = "https://api.sambanova.ai/v1";
pub const DEFAULT_MODEL: &str = "Meta-Llama-3.1-8B-Instruct";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct ChatCompletionAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    sampling: SamplingParams,
}

impl ChatCompletionAdapter {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            sampling: SamplingParams::default(),
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, GatewayError> {
        let api_key = config.require_string("chat", "api_key")?;
        let base_url = config
            .get_string("chat", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = config
            .get_string("chat", "model")
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self::new(base_url, api_key, model)
    }

    fn request_body<'a>(&'a self, messages: &'a [ChatMessage]) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
            max_tokens: self.sampling.max_tokens,
        }
    }
}

fn first_reply(resp: CompletionResponse) -> Result<String, GatewayError> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GatewayError::provider(PROVIDER, "completion had no choices"))
}

#[async_trait]
impl ChatPort for ChatCompletionAdapter {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::provider(PROVIDER, format!("{}: {}", status, text)));
        }

        let body: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;
        let reply = first_reply(body)?;
        debug!(model = %self.model, chars = reply.len(), "chat completion received");
        Ok(reply)
    }
}
