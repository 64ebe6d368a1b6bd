//! NewsAPI `everything` search client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::error::GatewayError;
use crate::domain::news::NewsArticle;
use crate::ports::config_port::ConfigPort;
use crate::ports::news_port::NewsPort;

const PROVIDER: &str = "newsapi";
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<RawArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    source: Option<RawSource>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl From<RawArticle> for NewsArticle {
    fn from(raw: RawArticle) -> Self {
        NewsArticle {
            title: raw.title,
            description: raw.description,
            content: raw.content,
            url: raw.url,
            source: raw.source.and_then(|s| s.name),
            published_at: raw.published_at,
        }
    }
}

pub struct NewsApiAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiAdapter {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent("stockgate/0.1")
            .build()
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, GatewayError> {
        let api_key = config.require_string("news", "api_key")?;
        let base_url = config
            .get_string("news", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, api_key)
    }
}

fn articles_from(resp: EverythingResponse) -> Result<Vec<NewsArticle>, GatewayError> {
    if resp.status != "ok" {
        let reason = resp
            .message
            .or(resp.code)
            .unwrap_or_else(|| format!("status '{}'", resp.status));
        return Err(GatewayError::provider(PROVIDER, reason));
    }
    Ok(resp.articles.into_iter().map(NewsArticle::from).collect())
}

#[async_trait]
impl NewsPort for NewsApiAdapter {
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, GatewayError> {
        let url = format!("{}/v2/everything", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[("q", query), ("language", "en"), ("sortBy", "relevancy")])
            .send()
            .await
            .map_err(|e| GatewayError::provider(PROVIDER, e.to_string()))?;

        // Error bodies share the success envelope, so decode before checking status.
        let status = resp.status();
        let body: EverythingResponse = resp.json().await.map_err(|e| {
            GatewayError::provider(PROVIDER, format!("{}: {}", status, e))
        })?;
        let articles = articles_from(body)?;
        debug!(query, count = articles.len(), "news fetched");
        Ok(articles)
    }
}
