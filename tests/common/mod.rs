#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use stockgate::adapters::sqlite_adapter::SqliteAdapter;
use stockgate::adapters::web::{build_router, AppState};
use stockgate::domain::chat::ChatMessage;
use stockgate::domain::error::GatewayError;
use stockgate::domain::interval::IntervalSpec;
use stockgate::domain::news::NewsArticle;
use stockgate::domain::order::{AccountSummary, PlacedOrder, ResolvedOrder};
use stockgate::domain::price_point::PricePoint;
use stockgate::domain::quote::{LastTrade, Quote};
use stockgate::domain::sentiment::SentimentAnalyzer;
use stockgate::domain::ticker::CuratedList;
use stockgate::ports::brokerage_port::BrokeragePort;
use stockgate::ports::chat_port::ChatPort;
use stockgate::ports::config_port::ConfigPort;
use stockgate::ports::market_data_port::MarketDataPort;
use stockgate::ports::news_port::NewsPort;
use stockgate::ports::quote_port::QuotePort;

pub const TEST_SESSION_SECRET: &str = "\
    0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef\
    0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

/// Daily bars starting 2024-01-02, closing at 101, 102, ...
pub fn generate_points(n: usize) -> Vec<PricePoint> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap().fixed_offset();
    (0..n)
        .map(|i| {
            let base = 100.0 + i as f64;
            PricePoint {
                timestamp: start + Duration::days(i as i64),
                open: base,
                high: base + 2.0,
                low: base - 2.0,
                close: base + 1.0,
            }
        })
        .collect()
}

#[derive(Default)]
pub struct MockMarketData {
    pub history: HashMap<String, Vec<PricePoint>>,
    pub search_results: Vec<String>,
    pub names: HashMap<String, String>,
    pub search_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.history.insert(symbol.to_string(), points);
        self
    }

    pub fn with_search(mut self, symbols: &[&str]) -> Self {
        self.search_results = symbols.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_name(mut self, symbol: &str, name: &str) -> Self {
        self.names.insert(symbol.to_string(), name.to_string());
        self
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataPort for MockMarketData {
    async fn fetch_history(
        &self,
        symbol: &str,
        _spec: IntervalSpec,
    ) -> Result<Vec<PricePoint>, GatewayError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.history.get(symbol).cloned().unwrap_or_default())
    }

    async fn search_symbols(&self, _query: &str) -> Result<Vec<String>, GatewayError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.search_results.clone())
    }

    async fn display_name(&self, symbol: &str) -> Result<Option<String>, GatewayError> {
        Ok(self.names.get(symbol).cloned())
    }
}

/// Quote and trade responses; `None` makes the corresponding call fail.
#[derive(Default)]
pub struct MockQuotes {
    pub quote: Option<Quote>,
    pub trade: Option<LastTrade>,
}

impl MockQuotes {
    pub fn ask(price: f64) -> Self {
        Self {
            quote: Some(Quote {
                ask: Some(price),
                bid: None,
            }),
            trade: None,
        }
    }

    pub fn trade_only(price: f64) -> Self {
        Self {
            quote: Some(Quote::default()),
            trade: Some(LastTrade { price }),
        }
    }
}

#[async_trait]
impl QuotePort for MockQuotes {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, GatewayError> {
        self.quote
            .ok_or_else(|| GatewayError::provider("mock", format!("no quote for {symbol}")))
    }

    async fn latest_trade(&self, symbol: &str) -> Result<LastTrade, GatewayError> {
        self.trade
            .ok_or_else(|| GatewayError::provider("mock", format!("no trade for {symbol}")))
    }
}

#[derive(Default)]
pub struct MockBroker {
    pub submitted: Mutex<Vec<ResolvedOrder>>,
}

impl MockBroker {
    pub fn submitted(&self) -> Vec<ResolvedOrder> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrokeragePort for MockBroker {
    async fn account(&self) -> Result<AccountSummary, GatewayError> {
        Ok(AccountSummary {
            id: "acct-1".to_string(),
            status: "ACTIVE".to_string(),
            cash: 100_000.0,
            buying_power: 200_000.0,
            equity: 100_000.0,
        })
    }

    async fn submit_order(&self, order: &ResolvedOrder) -> Result<PlacedOrder, GatewayError> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(order.clone());
        Ok(PlacedOrder {
            id: format!("order-{}", submitted.len()),
            symbol: order.symbol.clone(),
            qty: order.quantity,
            side: order.side,
            order_type: order.order_type,
            time_in_force: order.time_in_force,
            status: "accepted".to_string(),
            reference_price: order.reference_price,
        })
    }
}

pub fn article(title: &str, description: &str, content: Option<&str>) -> NewsArticle {
    NewsArticle {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        content: content.map(str::to_string),
        url: Some(format!("https://news.example.com/{}", title.len())),
        source: Some("Example Wire".to_string()),
        published_at: Some("2024-05-01T12:00:00Z".to_string()),
    }
}

#[derive(Default)]
pub struct MockNews {
    pub articles: Vec<NewsArticle>,
    pub queries: Mutex<Vec<String>>,
}

#[async_trait]
impl NewsPort for MockNews {
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, GatewayError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.articles.clone())
    }
}

pub struct MockChat {
    pub reply: String,
    pub received: Mutex<Vec<Vec<ChatMessage>>>,
}

impl Default for MockChat {
    fn default() -> Self {
        Self {
            reply: "Diversify across sectors.".to_string(),
            received: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatPort for MockChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        self.received.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

pub struct TestConfigPort;

impl ConfigPort for TestConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match (section, key) {
            ("database", "sqlite_path") => Some(":memory:".to_string()),
            ("auth", "session_secret") => Some(TEST_SESSION_SECRET.to_string()),
            _ => None,
        }
    }

    fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
        default
    }

    fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
        default
    }

    fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
        default
    }
}

/// Mock collaborators kept by the test so it can inspect them after requests.
pub struct TestProviders {
    pub market_data: Arc<MockMarketData>,
    pub quotes: Arc<MockQuotes>,
    pub broker: Arc<MockBroker>,
    pub news: Arc<MockNews>,
    pub chat: Arc<MockChat>,
}

impl Default for TestProviders {
    fn default() -> Self {
        Self {
            market_data: Arc::new(
                MockMarketData::new().with_history("AAPL", generate_points(20)),
            ),
            quotes: Arc::new(MockQuotes::ask(150.0)),
            broker: Arc::new(MockBroker::default()),
            news: Arc::new(MockNews::default()),
            chat: Arc::new(MockChat::default()),
        }
    }
}

pub async fn create_app(providers: &TestProviders) -> Router {
    let db = Arc::new(SqliteAdapter::in_memory().unwrap());
    db.initialize_schema().unwrap();

    let state = AppState {
        market_data: providers.market_data.clone(),
        quotes: providers.quotes.clone(),
        brokerage: providers.broker.clone(),
        news: providers.news.clone(),
        chat: providers.chat.clone(),
        store: db.clone(),
        identity: db,
        config: Arc::new(TestConfigPort),
        curated: CuratedList::default(),
        sentiment: SentimentAnalyzer::default(),
    };
    build_router(state).await.unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` pairs from every Set-Cookie header, ready for a Cookie header.
pub fn cookie_header(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|sc| sc.split(';').next().unwrap_or("").to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
