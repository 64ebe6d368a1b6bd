//! Market, order, news and chat handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::domain::chat::build_conversation;
use crate::domain::error::GatewayError;
use crate::domain::news::{score_articles, NewsArticle, SentimentReport};
use crate::domain::order::{AccountSummary, OrderRequest};
use crate::domain::order_sizer::resolve_order;
use crate::domain::series::{get_series, SeriesResult};
use crate::domain::symbol::parse_symbol;
use crate::domain::ticker::resolve_tickers;

use super::{ApiError, AppState};

/// A JSON number, or a string holding one (form inputs arrive as strings).
pub(super) fn number_field(value: Option<&Value>, field: &str) -> Result<f64, GatewayError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| GatewayError::invalid_request(format!("{field} must be a number")))
}

fn optional_choice<T>(value: Option<&str>) -> Result<Option<T>, GatewayError>
where
    T: std::str::FromStr<Err = GatewayError>,
{
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>())
        .transpose()
}

pub async fn stock_graph(
    State(state): State<Arc<AppState>>,
    Path((symbol, interval)): Path<(String, String)>,
) -> Result<Json<SeriesResult>, ApiError> {
    let symbol = parse_symbol(&symbol)?;
    let series = get_series(state.market_data.as_ref(), &symbol, &interval).await?;
    Ok(Json(series))
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    pub query: Option<String>,
}

pub async fn autocomplete(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AutocompleteQuery>,
) -> Json<Value> {
    let query = params.query.unwrap_or_default();
    let suggestions = resolve_tickers(&state.curated, state.market_data.as_ref(), &query).await;
    Json(json!({ "suggestions": suggestions }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderBody {
    #[serde(default)]
    pub ticker: String,
    pub dollar_amount: Option<Value>,
    pub order_type: Option<String>,
    pub time_in_force: Option<String>,
    pub side: Option<String>,
}

impl PlaceOrderBody {
    fn into_request(self) -> Result<OrderRequest, GatewayError> {
        let dollar_amount = number_field(self.dollar_amount.as_ref(), "dollarAmount")?;
        OrderRequest::new(
            &self.ticker,
            dollar_amount,
            optional_choice(self.side.as_deref())?,
            optional_choice(self.order_type.as_deref())?,
            optional_choice(self.time_in_force.as_deref())?,
        )
    }
}

pub async fn place_order(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlaceOrderBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    let request = body.into_request()?;
    let resolved = resolve_order(state.quotes.as_ref(), &request).await?;
    let order = state.brokerage.submit_order(&resolved).await?;
    info!(
        symbol = %order.symbol,
        qty = order.qty,
        order_id = %order.id,
        "order placed"
    );
    Ok(Json(json!({ "message": "Order placed successfully", "order": order })))
}

pub async fn account(State(state): State<Arc<AppState>>) -> Result<Json<AccountSummary>, ApiError> {
    Ok(Json(state.brokerage.account().await?))
}

fn require_company(company: &str) -> Result<&str, GatewayError> {
    let company = company.trim();
    if company.is_empty() {
        Err(GatewayError::invalid_request("company is required"))
    } else {
        Ok(company)
    }
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    Path(company): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let company = require_company(&company)?;
    let articles: Vec<NewsArticle> = state.news.search(company).await?;
    Ok(Json(json!({ "news": articles })))
}

pub async fn news_sentiment(
    State(state): State<Arc<AppState>>,
    Path(company): Path<String>,
) -> Result<Json<SentimentReport>, ApiError> {
    let company = require_company(&company)?;
    let articles = state.news.search(company).await?;
    let report = score_articles(&state.sentiment, company, &articles);
    info!(
        company,
        scored = report.articles.len(),
        average = report.average,
        "news sentiment scored"
    );
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: String,
}

pub async fn investment_chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    let conversation = build_conversation(&body.message)?;
    let reply = state.chat.complete(&conversation).await?;
    Ok(Json(json!({ "response": reply })))
}

pub async fn server_test() -> Json<Value> {
    Json(json!({ "message": "Server OK" }))
}
