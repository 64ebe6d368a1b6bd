//! Per-user watchlist and simulation handlers (session-protected).

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::domain::portfolio::{require_symbol, NewSimulation};

use super::auth::{current_user_id, AuthSession};
use super::handlers::number_field;
use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct TickerBody {
    #[serde(default)]
    pub ticker: String,
}

pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user_id(&auth_session)?;
    let portfolio = state.store.saved_stocks(&user_id)?;
    Ok(Json(json!({ "portfolio": portfolio })))
}

pub async fn save_stock(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    body: Result<Json<TickerBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user_id(&auth_session)?;
    let Json(body) = body?;
    let symbol = require_symbol(&body.ticker)?;
    state.store.save_stock(&user_id, &symbol)?;
    info!(%user_id, %symbol, "stock saved");
    Ok(Json(json!({ "message": format!("{symbol} saved"), "saved": true })))
}

pub async fn remove_stock(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    body: Result<Json<TickerBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user_id(&auth_session)?;
    let Json(body) = body?;
    let symbol = require_symbol(&body.ticker)?;
    let removed = state.store.remove_stock(&user_id, &symbol)?;
    let message = if removed {
        format!("{symbol} removed")
    } else {
        format!("{symbol} was not saved")
    };
    Ok(Json(json!({ "message": message, "removed": removed })))
}

pub async fn is_saved(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    body: Result<Json<TickerBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user_id(&auth_session)?;
    let Json(body) = body?;
    let symbol = require_symbol(&body.ticker)?;
    let saved = state.store.is_saved(&user_id, &symbol)?;
    Ok(Json(json!({ "isSaved": saved })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSimulationBody {
    #[serde(default)]
    pub name: String,
    pub starting_balance: Option<Value>,
    #[serde(default)]
    pub starting_ticker: String,
}

pub async fn create_simulation(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
    body: Result<Json<NewSimulationBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = current_user_id(&auth_session)?;
    let Json(body) = body?;
    let balance = number_field(body.starting_balance.as_ref(), "startingBalance")?;
    let new_sim = NewSimulation::new(&body.name, balance, &body.starting_ticker)?;
    let simulation = state.store.create_simulation(&user_id, &new_sim)?;
    info!(%user_id, simulation_id = %simulation.id, "simulation created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Simulation created", "simulation": simulation })),
    ))
}

pub async fn fetch_user_sims(
    State(state): State<Arc<AppState>>,
    auth_session: AuthSession,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user_id(&auth_session)?;
    let sims = state.store.simulations(&user_id)?;
    Ok(Json(json!({ "sims": sims })))
}
