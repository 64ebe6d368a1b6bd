//! HTTP gateway adapter.
//!
//! JSON API consumed by the browser front end. Market, order, news and chat
//! routes are public; watchlist and simulation routes require a session.

mod auth;
mod error;
mod handlers;
mod portfolio;

pub use auth::{hash_password, AuthSession, Backend, Credentials, User};
pub use error::{status_from_error, ApiError};
pub use handlers::*;
pub use portfolio::*;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use axum_login::{login_required, AuthManagerLayerBuilder};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{
    cookie::{Key, SameSite},
    Expiry, SessionManagerLayer,
};
use tower_sessions_rusqlite_store::RusqliteStore;

use crate::domain::config_validation::{
    session_key_bytes, DEFAULT_CORS_ORIGIN, DEFAULT_SESSION_LIFETIME,
};
use crate::domain::error::GatewayError;
use crate::domain::sentiment::SentimentAnalyzer;
use crate::domain::ticker::CuratedList;
use crate::ports::brokerage_port::BrokeragePort;
use crate::ports::chat_port::ChatPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::identity_port::IdentityPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::news_port::NewsPort;
use crate::ports::quote_port::QuotePort;
use crate::ports::store_port::StorePort;

/// Collaborators shared by every request; constructed once at startup.
pub struct AppState {
    pub market_data: Arc<dyn MarketDataPort>,
    pub quotes: Arc<dyn QuotePort>,
    pub brokerage: Arc<dyn BrokeragePort>,
    pub news: Arc<dyn NewsPort>,
    pub chat: Arc<dyn ChatPort>,
    pub store: Arc<dyn StorePort + Send + Sync>,
    pub identity: Arc<dyn IdentityPort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
    pub curated: CuratedList,
    pub sentiment: SentimentAnalyzer,
}

fn session_db_error(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::Database {
        reason: format!("session store: {}", err),
    }
}

fn session_key(config: &dyn ConfigPort) -> Result<Key, GatewayError> {
    let key_bytes = session_key_bytes(config)?;
    Key::try_from(key_bytes.as_slice()).map_err(|e| GatewayError::ConfigInvalid {
        section: "auth".to_string(),
        key: "session_secret".to_string(),
        reason: e.to_string(),
    })
}

/// Sessions share the application database file; `:memory:` keeps them in process.
async fn session_store(config: &dyn ConfigPort) -> Result<RusqliteStore, GatewayError> {
    let db_path = config.require_string("database", "sqlite_path")?;
    let conn = if db_path == ":memory:" {
        tokio_rusqlite::Connection::open_in_memory().await
    } else {
        tokio_rusqlite::Connection::open(&db_path).await
    }
    .map_err(session_db_error)?;

    let store = RusqliteStore::new(conn);
    store.migrate().await.map_err(session_db_error)?;
    Ok(store)
}

fn cors_layer(config: &dyn ConfigPort) -> Result<CorsLayer, GatewayError> {
    let origin = config
        .get_string("server", "cors_origin")
        .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
    let origin = HeaderValue::from_str(origin.trim()).map_err(|e| GatewayError::ConfigInvalid {
        section: "server".to_string(),
        key: "cors_origin".to_string(),
        reason: e.to_string(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}

pub async fn build_router(state: AppState) -> Result<Router, GatewayError> {
    let config = state.config.as_ref();
    let lifetime = config.get_int("auth", "session_lifetime", DEFAULT_SESSION_LIFETIME);
    let session_layer = SessionManagerLayer::new(session_store(config).await?)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(lifetime)))
        .with_signed(session_key(config)?);
    let cors = cors_layer(config)?;
    let backend = Backend::new(state.identity.clone());
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let protected = Router::new()
        .route("/get-portfolio", get(portfolio::get_portfolio))
        .route("/save-stock", post(portfolio::save_stock))
        .route("/remove-stock", post(portfolio::remove_stock))
        .route("/is-saved", post(portfolio::is_saved))
        .route("/create-new-simulation", post(portfolio::create_simulation))
        .route(
            "/fetch-user-sims",
            post(portfolio::fetch_user_sims).get(portfolio::fetch_user_sims),
        )
        .route_layer(login_required!(Backend));

    let router = Router::new()
        .route("/stock-graph/{symbol}/{interval}", get(handlers::stock_graph))
        .route("/autocomplete", get(handlers::autocomplete))
        .route("/place-order", post(handlers::place_order))
        .route("/account", get(handlers::account))
        .route("/news/{company}", get(handlers::news))
        .route("/news-sentiment/{company}", get(handlers::news_sentiment))
        .route("/sambanova-investment-chat", post(handlers::investment_chat))
        .route(
            "/server-test",
            post(handlers::server_test).get(handlers::server_test),
        )
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(protected)
        .layer(auth_layer)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(Arc::new(state));

    Ok(router)
}
