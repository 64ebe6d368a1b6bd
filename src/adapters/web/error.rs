//! JSON error responses for the web adapter.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info};

use crate::domain::error::GatewayError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "Not logged in",
            "this endpoint requires an authenticated session",
        )
    }
}

pub fn status_from_error(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::InvalidInterval { .. }
        | GatewayError::MarketUnavailable { .. }
        | GatewayError::OrderTooSmall { .. }
        | GatewayError::InvalidRequest { .. }
        | GatewayError::Auth { .. } => StatusCode::BAD_REQUEST,
        GatewayError::NoDataFound { .. } => StatusCode::NOT_FOUND,
        GatewayError::Provider { .. }
        | GatewayError::NotConfigured { .. }
        | GatewayError::ConfigInvalid { .. }
        | GatewayError::ConfigParse { .. }
        | GatewayError::Database { .. }
        | GatewayError::DatabaseQuery { .. }
        | GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn summary(err: &GatewayError) -> &'static str {
    match err {
        GatewayError::InvalidInterval { .. } => "Invalid interval",
        GatewayError::NoDataFound { .. } => "No data found",
        GatewayError::MarketUnavailable { .. } => "Market unavailable",
        GatewayError::OrderTooSmall { .. } => "Order too small",
        GatewayError::InvalidRequest { .. } => "Invalid request",
        GatewayError::Auth { .. } => "Authentication failed",
        GatewayError::Provider { .. } => "Upstream provider error",
        _ => "Internal server error",
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = status_from_error(&err);
        if status.is_server_error() {
            error!(error = %err, "request failed");
        } else {
            info!(error = %err, status = status.as_u16(), "request rejected");
        }
        Self::new(status, summary(&err), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::invalid_request(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "message": self.message,
            "error": self.detail,
        });
        (self.status, Json(body)).into_response()
    }
}
