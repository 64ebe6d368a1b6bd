//! Domain error types.

/// Top-level error type for stockgate.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid interval '{given}': expected one of minutes, days, months, years")]
    InvalidInterval { given: String },

    #[error("no data found for {symbol} over interval '{interval}'")]
    NoDataFound { symbol: String, interval: String },

    #[error("no usable price for {symbol}; the market may be closed or the symbol invalid")]
    MarketUnavailable { symbol: String },

    #[error(
        "order too small: ${dollar_amount} of {symbol} at {reference_price} rounds to zero shares"
    )]
    OrderTooSmall {
        symbol: String,
        dollar_amount: f64,
        reference_price: f64,
    },

    #[error("{provider} request failed: {reason}")]
    Provider { provider: String, reason: String },

    #[error("authentication failed: {reason}")]
    Auth { reason: String },

    #[error("missing config key [{section}] {key}")]
    NotConfigured { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn provider(provider: &str, reason: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn not_configured(section: &str, key: &str) -> Self {
        Self::NotConfigured {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<r2d2::Error> for GatewayError {
    fn from(err: r2d2::Error) -> Self {
        Self::Database {
            reason: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(err: rusqlite::Error) -> Self {
        Self::DatabaseQuery {
            reason: err.to_string(),
        }
    }
}

impl GatewayError {
    /// Process exit status reported by the CLI for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            GatewayError::NotConfigured { .. }
            | GatewayError::ConfigInvalid { .. }
            | GatewayError::ConfigParse { .. } => 2,
            GatewayError::Database { .. } | GatewayError::DatabaseQuery { .. } => 3,
            GatewayError::Provider { .. } => 4,
            _ => 1,
        }
    }
}

impl From<&GatewayError> for std::process::ExitCode {
    fn from(err: &GatewayError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_interval_names_valid_set() {
        let err = GatewayError::InvalidInterval {
            given: "weeks".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("weeks"));
        for name in ["minutes", "days", "months", "years"] {
            assert!(msg.contains(name), "missing {name} in {msg}");
        }
    }

    #[test]
    fn not_configured_names_section_and_key() {
        let err = GatewayError::not_configured("alpaca", "api_key");
        assert_eq!(err.to_string(), "missing config key [alpaca] api_key");
    }

    #[test]
    fn exit_codes_by_category() {
        let cfg = GatewayError::not_configured("news", "api_key");
        assert_eq!(cfg.exit_status(), 2);
        let db = GatewayError::Database { reason: "x".into() };
        assert_eq!(db.exit_status(), 3);
        let provider = GatewayError::provider("yahoo", "timeout");
        assert_eq!(provider.exit_status(), 4);
        let auth = GatewayError::Auth { reason: "bad".into() };
        assert_eq!(auth.exit_status(), 1);
    }
}
