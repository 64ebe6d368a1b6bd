//! Configuration validation.
//!
//! Checks every required key and value shape before the server binds.

use crate::domain::error::GatewayError;
use crate::ports::config_port::ConfigPort;
use std::net::SocketAddr;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_POOL_SIZE: i64 = 4;
pub const DEFAULT_SESSION_LIFETIME: i64 = 86_400;

/// Hex characters in a 64-byte session signing key.
const SESSION_SECRET_HEX_LEN: usize = 128;

/// Keys that must be present and non-blank, in reporting order.
pub const REQUIRED_KEYS: &[(&str, &str)] = &[
    ("database", "sqlite_path"),
    ("auth", "session_secret"),
    ("alpaca", "api_key"),
    ("alpaca", "api_secret"),
    ("news", "api_key"),
    ("chat", "api_key"),
];

pub fn validate_gateway_config(config: &dyn ConfigPort) -> Result<(), GatewayError> {
    validate_required_keys(config)?;
    validate_listen(config)?;
    validate_pool_size(config)?;
    validate_session_secret(config)?;
    validate_session_lifetime(config)?;
    validate_urls(config)?;
    Ok(())
}

fn validate_required_keys(config: &dyn ConfigPort) -> Result<(), GatewayError> {
    for (section, key) in REQUIRED_KEYS {
        config.require_string(section, key)?;
    }
    Ok(())
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), GatewayError> {
    let listen = config
        .get_string("server", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    listen
        .trim()
        .parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| GatewayError::ConfigInvalid {
            section: "server".to_string(),
            key: "listen".to_string(),
            reason: format!("'{listen}' is not a socket address"),
        })
}

fn validate_pool_size(config: &dyn ConfigPort) -> Result<(), GatewayError> {
    let value = config.get_int("database", "pool_size", DEFAULT_POOL_SIZE);
    if value < 1 {
        return Err(GatewayError::ConfigInvalid {
            section: "database".to_string(),
            key: "pool_size".to_string(),
            reason: "pool_size must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Decode `[auth] session_secret` into the 64-byte cookie signing key.
pub fn session_key_bytes(config: &dyn ConfigPort) -> Result<Vec<u8>, GatewayError> {
    let secret = config.require_string("auth", "session_secret")?;
    let invalid = |reason: &str| GatewayError::ConfigInvalid {
        section: "auth".to_string(),
        key: "session_secret".to_string(),
        reason: reason.to_string(),
    };
    if secret.len() != SESSION_SECRET_HEX_LEN {
        return Err(invalid("session_secret must be 128 hex characters"));
    }
    hex::decode(&secret).map_err(|_| invalid("session_secret must be hexadecimal"))
}

fn validate_session_secret(config: &dyn ConfigPort) -> Result<(), GatewayError> {
    session_key_bytes(config).map(|_| ())
}

fn validate_session_lifetime(config: &dyn ConfigPort) -> Result<(), GatewayError> {
    let value = config.get_int("auth", "session_lifetime", DEFAULT_SESSION_LIFETIME);
    if value <= 0 {
        return Err(GatewayError::ConfigInvalid {
            section: "auth".to_string(),
            key: "session_lifetime".to_string(),
            reason: "session_lifetime must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_urls(config: &dyn ConfigPort) -> Result<(), GatewayError> {
    let optional = [
        ("server", "cors_origin"),
        ("alpaca", "data_url"),
        ("alpaca", "trading_url"),
        ("yahoo", "base_url"),
        ("news", "base_url"),
        ("chat", "base_url"),
    ];
    for (section, key) in optional {
        if let Some(value) = config.get_string(section, key) {
            let value = value.trim();
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(GatewayError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: format!("'{value}' must be an http(s) URL"),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn secret() -> String {
        "ab".repeat(64)
    }

    fn valid_ini() -> String {
        format!(
            r#"
[server]
listen = 0.0.0.0:8080

[database]
sqlite_path = /tmp/stockgate.db

[auth]
session_secret = {}

[alpaca]
api_key = key
api_secret = secret

[news]
api_key = news-key

[chat]
api_key = chat-key
"#,
            secret()
        )
    }

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_gateway_config(&make_config(&valid_ini())).is_ok());
    }

    #[test]
    fn first_missing_key_reported() {
        let config = make_config("[database]\nsqlite_path = db.sqlite\n");
        let err = validate_gateway_config(&config).unwrap_err();
        assert!(
            matches!(err, GatewayError::NotConfigured { ref section, ref key } if section == "auth" && key == "session_secret")
        );
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let ini = valid_ini().replace("api_key = news-key", "api_key =   ");
        let err = validate_gateway_config(&make_config(&ini)).unwrap_err();
        assert!(
            matches!(err, GatewayError::NotConfigured { ref section, .. } if section == "news")
        );
    }

    #[test]
    fn short_session_secret_rejected() {
        let ini = valid_ini().replace(&secret(), "abcd");
        let err = validate_gateway_config(&make_config(&ini)).unwrap_err();
        assert!(
            matches!(err, GatewayError::ConfigInvalid { ref key, .. } if key == "session_secret")
        );
    }

    #[test]
    fn non_hex_session_secret_rejected() {
        let ini = valid_ini().replace(&secret(), &"zz".repeat(64));
        let err = validate_gateway_config(&make_config(&ini)).unwrap_err();
        assert!(
            matches!(err, GatewayError::ConfigInvalid { ref key, .. } if key == "session_secret")
        );
    }

    #[test]
    fn session_key_decodes_to_64_bytes() {
        let key = session_key_bytes(&make_config(&valid_ini())).unwrap();
        assert_eq!(key.len(), 64);
        assert!(key.iter().all(|b| *b == 0xab));
    }

    #[test]
    fn bad_listen_address_rejected() {
        let ini = valid_ini().replace("0.0.0.0:8080", "localhost");
        let err = validate_gateway_config(&make_config(&ini)).unwrap_err();
        assert!(matches!(err, GatewayError::ConfigInvalid { ref key, .. } if key == "listen"));
    }

    #[test]
    fn zero_pool_size_rejected() {
        let ini = valid_ini().replace(
            "sqlite_path = /tmp/stockgate.db",
            "sqlite_path = /tmp/stockgate.db\npool_size = 0",
        );
        let err = validate_gateway_config(&make_config(&ini)).unwrap_err();
        assert!(matches!(err, GatewayError::ConfigInvalid { ref key, .. } if key == "pool_size"));
    }

    #[test]
    fn negative_session_lifetime_rejected() {
        let ini = valid_ini().replace(
            "[auth]\n",
            "[auth]\nsession_lifetime = -5\n",
        );
        let err = validate_gateway_config(&make_config(&ini)).unwrap_err();
        assert!(
            matches!(err, GatewayError::ConfigInvalid { ref key, .. } if key == "session_lifetime")
        );
    }

    #[test]
    fn non_http_base_url_rejected() {
        let ini = format!("{}\n[yahoo]\nbase_url = ftp://example.com\n", valid_ini());
        let err = validate_gateway_config(&make_config(&ini)).unwrap_err();
        assert!(matches!(err, GatewayError::ConfigInvalid { ref key, .. } if key == "base_url"));
    }
}
