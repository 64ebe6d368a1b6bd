//! INI file configuration adapter with environment overrides.
//!
//! Any `[section] key` may be overridden by `STOCKGATE_<SECTION>_<KEY>`.

use crate::domain::error::GatewayError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::collections::HashMap;
use std::path::Path;

pub const ENV_PREFIX: &str = "STOCKGATE_";

pub struct FileConfigAdapter {
    config: Ini,
    overrides: HashMap<String, String>,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| GatewayError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self {
            config,
            overrides: HashMap::new(),
        })
    }

    pub fn from_string(content: &str) -> Result<Self, GatewayError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| GatewayError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self {
            config,
            overrides: HashMap::new(),
        })
    }

    /// Layer `STOCKGATE_*` variables from the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env_overrides(std::env::vars())
    }

    /// Layer overrides from `(name, value)` pairs; names without the prefix are ignored.
    pub fn with_env_overrides<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if let Some(rest) = name.strip_prefix(ENV_PREFIX) {
                self.overrides.insert(rest.to_uppercase(), value);
            }
        }
        self
    }

    fn override_key(section: &str, key: &str) -> String {
        format!("{}_{}", section, key).to_uppercase()
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.overrides
            .get(&Self::override_key(section, key))
            .cloned()
            .or_else(|| self.config.get(section, key))
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}
