//! Configuration access port trait.

use crate::domain::error::GatewayError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// A key that must be present and non-blank; absence is `NotConfigured`.
    fn require_string(&self, section: &str, key: &str) -> Result<String, GatewayError> {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GatewayError::not_configured(section, key))
    }
}
