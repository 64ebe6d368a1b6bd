//! Ticker symbol validation.
//!
//! Symbols end up in provider URL paths, so only the characters real tickers
//! use are accepted: letters, digits, `.`, `-`, `^` (indices) and `=`
//! (currencies and futures).

use crate::domain::error::GatewayError;

pub const MAX_SYMBOL_LEN: usize = 15;

/// Trim and upper-case `input`, rejecting anything that is not a plausible ticker.
pub fn parse_symbol(input: &str) -> Result<String, GatewayError> {
    let symbol = input.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        return Err(GatewayError::invalid_request("ticker is required"));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(GatewayError::invalid_request(format!(
            "ticker is longer than {MAX_SYMBOL_LEN} characters"
        )));
    }
    if let Some(ch) = symbol.chars().find(|&c| !is_symbol_char(c)) {
        return Err(GatewayError::invalid_request(format!(
            "ticker contains invalid character '{ch}'"
        )));
    }
    Ok(symbol)
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '^' | '=')
}
