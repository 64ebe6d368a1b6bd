//! Saved-stock watchlist and paper-trading simulation records.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::error::GatewayError;
use crate::domain::symbol::parse_symbol;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedStock {
    pub symbol: String,
    pub saved_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateOpened {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl From<NaiveDate> for DateOpened {
    fn from(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub id: String,
    pub name: String,
    pub starting_balance: f64,
    pub simulated_cash: f64,
    pub profit_loss: f64,
    pub win_rate: f64,
    pub starting_ticker: String,
    pub date_opened: DateOpened,
}

/// Validated input for a new simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSimulation {
    pub name: String,
    pub starting_balance: f64,
    pub starting_ticker: String,
}

impl NewSimulation {
    pub fn new(
        name: &str,
        starting_balance: f64,
        starting_ticker: &str,
    ) -> Result<Self, GatewayError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GatewayError::invalid_request("simulation name is required"));
        }
        if !starting_balance.is_finite() || starting_balance <= 0.0 {
            return Err(GatewayError::invalid_request(
                "startingBalance must be a positive number",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            starting_balance,
            starting_ticker: normalize_symbol(starting_ticker),
        })
    }

    /// Fresh simulation: all cash, no trades yet.
    pub fn open(&self, id: String, opened: NaiveDate) -> Simulation {
        Simulation {
            id,
            name: self.name.clone(),
            starting_balance: self.starting_balance,
            simulated_cash: self.starting_balance,
            profit_loss: 0.0,
            win_rate: 0.0,
            starting_ticker: self.starting_ticker.clone(),
            date_opened: opened.into(),
        }
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Validated ticker from a request body.
pub fn require_symbol(symbol: &str) -> Result<String, GatewayError> {
    parse_symbol(symbol)
}
