//! Coarse chart interval selectors and their provider sampling specs.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::GatewayError;

/// Client-facing time-range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalName {
    Minutes,
    Days,
    Months,
    Years,
}

/// How far back the provider should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackWindow {
    SevenDays,
    OneMonth,
    OneYear,
    FiveYears,
}

/// Width of a single provider bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    FiveMinutes,
    OneDay,
    OneWeek,
    OneMonth,
}

/// Resolved (window, granularity) pair for a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSpec {
    pub window: LookbackWindow,
    pub granularity: Granularity,
}

impl IntervalName {
    pub const ALL: [IntervalName; 4] = [
        IntervalName::Minutes,
        IntervalName::Days,
        IntervalName::Months,
        IntervalName::Years,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalName::Minutes => "minutes",
            IntervalName::Days => "days",
            IntervalName::Months => "months",
            IntervalName::Years => "years",
        }
    }

    pub fn spec(&self) -> IntervalSpec {
        let (window, granularity) = match self {
            IntervalName::Minutes => (LookbackWindow::SevenDays, Granularity::FiveMinutes),
            IntervalName::Days => (LookbackWindow::OneMonth, Granularity::OneDay),
            IntervalName::Months => (LookbackWindow::OneYear, Granularity::OneWeek),
            IntervalName::Years => (LookbackWindow::FiveYears, Granularity::OneMonth),
        };
        IntervalSpec {
            window,
            granularity,
        }
    }
}

impl FromStr for IntervalName {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntervalName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| GatewayError::InvalidInterval {
                given: s.to_string(),
            })
    }
}

impl fmt::Display for IntervalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LookbackWindow {
    /// Yahoo-style `range` parameter.
    pub fn as_range(&self) -> &'static str {
        match self {
            LookbackWindow::SevenDays => "7d",
            LookbackWindow::OneMonth => "1mo",
            LookbackWindow::OneYear => "1y",
            LookbackWindow::FiveYears => "5y",
        }
    }
}

impl Granularity {
    /// Yahoo-style `interval` parameter.
    pub fn as_interval(&self) -> &'static str {
        match self {
            Granularity::FiveMinutes => "5m",
            Granularity::OneDay => "1d",
            Granularity::OneWeek => "1wk",
            Granularity::OneMonth => "1mo",
        }
    }
}
