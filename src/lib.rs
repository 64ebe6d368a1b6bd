//! stockgate: HTTP gateway between a stock-trading simulator front end and its
//! market-data, brokerage, news, and chat providers.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
