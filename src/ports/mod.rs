//! Port traits for every external collaborator.

pub mod brokerage_port;
pub mod chat_port;
pub mod config_port;
pub mod identity_port;
pub mod market_data_port;
pub mod news_port;
pub mod quote_port;
pub mod store_port;
