//! Concrete adapter implementations for ports.

pub mod alpaca_adapter;
pub mod chat_completion_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod newsapi_adapter;
pub mod sqlite_adapter;
pub mod yahoo_adapter;
pub mod web;
