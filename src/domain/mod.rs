//! Core domain types and logic.

pub mod error;
pub mod interval;
pub mod price_point;
pub mod series;
pub mod fallback;
pub mod quote;
pub mod order;
pub mod order_sizer;
pub mod symbol;
pub mod ticker;
pub mod news;
pub mod sentiment;
pub mod chat;
pub mod user;
pub mod portfolio;
pub mod config_validation;
