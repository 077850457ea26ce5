//! MCC Context Library
//!
//! Multi-timeframe market-context snapshots over exchange candle data

pub mod coinglass;
pub mod config;
pub mod exchange;
pub mod server;
pub mod session;
pub mod structure;
pub mod types;
