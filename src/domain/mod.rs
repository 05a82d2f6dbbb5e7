//! Core domain types and logic.

pub mod ohlcv;
pub mod params;
pub mod indicator;
pub mod signal;
pub mod simulator;
pub mod backtest;
pub mod error;
