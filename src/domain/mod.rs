//! Core domain types and simulation logic.

pub mod ohlcv;
pub mod event;
pub mod data_cursor;
pub mod strategy;
pub mod portfolio;
pub mod execution;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
