//! Configuration validation.
//!
//! Runs on the assembled [`BacktestConfig`] after file values and command
//! line overrides have been merged, before any data is loaded.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::BarbtError;
use crate::domain::strategy::{StrategyKind, StrategyParams};
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), BarbtError> {
    validate_initial_capital(config.initial_capital)?;
    validate_strategy_params(config.strategy, &config.params)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> BarbtError {
    BarbtError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_capital(value: f64) -> Result<(), BarbtError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

pub fn validate_strategy_params(
    kind: StrategyKind,
    params: &StrategyParams,
) -> Result<(), BarbtError> {
    match kind {
        StrategyKind::MovingAverageCross => {
            if params.short_window == 0 {
                return Err(invalid(
                    "strategy",
                    "short_window",
                    "short_window must be at least 1",
                ));
            }
            if params.short_window >= params.long_window {
                return Err(invalid(
                    "strategy",
                    "long_window",
                    "long_window must be greater than short_window",
                ));
            }
        }
        StrategyKind::Momentum => {
            if params.lookback < 2 {
                return Err(invalid(
                    "strategy",
                    "lookback",
                    "lookback must be at least 2",
                ));
            }
        }
        StrategyKind::MeanReversion => {
            if params.window == 0 {
                return Err(invalid(
                    "strategy",
                    "window",
                    "window must be at least 1",
                ));
            }
            if !(params.band > 0.0 && params.band < 1.0) {
                return Err(invalid(
                    "strategy",
                    "band",
                    "band must be between 0 and 1",
                ));
            }
        }
    }
    Ok(())
}

pub fn validate_date_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(), BarbtError> {
    match (start_date, end_date) {
        (Some(start), Some(end)) if start > end => Err(invalid(
            "backtest",
            "start_date",
            "start_date must not be after end_date",
        )),
        _ => Ok(()),
    }
}
