//! Report output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BarbtError;
use std::io::Write;

/// Port for presenting a finished backtest.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, out: &mut dyn Write) -> Result<(), BarbtError>;
}
