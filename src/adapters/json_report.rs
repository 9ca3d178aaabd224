//! JSON report for downstream tooling (charting, notebooks).

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BarbtError;
use crate::ports::report_port::ReportPort;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport {
    pub pretty: bool,
}

impl ReportPort for JsonReport {
    fn write(&self, result: &BacktestResult, out: &mut dyn Write) -> Result<(), BarbtError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, result)?;
        } else {
            serde_json::to_writer(&mut *out, result)?;
        }
        writeln!(out)?;
        Ok(())
    }
}
