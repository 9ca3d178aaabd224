//! Plain-text summary report.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BarbtError;
use crate::ports::report_port::ReportPort;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct TextReport {
    pub show_trades: bool,
    pub show_equity: bool,
}

impl ReportPort for TextReport {
    fn write(&self, result: &BacktestResult, out: &mut dyn Write) -> Result<(), BarbtError> {
        writeln!(out, "=== {} ===", result.strategy)?;
        writeln!(out, "Bars Processed:   {}", result.ticks)?;
        writeln!(out, "Initial Capital:  {:.2}", result.initial_capital)?;
        writeln!(out, "Final Capital:    {:.2}", result.final_capital)?;
        writeln!(out, "Total Return:     {:.2}%", result.total_return * 100.0)?;
        writeln!(out, "Sharpe Ratio:     {:.3}", result.sharpe)?;
        writeln!(out, "Max Drawdown:     -{:.1}%", result.max_drawdown * 100.0)?;
        writeln!(out, "Trades:           {}", result.trades.len())?;

        if self.show_trades && !result.trades.is_empty() {
            writeln!(out, "\n=== Trades ===")?;
            for t in &result.trades {
                writeln!(out, "  {}  {:<4} {:>8} @ {:.2}", t.date, t.side, t.quantity, t.price)?;
            }
        }

        if self.show_equity {
            writeln!(out, "\n=== Equity Curve ===")?;
            for p in &result.equity_curve {
                writeln!(out, "  {}  {:.2}", p.date, p.equity)?;
            }
        }
        Ok(())
    }
}
