//! Backtest engine and event loop.
//!
//! Each tick pushes a market event onto a FIFO queue and drains it:
//! market → signal → order → fill. Equity is recorded after the queue is
//! empty, once per tick whether or not anything traded.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::data_cursor::DataCursor;
use super::error::BarbtError;
use super::event::{Event, Side};
use super::execution::ExecutionSimulator;
use super::metrics::Metrics;
use super::ohlcv::Bar;
use super::portfolio::{EquityPoint, PortfolioLedger};
use super::strategy::{Strategy, StrategyKind, StrategyParams};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub strategy: StrategyKind,
    pub params: StrategyParams,
}

impl BacktestConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        BacktestConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            strategy,
            params: StrategyParams::default(),
        }
    }
}

/// One applied fill, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub side: Side,
    pub quantity: u64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub strategy: String,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub total_return: f64,
    pub ticks: usize,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
}

pub struct Backtest {
    cursor: DataCursor,
    strategy: Box<dyn Strategy>,
    ledger: PortfolioLedger,
    execution: ExecutionSimulator,
    trades: Vec<TradeRecord>,
}

impl Backtest {
    pub fn new(
        bars: Vec<Bar>,
        strategy: Box<dyn Strategy>,
        ledger: PortfolioLedger,
        execution: ExecutionSimulator,
    ) -> Self {
        Backtest {
            cursor: DataCursor::new(bars),
            strategy,
            ledger,
            execution,
            trades: Vec::new(),
        }
    }

    pub fn from_config(bars: Vec<Bar>, config: &BacktestConfig) -> Self {
        Self::new(
            bars,
            config.strategy.build(&config.params),
            PortfolioLedger::new(config.initial_capital),
            ExecutionSimulator::new(),
        )
    }

    pub fn ledger(&self) -> &PortfolioLedger {
        &self.ledger
    }

    /// Process a single bar. Returns the equity recorded for the tick, or
    /// `None` once the data is exhausted.
    pub fn step(&mut self) -> Option<f64> {
        let (date, price) = {
            let bar = self.cursor.advance()?;
            (bar.date, bar.close)
        };

        let mut queue = VecDeque::from([Event::Market]);
        while let Some(event) = queue.pop_front() {
            match event {
                Event::Market => {
                    if let Some(signal) = self.strategy.generate(&self.cursor) {
                        debug!(%date, price, direction = ?signal.direction, "signal");
                        queue.push_back(Event::Signal(signal));
                    }
                }
                Event::Signal(signal) => {
                    if let Some(order) = self.ledger.on_signal(signal, price) {
                        queue.push_back(Event::Order(order));
                    }
                }
                Event::Order(order) => {
                    queue.push_back(Event::Fill(self.execution.execute(&order, price)));
                }
                Event::Fill(fill) => {
                    self.ledger.on_fill(&fill);
                    debug!(
                        %date,
                        side = %fill.side,
                        quantity = fill.quantity,
                        price = fill.price,
                        cash = self.ledger.cash(),
                        "fill"
                    );
                    self.trades.push(TradeRecord {
                        date,
                        side: fill.side,
                        quantity: fill.quantity,
                        price: fill.price,
                    });
                }
            }
        }

        Some(self.ledger.update_equity(price))
    }

    /// Run until the data is exhausted, then compute metrics.
    pub fn run(mut self) -> Result<BacktestResult, BarbtError> {
        if self.cursor.is_empty() {
            return Err(BarbtError::Data {
                reason: "no bars to simulate".into(),
            });
        }

        info!(
            strategy = self.strategy.name(),
            bars = self.cursor.len(),
            lookback = self.strategy.lookback(),
            capital = self.ledger.initial_capital(),
            "starting backtest"
        );

        while self.step().is_some() {}

        let dates = self.cursor.dates_consumed();
        let equity_curve = self.ledger.equity_series(&dates)?;
        let metrics = Metrics::compute(&equity_curve)?;
        let final_capital = self.ledger.equity_curve().last().copied().unwrap_or(0.0);

        info!(
            ticks = equity_curve.len(),
            trades = self.trades.len(),
            final_capital,
            "backtest complete"
        );

        Ok(BacktestResult {
            strategy: self.strategy.name().to_string(),
            initial_capital: self.ledger.initial_capital(),
            final_capital,
            sharpe: metrics.sharpe_ratio,
            max_drawdown: metrics.max_drawdown,
            total_return: metrics.total_return,
            ticks: equity_curve.len(),
            trades: self.trades,
            equity_curve,
        })
    }
}
