//! Signal-generating strategies.
//!
//! Every strategy is long-only and tracks its own [`PositionState`]. The
//! state moves only when the strategy itself emits a signal, so a strategy
//! can never say LONG twice in a row or EXIT while flat.

use std::fmt;
use std::str::FromStr;

use super::data_cursor::DataCursor;
use super::error::BarbtError;
use super::event::Signal;

/// Two-state position machine each strategy carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long,
}

impl PositionState {
    /// Apply this tick's entry/exit conditions. An entry condition only
    /// matters while flat and an exit condition only while long.
    pub fn step(&mut self, enter: bool, exit: bool) -> Option<Signal> {
        match *self {
            PositionState::Flat if enter => {
                *self = PositionState::Long;
                Some(Signal::long())
            }
            PositionState::Long if exit => {
                *self = PositionState::Flat;
                Some(Signal::exit())
            }
            _ => None,
        }
    }
}

pub trait Strategy {
    fn name(&self) -> &'static str;

    /// Number of consumed bars needed before the strategy can signal.
    fn lookback(&self) -> usize;

    fn state(&self) -> PositionState;

    /// Called once per tick. `None` while warming up or when nothing changes.
    fn generate(&mut self, cursor: &DataCursor) -> Option<Signal>;
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Short/long simple moving average crossover.
#[derive(Debug, Clone)]
pub struct MovingAverageCross {
    short_window: usize,
    long_window: usize,
    state: PositionState,
}

impl MovingAverageCross {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        MovingAverageCross {
            short_window,
            long_window,
            state: PositionState::Flat,
        }
    }
}

impl Default for MovingAverageCross {
    fn default() -> Self {
        Self::new(20, 50)
    }
}

impl Strategy for MovingAverageCross {
    fn name(&self) -> &'static str {
        "Moving Average Cross"
    }

    fn lookback(&self) -> usize {
        self.long_window
    }

    fn state(&self) -> PositionState {
        self.state
    }

    fn generate(&mut self, cursor: &DataCursor) -> Option<Signal> {
        let prices = cursor.window(self.long_window)?;
        let short = mean(&prices[prices.len() - self.short_window.min(prices.len())..]);
        let long = mean(prices);
        self.state.step(short > long, short < long)
    }
}

/// Price change across a trailing lookback (252 bars, about one year).
#[derive(Debug, Clone)]
pub struct Momentum {
    lookback: usize,
    state: PositionState,
}

impl Momentum {
    pub fn new(lookback: usize) -> Self {
        Momentum {
            lookback,
            state: PositionState::Flat,
        }
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(252)
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &'static str {
        "Momentum"
    }

    fn lookback(&self) -> usize {
        self.lookback
    }

    fn state(&self) -> PositionState {
        self.state
    }

    fn generate(&mut self, cursor: &DataCursor) -> Option<Signal> {
        let prices = cursor.window(self.lookback)?;
        let (first, last) = (prices.first()?, prices.last()?);
        let momentum = last - first;
        self.state.step(momentum > 0.0, momentum < 0.0)
    }
}

/// Buy when the close drops `band` below its trailing mean, sell when it
/// rises `band` above it.
#[derive(Debug, Clone)]
pub struct MeanReversion {
    window: usize,
    band: f64,
    state: PositionState,
}

impl MeanReversion {
    pub fn new(window: usize, band: f64) -> Self {
        MeanReversion {
            window,
            band,
            state: PositionState::Flat,
        }
    }
}

impl Default for MeanReversion {
    fn default() -> Self {
        Self::new(20, 0.03)
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &'static str {
        "Mean Reversion"
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn state(&self) -> PositionState {
        self.state
    }

    fn generate(&mut self, cursor: &DataCursor) -> Option<Signal> {
        let prices = cursor.window(self.window)?;
        let avg = mean(prices);
        let current = *prices.last()?;
        self.state.step(
            current < avg * (1.0 - self.band),
            current > avg * (1.0 + self.band),
        )
    }
}

/// Strategy identifiers accepted on the command line and in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    MovingAverageCross,
    Momentum,
    MeanReversion,
}

impl FromStr for StrategyKind {
    type Err = BarbtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mac" => Ok(StrategyKind::MovingAverageCross),
            "momentum" => Ok(StrategyKind::Momentum),
            "mr" => Ok(StrategyKind::MeanReversion),
            _ => Err(BarbtError::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::MovingAverageCross => write!(f, "mac"),
            StrategyKind::Momentum => write!(f, "momentum"),
            StrategyKind::MeanReversion => write!(f, "mr"),
        }
    }
}

/// Tunable parameters for all strategies. Only the fields belonging to the
/// selected [`StrategyKind`] are read.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub short_window: usize,
    pub long_window: usize,
    pub lookback: usize,
    pub window: usize,
    pub band: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            short_window: 20,
            long_window: 50,
            lookback: 252,
            window: 20,
            band: 0.03,
        }
    }
}

impl StrategyKind {
    pub fn build(self, params: &StrategyParams) -> Box<dyn Strategy> {
        match self {
            StrategyKind::MovingAverageCross => Box::new(MovingAverageCross::new(
                params.short_window,
                params.long_window,
            )),
            StrategyKind::Momentum => Box::new(Momentum::new(params.lookback)),
            StrategyKind::MeanReversion => {
                Box::new(MeanReversion::new(params.window, params.band))
            }
        }
    }
}
