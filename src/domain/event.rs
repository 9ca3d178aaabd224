//! Event payloads passed between components within a single tick.

use serde::Serialize;
use std::fmt;

/// Direction of a strategy signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub direction: Direction,
}

impl Signal {
    pub fn long() -> Self {
        Signal {
            direction: Direction::Long,
        }
    }

    pub fn exit() -> Self {
        Signal {
            direction: Direction::Exit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderIntent {
    pub side: Side,
    pub quantity: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub side: Side,
    pub quantity: u64,
    pub price: f64,
}

/// Everything that can flow through the per-tick event queue. `Market`
/// announces a new bar; its data is read from the cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Market,
    Signal(Signal),
    Order(OrderIntent),
    Fill(Fill),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_constructors() {
        assert_eq!(Signal::long().direction, Direction::Long);
        assert_eq!(Signal::exit().direction, Direction::Exit);
    }

    #[test]
    fn side_display() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn side_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"SELL\"");
    }
}
