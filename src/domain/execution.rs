//! Fill simulation.
//!
//! Orders fill in full, immediately, at the price they were submitted at.
//! There is no slippage, commission, partial fill, or rejection.

use super::event::{Fill, OrderIntent};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionSimulator;

impl ExecutionSimulator {
    pub fn new() -> Self {
        ExecutionSimulator
    }

    pub fn execute(&self, order: &OrderIntent, price: f64) -> Fill {
        Fill {
            side: order.side,
            quantity: order.quantity,
            price,
        }
    }
}
