//! Cash/position accounting and equity tracking.

use chrono::NaiveDate;
use serde::Serialize;

use super::error::BarbtError;
use super::event::{Direction, Fill, OrderIntent, Side, Signal};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Single-writer ledger for one long-only position.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioLedger {
    initial_capital: f64,
    cash: f64,
    position: u64,
    entry_price: Option<f64>,
    equity_curve: Vec<f64>,
}

impl PortfolioLedger {
    pub fn new(initial_capital: f64) -> Self {
        PortfolioLedger {
            initial_capital,
            cash: initial_capital,
            position: 0,
            entry_price: None,
            equity_curve: Vec::new(),
        }
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Price of the most recent buy. Left in place after the position is
    /// sold, so it is only meaningful while `position() > 0`.
    pub fn entry_price(&self) -> Option<f64> {
        self.entry_price
    }

    pub fn equity_curve(&self) -> &[f64] {
        &self.equity_curve
    }

    /// Translate a strategy signal into an order.
    ///
    /// LONG while flat buys as many whole shares as cash allows; EXIT while
    /// holding sells everything. A LONG that cannot afford a single share
    /// produces no order.
    pub fn on_signal(&self, signal: Signal, price: f64) -> Option<OrderIntent> {
        match signal.direction {
            Direction::Long if self.position == 0 => {
                let estimate = (self.cash / price).floor();
                if !estimate.is_finite() || estimate < 1.0 {
                    return None;
                }
                // cash / price can round up onto a whole number.
                let mut quantity = estimate as u64;
                while quantity > 0 && quantity as f64 * price > self.cash {
                    quantity -= 1;
                }
                if quantity == 0 {
                    return None;
                }
                Some(OrderIntent {
                    side: Side::Buy,
                    quantity,
                })
            }
            Direction::Exit if self.position > 0 => Some(OrderIntent {
                side: Side::Sell,
                quantity: self.position,
            }),
            _ => None,
        }
    }

    pub fn on_fill(&mut self, fill: &Fill) {
        let value = fill.quantity as f64 * fill.price;
        match fill.side {
            Side::Buy => {
                self.cash -= value;
                self.position += fill.quantity;
                self.entry_price = Some(fill.price);
            }
            Side::Sell => {
                self.cash += value;
                self.position = 0;
            }
        }
    }

    /// Mark to market at `price` and append to the equity curve.
    pub fn update_equity(&mut self, price: f64) -> f64 {
        let equity = self.cash + self.position as f64 * price;
        self.equity_curve.push(equity);
        equity
    }

    pub fn equity_series(&self, dates: &[NaiveDate]) -> Result<Vec<EquityPoint>, BarbtError> {
        if dates.len() != self.equity_curve.len() {
            return Err(BarbtError::LengthMismatch {
                equity: self.equity_curve.len(),
                dates: dates.len(),
            });
        }
        Ok(dates
            .iter()
            .zip(&self.equity_curve)
            .map(|(&date, &equity)| EquityPoint { date, equity })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(side: Side, quantity: u64, price: f64) -> Fill {
        Fill {
            side,
            quantity,
            price,
        }
    }

    #[test]
    fn new_ledger() {
        let ledger = PortfolioLedger::new(1000.0);
        assert!((ledger.cash() - 1000.0).abs() < f64::EPSILON);
        assert!((ledger.initial_capital() - 1000.0).abs() < f64::EPSILON);
        assert_eq!(ledger.position(), 0);
        assert!(ledger.entry_price().is_none());
        assert!(ledger.equity_curve().is_empty());
    }

    #[test]
    fn long_while_flat_buys_whole_shares() {
        let ledger = PortfolioLedger::new(1000.0);
        let order = ledger.on_signal(Signal::long(), 300.0).unwrap();
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.quantity, 3);
    }

    #[test]
    fn buy_never_spends_more_than_cash() {
        // 54217.35 / 2.97 rounds to exactly 18255.0, but 18255 * 2.97 > 54217.35.
        let mut ledger = PortfolioLedger::new(54217.35);
        let order = ledger.on_signal(Signal::long(), 2.97).unwrap();
        assert!(order.quantity as f64 * 2.97 <= 54217.35);
        assert_eq!(order.quantity, 18254);

        ledger.on_fill(&fill(Side::Buy, order.quantity, 2.97));
        assert!(ledger.cash() >= 0.0);
    }

    #[test]
    fn long_while_holding_is_ignored() {
        let mut ledger = PortfolioLedger::new(1000.0);
        ledger.on_fill(&fill(Side::Buy, 3, 300.0));
        assert!(ledger.on_signal(Signal::long(), 100.0).is_none());
    }

    #[test]
    fn long_without_enough_cash_for_one_share() {
        let ledger = PortfolioLedger::new(50.0);
        assert!(ledger.on_signal(Signal::long(), 51.0).is_none());
    }

    #[test]
    fn exit_while_flat_is_ignored() {
        let ledger = PortfolioLedger::new(1000.0);
        assert!(ledger.on_signal(Signal::exit(), 100.0).is_none());
    }

    #[test]
    fn exit_while_holding_sells_everything() {
        let mut ledger = PortfolioLedger::new(1000.0);
        ledger.on_fill(&fill(Side::Buy, 7, 120.0));
        let order = ledger.on_signal(Signal::exit(), 130.0).unwrap();
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.quantity, 7);
    }

    #[test]
    fn buy_fill_updates_cash_position_entry() {
        let mut ledger = PortfolioLedger::new(1000.0);
        ledger.on_fill(&fill(Side::Buy, 3, 300.0));
        assert!((ledger.cash() - 100.0).abs() < f64::EPSILON);
        assert_eq!(ledger.position(), 3);
        assert_eq!(ledger.entry_price(), Some(300.0));
    }

    #[test]
    fn sell_fill_flattens_and_keeps_entry_price() {
        let mut ledger = PortfolioLedger::new(1000.0);
        ledger.on_fill(&fill(Side::Buy, 3, 300.0));
        ledger.on_fill(&fill(Side::Sell, 3, 350.0));
        assert!((ledger.cash() - 1150.0).abs() < 1e-9);
        assert_eq!(ledger.position(), 0);
        assert_eq!(ledger.entry_price(), Some(300.0));
    }

    #[test]
    fn update_equity_marks_to_market() {
        let mut ledger = PortfolioLedger::new(1000.0);
        assert!((ledger.update_equity(100.0) - 1000.0).abs() < f64::EPSILON);
        ledger.on_fill(&fill(Side::Buy, 10, 90.0));
        assert!((ledger.update_equity(95.0) - 1050.0).abs() < 1e-9);
        assert_eq!(ledger.equity_curve().len(), 2);
    }

    #[test]
    fn equity_series_zips_dates() {
        let mut ledger = PortfolioLedger::new(100.0);
        ledger.update_equity(1.0);
        ledger.update_equity(1.0);
        let dates = [
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        ];
        let series = ledger.equity_series(&dates).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].date, dates[1]);
        assert!((series[1].equity - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn equity_series_rejects_mismatched_dates() {
        let mut ledger = PortfolioLedger::new(100.0);
        ledger.update_equity(1.0);
        let err = ledger.equity_series(&[]).unwrap_err();
        assert!(matches!(
            err,
            BarbtError::LengthMismatch {
                equity: 1,
                dates: 0
            }
        ));
    }
}
