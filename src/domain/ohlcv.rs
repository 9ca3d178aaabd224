//! OHLCV bar representation.

use chrono::NaiveDate;

/// One daily price observation. Built once at load time and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

impl Bar {
    /// Bar with every price field set to `close`. Handy for fixtures and
    /// sources that only carry closing prices.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Bar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume: 0,
        }
    }
}
