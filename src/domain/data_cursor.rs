//! Sequential cursor over a single symbol's bars.
//!
//! The cursor only ever exposes bars it has already consumed, so anything
//! reading through it (strategies in particular) cannot see the future.

use chrono::NaiveDate;

use super::ohlcv::Bar;

#[derive(Debug, Clone)]
pub struct DataCursor {
    bars: Vec<Bar>,
    closes: Vec<f64>,
    ptr: usize,
}

impl DataCursor {
    pub fn new(bars: Vec<Bar>) -> Self {
        let closes = bars.iter().map(|b| b.close).collect();
        DataCursor {
            bars,
            closes,
            ptr: 0,
        }
    }

    /// Move to the next bar. Returns `None` once the sequence is exhausted,
    /// and keeps returning `None` on every later call.
    pub fn advance(&mut self) -> Option<&Bar> {
        if self.ptr >= self.bars.len() {
            return None;
        }
        self.ptr += 1;
        self.bars.get(self.ptr - 1)
    }

    pub fn current_bar(&self) -> Option<&Bar> {
        self.ptr.checked_sub(1).and_then(|i| self.bars.get(i))
    }

    pub fn current_price(&self) -> Option<f64> {
        self.current_bar().map(|b| b.close)
    }

    pub fn current_date(&self) -> Option<NaiveDate> {
        self.current_bar().map(|b| b.date)
    }

    /// The last `n` closes ending at the current bar, inclusive.
    /// `None` until at least `n` bars have been consumed.
    pub fn window(&self, n: usize) -> Option<&[f64]> {
        if self.ptr < n {
            return None;
        }
        Some(&self.closes[self.ptr - n..self.ptr])
    }

    pub fn consumed(&self) -> usize {
        self.ptr
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates_consumed(&self) -> Vec<NaiveDate> {
        self.bars[..self.ptr].iter().map(|b| b.date).collect()
    }
}
