//! Data access port trait.

use crate::domain::error::BarbtError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol`, sorted by date, optionally clipped to an inclusive
    /// date range.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, BarbtError>;

    fn list_symbols(&self) -> Result<Vec<String>, BarbtError>;
}
