#![allow(dead_code)]

use chrono::NaiveDate;
use barbt::domain::error::BarbtError;
pub use barbt::domain::ohlcv::Bar;
use barbt::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, BarbtError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BarbtError::Data {
                reason: reason.clone(),
            });
        }
        let bars: Vec<Bar> = self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .collect();
        if bars.is_empty() {
            return Err(BarbtError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BarbtError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per calendar day starting 2025-01-01, with the given closes.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar::from_close(date(2025, 1, 1) + chrono::Duration::days(i as i64), close))
        .collect()
}

/// Deterministic oscillating series with a mild upward drift.
pub fn wave_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.05 * t + 12.0 * (t / 9.0).sin() + 4.0 * (t / 3.0).cos()
        })
        .collect()
}

pub fn csv_content(closes: &[f64]) -> String {
    let mut s = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for bar in bars_from_closes(closes) {
        s.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            bar.date,
            bar.close,
            bar.close + 1.0,
            bar.close - 1.0,
            bar.close,
            bar.close,
            1_000_000
        ));
    }
    s
}
