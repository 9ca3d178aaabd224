//! CSV file data adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv` files in the layout produced by common
//! daily-bar exports: `Date,Open,High,Low,Close,Adj Close,Volume`. Columns
//! are located by header name, so their order does not matter. `Adj Close`
//! is optional and falls back to `Close`.

use crate::domain::error::BarbtError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    adj_close: Option<usize>,
    volume: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, BarbtError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| BarbtError::Data {
                reason: format!("missing {} column", name),
            })
        };

        Ok(Columns {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            adj_close: find("adj close"),
            volume: require("volume")?,
        })
    }
}

fn parse_price(record: &StringRecord, idx: usize, name: &str) -> Result<f64, BarbtError> {
    let raw = record.get(idx).ok_or_else(|| BarbtError::Data {
        reason: format!("missing {} value", name),
    })?;
    raw.trim().parse().map_err(|e| BarbtError::Data {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Parse bars from CSV text. Rows are returned sorted by date.
    pub fn parse_bars(
        content: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, BarbtError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| BarbtError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Columns::from_headers(headers)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BarbtError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(cols.date).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                BarbtError::Data {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            let close = parse_price(&record, cols.close, "close")?;
            let adj_close = match cols.adj_close {
                Some(idx) => parse_price(&record, idx, "adj close")?,
                None => close,
            };

            bars.push(Bar {
                date,
                open: parse_price(&record, cols.open, "open")?,
                high: parse_price(&record, cols.high, "high")?,
                low: parse_price(&record, cols.low, "low")?,
                close,
                adj_close,
                // Some exports write volume as a float.
                volume: parse_price(&record, cols.volume, "volume")? as i64,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, BarbtError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| BarbtError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let bars = Self::parse_bars(&content, start_date, end_date)?;
        if bars.is_empty() {
            return Err(BarbtError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BarbtError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| BarbtError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| BarbtError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
