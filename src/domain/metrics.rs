//! Performance metrics over a date-indexed equity series.
//!
//! Sharpe uses the sample standard deviation (n - 1 denominator) of daily
//! returns and annualises with a 252 trading-day year. No risk-free rate is
//! subtracted. Ratios are rounded to three decimals, ties to even.

use serde::Serialize;

use super::error::BarbtError;
use super::portfolio::EquityPoint;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub total_return: f64,
    pub trading_days: usize,
}

impl Metrics {
    pub fn compute(series: &[EquityPoint]) -> Result<Self, BarbtError> {
        let values: Vec<f64> = series.iter().map(|p| p.equity).collect();
        let sharpe_ratio = sharpe_ratio(&values)?;
        let max_drawdown = max_drawdown(&values);

        let total_return = match (values.first(), values.last()) {
            (Some(&first), Some(&last)) if first > 0.0 => last / first - 1.0,
            _ => 0.0,
        };

        Ok(Metrics {
            sharpe_ratio,
            max_drawdown,
            total_return,
            trading_days: values.len(),
        })
    }
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

/// Period-over-period percentage change; the first point has no return.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

pub fn sharpe_ratio(values: &[f64]) -> Result<f64, BarbtError> {
    if values.len() < 2 {
        return Err(BarbtError::InsufficientHistory {
            points: values.len(),
            reason: "need at least 2 to compute returns".into(),
        });
    }

    let returns = daily_returns(values);
    if returns.len() < 2 {
        return Err(BarbtError::InsufficientHistory {
            points: values.len(),
            reason: "need at least 2 returns for a sample standard deviation".into(),
        });
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if !stddev.is_finite() || !mean.is_finite() {
        return Err(BarbtError::InsufficientHistory {
            points: values.len(),
            reason: "returns are not finite".into(),
        });
    }
    if stddev == 0.0 {
        return Err(BarbtError::InsufficientHistory {
            points: values.len(),
            reason: "returns have zero variance".into(),
        });
    }

    Ok(round3(TRADING_DAYS_PER_YEAR.sqrt() * mean / stddev))
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    round3(max_dd)
}
