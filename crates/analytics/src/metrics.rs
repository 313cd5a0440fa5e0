//! Pure, stateless metric functions over a slice of daily bars.
//!
//! Every metric requires at least two bars and reports its value rounded to
//! [`DECIMAL_PLACES`] with banker's rounding.

use crate::error::AnalyticsError;
use core_types::PriceBar;
use rust_decimal::Decimal;

/// Number of decimal places every reported metric is rounded to.
pub const DECIMAL_PLACES: u32 = 3;

/// The minimum number of bars any metric can be computed on.
pub const MIN_BARS: usize = 2;

/// Volatility needs two returns for a sample deviation, hence three bars.
pub const MIN_VOLATILITY_BARS: usize = 3;

/// Sample standard deviation of the bar-over-bar simple returns of the close.
///
/// Not annualized. Two bars give a single return, whose sample deviation is
/// undefined, so at least [`MIN_VOLATILITY_BARS`] are required.
pub fn volatility(bars: &[PriceBar]) -> Result<Decimal, AnalyticsError> {
    ensure_enough_bars(bars, MIN_VOLATILITY_BARS, "volatility")?;

    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
    if closes[..closes.len() - 1].iter().any(|close| *close == 0.0) {
        return Err(AnalyticsError::DivisionByZero("volatility".to_string()));
    }

    let returns = pct_changes(&closes);
    round_metric(sample_std_dev(&returns), "volatility")
}

/// The largest fractional drop from the running maximum `high` to the bar's `low`.
///
/// The running maximum at bar `i` covers bars `0..=i`, so it always includes the
/// bar's own high.
pub fn max_drawdown(bars: &[PriceBar]) -> Result<Decimal, AnalyticsError> {
    ensure_enough_bars(bars, MIN_BARS, "max drawdown")?;

    let mut running_high = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;

    for bar in bars {
        running_high = running_high.max(bar.high);
        if running_high <= 0.0 {
            continue;
        }
        let drawdown = (running_high - bar.low) / running_high;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }

    round_metric(max_drawdown, "max drawdown")
}

/// Fractional change from the first close to the last close.
pub fn performance(bars: &[PriceBar]) -> Result<Decimal, AnalyticsError> {
    ensure_enough_bars(bars, MIN_BARS, "performance")?;

    let first = bars[0].close;
    let last = bars[bars.len() - 1].close;
    if first == 0.0 {
        return Err(AnalyticsError::DivisionByZero("performance".to_string()));
    }

    round_metric((last - first) / first, "performance")
}

/// Simple returns between consecutive values: `(v[i] - v[i-1]) / v[i-1]`.
pub fn pct_changes(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Standard deviation with an `n - 1` denominator. Zero for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);

    variance.sqrt()
}

fn ensure_enough_bars(bars: &[PriceBar], min: usize, metric: &str) -> Result<(), AnalyticsError> {
    if bars.len() < min {
        return Err(AnalyticsError::NotEnoughData(format!(
            "{} needs at least {} bars, got {}",
            metric,
            min,
            bars.len()
        )));
    }
    Ok(())
}

fn round_metric(value: f64, metric: &str) -> Result<Decimal, AnalyticsError> {
    if !value.is_finite() {
        return Err(AnalyticsError::Calculation(format!(
            "{} is not a finite number ({})",
            metric, value
        )));
    }

    // Keep every binary digit so values just past a half-way point round away from it.
    let value = Decimal::from_f64_retain(value).ok_or_else(|| {
        AnalyticsError::Calculation(format!("{} ({}) does not fit in a decimal", metric, value))
    })?;

    Ok(value.round_dp(DECIMAL_PLACES))
}
