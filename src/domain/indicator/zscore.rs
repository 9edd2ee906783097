//! Rolling z-score.
//!
//! ZSCORE(n)[i] = (x[i] - mean(W)) / stddev(W), W = x[i-n+1..=i]
//!
//! The deviation is the sample estimator (denominator n-1). A window with no
//! spread has no z-score, so n = 1 never produces a value.
//! Warmup: first (n-1) values are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_zscore(values: &[f64], lookback: usize) -> IndicatorSeries {
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let value = if lookback == 0 || i + 1 < lookback {
            None
        } else {
            window_zscore(&values[i + 1 - lookback..=i])
        };
        out.push(value);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::ZScore(lookback),
        values: out,
    }
}

/// z-score of the last element of `window` against the whole window.
fn window_zscore(window: &[f64]) -> Option<f64> {
    let (&current, _) = window.split_last()?;
    if window.iter().any(|v| !v.is_finite()) || window.iter().all(|&v| v == current) {
        return None;
    }

    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let sum_sq: f64 = window.iter().map(|v| (v - mean).powi(2)).sum();
    let std = (sum_sq / (n - 1.0)).sqrt();

    if std == 0.0 || !std.is_finite() {
        return None;
    }
    Some((current - mean) / std)
}
