//! RSI (Relative Strength Index) over an arbitrary series.
//!
//! Uses simple rolling means for average gain/loss:
//! - delta[i] = x[i] - x[i-1] (undefined at i = 0 or next to an undefined input)
//! - avg_gain, avg_loss = mean of gains/losses over the last n deltas
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100
//! If both are 0 the series did not move and RSI is undefined.
//!
//! Warmup: first n values are undefined (need n price changes).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_rsi(values: &[Option<f64>], period: usize) -> IndicatorSeries {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: out,
        };
    }

    let deltas: Vec<Option<f64>> = std::iter::once(None)
        .chain(values.windows(2).map(|w| match (w[0], w[1]) {
            (Some(prev), Some(curr)) => Some(curr - prev),
            _ => None,
        }))
        .collect();

    for i in 0..values.len() {
        let value = if period == 0 || i < period {
            None
        } else {
            window_rsi(&deltas[i + 1 - period..=i])
        };
        out.push(value);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values: out,
    }
}

fn window_rsi(deltas: &[Option<f64>]) -> Option<f64> {
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for delta in deltas {
        let d = (*delta)?;
        if !d.is_finite() {
            return None;
        }
        gain_sum += d.max(0.0);
        loss_sum += (-d).max(0.0);
    }

    let n = deltas.len() as f64;
    let avg_gain = gain_sum / n;
    let avg_loss = loss_sum / n;

    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { Some(100.0) } else { None };
    }
    Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
}
