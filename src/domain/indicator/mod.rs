//! Rolling indicators over the aligned pair.
//!
//! This module provides types for representing indicator output:
//! - `IndicatorType`: indicator identity + parameters, used as a column label
//! - `IndicatorSeries`: one optional value per aligned row (`None` = undefined)
//! - `RsiSource`: which derived series the RSI is computed on
//!
//! Indicators never fail on short or degenerate input; they report `None`
//! where there is not enough history or the math is undefined.

pub mod rsi;
pub mod zscore;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    ZScore(usize),
    Rsi(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::ZScore(lookback) => write!(f, "ZSCORE({})", lookback),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

/// Input series for the RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RsiSource {
    #[default]
    Ratio,
    PriceA,
    PriceB,
    ZScore,
}

impl fmt::Display for RsiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RsiSource::Ratio => "ratio",
            RsiSource::PriceA => "price_a",
            RsiSource::PriceB => "price_b",
            RsiSource::ZScore => "zscore",
        };
        f.write_str(name)
    }
}

impl FromStr for RsiSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ratio" => Ok(RsiSource::Ratio),
            "price_a" | "a" => Ok(RsiSource::PriceA),
            "price_b" | "b" => Ok(RsiSource::PriceB),
            "zscore" | "z_score" => Ok(RsiSource::ZScore),
            other => Err(format!(
                "unknown rsi_source '{}' (expected ratio, price_a, price_b or zscore)",
                other
            )),
        }
    }
}

/// Lift a fully defined series into the optional form the RSI consumes.
pub fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|&v| Some(v)).collect()
}
