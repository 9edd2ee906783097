#![allow(dead_code)]

use chrono::NaiveDate;
use pairtrader::domain::backtest::{BacktestConfig, BacktestResult};
use pairtrader::domain::error::PairtraderError;
use pairtrader::domain::indicator::RsiSource;
pub use pairtrader::domain::price::PricePoint;
use pairtrader::ports::data_port::DataPort;
use pairtrader::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Closing ratios of the worked example: one Short trade entered on the
/// third bar and closed on the seventh.
pub const SCENARIO_RATIOS: [f64; 7] = [1.0, 1.02, 1.10, 1.15, 1.05, 0.95, 1.00];

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, prices: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), prices);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, PairtraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(PairtraderError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, PairtraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub struct MockReportPort {
    pub calls: RefCell<Vec<(BacktestResult, BacktestConfig, PathBuf)>>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for MockReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_dir: &Path,
    ) -> Result<(), PairtraderError> {
        self.calls
            .borrow_mut()
            .push((result.clone(), config.clone(), output_dir.to_path_buf()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily prices starting at `start` (YYYY-MM-DD).
pub fn make_series(start: &str, prices: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
        .collect()
}

/// A = ratio * 100, B fixed at 100.
pub fn scenario_series() -> (Vec<PricePoint>, Vec<PricePoint>) {
    let a: Vec<f64> = SCENARIO_RATIOS.iter().map(|r| r * 100.0).collect();
    let b = vec![100.0; SCENARIO_RATIOS.len()];
    (make_series("2024-01-01", &a), make_series("2024-01-01", &b))
}

pub fn scenario_config() -> BacktestConfig {
    BacktestConfig {
        symbol_a: "AAA".into(),
        symbol_b: "BBB".into(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
        lookback: 3,
        rsi_period: 2,
        rsi_source: RsiSource::Ratio,
        entry_deviation: 1.0,
        exit_deviation: 0.3,
    }
}

/// Deterministic mean-reverting pair: B drifts, A oscillates around it.
pub fn oscillating_pair(count: usize) -> (Vec<PricePoint>, Vec<PricePoint>) {
    let b: Vec<f64> = (0..count).map(|i| 50.0 + 0.05 * i as f64).collect();
    let a: Vec<f64> = b
        .iter()
        .enumerate()
        .map(|(i, pb)| pb * (1.0 + 0.08 * (i as f64 * 0.35).sin() + 0.01 * (i as f64 * 1.7).cos()))
        .collect();
    (make_series("2023-01-01", &a), make_series("2023-01-01", &b))
}
