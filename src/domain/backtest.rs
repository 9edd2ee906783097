//! Backtest configuration and the single-pair pipeline.
//!
//! align → ratio/z-score/RSI → state machine scan → ledger. Summary metrics
//! are derived from the result on demand.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::alignment::{AlignedSeries, SeriesPair, align};
use super::error::PairtraderError;
use super::indicator::rsi::calculate_rsi;
use super::indicator::zscore::calculate_zscore;
use super::indicator::{IndicatorSeries, RsiSource, defined};
use super::ledger::TradeLedger;
use super::metrics::SummaryMetrics;
use super::position::PositionState;
use super::price::{DateWindow, PricePoint};
use super::state_machine::{Bar, Thresholds, scan};

pub const DEFAULT_LOOKBACK: usize = 20;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_ENTRY_DEVIATION: f64 = 2.0;
pub const DEFAULT_EXIT_DEVIATION: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol_a: String,
    pub symbol_b: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lookback: usize,
    pub rsi_period: usize,
    pub rsi_source: RsiSource,
    pub entry_deviation: f64,
    pub exit_deviation: f64,
}

impl BacktestConfig {
    pub fn window(&self) -> Result<DateWindow, PairtraderError> {
        DateWindow::new(self.start_date, self.end_date)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            entry_deviation: self.entry_deviation,
            exit_deviation: self.exit_deviation,
        }
    }

    /// Reject malformed parameters before any computation.
    pub fn validate(&self) -> Result<(), PairtraderError> {
        if self.symbol_a.trim().is_empty() {
            return Err(PairtraderError::invalid_input("symbol_a", "symbol is empty"));
        }
        if self.symbol_b.trim().is_empty() {
            return Err(PairtraderError::invalid_input("symbol_b", "symbol is empty"));
        }
        if self.symbol_a == self.symbol_b {
            return Err(PairtraderError::invalid_input(
                "symbol_b",
                format!("symbol_b must differ from symbol_a ({})", self.symbol_a),
            ));
        }
        if self.lookback < 1 {
            return Err(PairtraderError::invalid_input(
                "lookback",
                "lookback must be at least 1",
            ));
        }
        if self.rsi_period < 1 {
            return Err(PairtraderError::invalid_input(
                "rsi_period",
                "rsi_period must be at least 1",
            ));
        }
        if !(self.entry_deviation.is_finite() && self.entry_deviation > 0.0) {
            return Err(PairtraderError::invalid_input(
                "entry_deviation",
                format!("entry_deviation must be positive, got {}", self.entry_deviation),
            ));
        }
        if !(self.exit_deviation.is_finite() && self.exit_deviation > 0.0) {
            return Err(PairtraderError::invalid_input(
                "exit_deviation",
                format!("exit_deviation must be positive, got {}", self.exit_deviation),
            ));
        }
        if self.exit_deviation >= self.entry_deviation {
            return Err(PairtraderError::invalid_input(
                "exit_deviation",
                format!(
                    "exit_deviation {} must be below entry_deviation {}",
                    self.exit_deviation, self.entry_deviation
                ),
            ));
        }
        self.window()?;
        Ok(())
    }
}

/// One presentation row per aligned date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub price_a: f64,
    pub price_b: f64,
    pub ratio: f64,
    pub zscore: Option<f64>,
    pub rsi: Option<f64>,
    /// Position held after this bar was processed.
    pub position: PositionState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub rows: Vec<SignalRow>,
    pub ledger: TradeLedger,
}

impl BacktestResult {
    pub fn metrics(&self) -> SummaryMetrics {
        SummaryMetrics::compute(&self.ledger)
    }

    pub fn final_position(&self) -> PositionState {
        self.rows.last().map(|r| r.position).unwrap_or_default()
    }
}

/// Ratio z-score and RSI over an aligned pair.
pub fn compute_indicators(
    aligned: &AlignedSeries,
    lookback: usize,
    rsi_period: usize,
    rsi_source: RsiSource,
) -> (IndicatorSeries, IndicatorSeries) {
    let ratios = aligned.ratios();
    let zscore = calculate_zscore(&ratios, lookback);
    let rsi_input = match rsi_source {
        RsiSource::Ratio => defined(&ratios),
        RsiSource::PriceA => defined(&aligned.prices_a()),
        RsiSource::PriceB => defined(&aligned.prices_b()),
        RsiSource::ZScore => zscore.values.clone(),
    };
    let rsi = calculate_rsi(&rsi_input, rsi_period);
    (zscore, rsi)
}

pub fn run_backtest(
    series_a: &[PricePoint],
    series_b: &[PricePoint],
    config: &BacktestConfig,
) -> Result<BacktestResult, PairtraderError> {
    config.validate()?;
    let window = config.window()?;

    for (symbol, series) in [(&config.symbol_a, series_a), (&config.symbol_b, series_b)] {
        if !series.iter().any(|p| p.has_price() && window.contains(p.date)) {
            return Err(PairtraderError::DataUnavailable {
                series: symbol.clone(),
                start: window.start,
                end: window.end,
                reason: "series has no prices in the window".into(),
            });
        }
    }

    info!(
        symbol_a = %config.symbol_a,
        symbol_b = %config.symbol_b,
        start = %window.start,
        end = %window.end,
        lookback = config.lookback,
        rsi_period = config.rsi_period,
        "starting backtest"
    );

    let pair = SeriesPair {
        symbol_a: &config.symbol_a,
        series_a,
        symbol_b: &config.symbol_b,
        series_b,
    };
    let aligned = align(&pair, &window)?;
    let (zscore, rsi) = compute_indicators(
        &aligned,
        config.lookback,
        config.rsi_period,
        config.rsi_source,
    );

    let bars: Vec<Bar> = aligned
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| Bar {
            date: row.date,
            price_a: row.price_a,
            price_b: row.price_b,
            zscore: zscore.get(i),
        })
        .collect();

    let scanned = scan(&bars, &config.thresholds());

    let rows: Vec<SignalRow> = aligned
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| SignalRow {
            date: row.date,
            price_a: row.price_a,
            price_b: row.price_b,
            ratio: row.ratio(),
            zscore: zscore.get(i),
            rsi: rsi.get(i),
            position: scanned.states[i],
        })
        .collect();

    let final_state = scanned.final_state();
    if let Some(leg) = final_state.open_leg() {
        warn!(
            position = %final_state,
            entry_date = %leg.entry_date,
            "position still open at end of window, not counted as a trade"
        );
    }

    info!(
        bars = rows.len(),
        zscore = %zscore.indicator_type,
        rsi = %rsi.indicator_type,
        rsi_source = %config.rsi_source,
        zscore_defined = zscore.defined_count(),
        trades = scanned.ledger.len(),
        "backtest complete"
    );

    Ok(BacktestResult {
        rows,
        ledger: scanned.ledger,
    })
}
