//! CSV report adapter implementing ReportPort.
//!
//! Writes `signals.csv`, `trades.csv` and `summary.csv` into the output
//! directory. Undefined indicator values are empty cells.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::backtest::{BacktestConfig, BacktestResult, SignalRow};
use crate::domain::error::PairtraderError;
use crate::domain::position::Trade;
use crate::ports::report_port::ReportPort;

pub const SIGNALS_FILE: &str = "signals.csv";
pub const TRADES_FILE: &str = "trades.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

#[derive(Debug, Serialize)]
struct SignalRecord {
    date: String,
    price_a: f64,
    price_b: f64,
    ratio: f64,
    zscore: Option<f64>,
    rsi: Option<f64>,
    position: &'static str,
}

impl From<&SignalRow> for SignalRecord {
    fn from(row: &SignalRow) -> Self {
        SignalRecord {
            date: row.date.format("%Y-%m-%d").to_string(),
            price_a: row.price_a,
            price_b: row.price_b,
            ratio: row.ratio,
            zscore: row.zscore,
            rsi: row.rsi,
            position: row.position.label(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TradeRecord {
    entry_date: String,
    exit_date: String,
    trade_type: String,
    entry_price_a: f64,
    entry_price_b: f64,
    exit_price_a: f64,
    exit_price_b: f64,
    profit_pct: f64,
    holding_period_days: i64,
    max_drawdown_pct: f64,
}

impl From<&Trade> for TradeRecord {
    fn from(trade: &Trade) -> Self {
        TradeRecord {
            entry_date: trade.entry_date.format("%Y-%m-%d").to_string(),
            exit_date: trade.exit_date.format("%Y-%m-%d").to_string(),
            trade_type: trade.trade_type.to_string(),
            entry_price_a: trade.entry_price_a,
            entry_price_b: trade.entry_price_b,
            exit_price_a: trade.exit_price_a,
            exit_price_b: trade.exit_price_b,
            profit_pct: trade.profit_pct,
            holding_period_days: trade.holding_period_days,
            max_drawdown_pct: trade.max_drawdown_pct,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    metric: &'a str,
    value: String,
}

fn report_err(path: &Path, e: impl std::fmt::Display) -> PairtraderError {
    PairtraderError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    }
}

fn write_records<T: Serialize>(
    path: &Path,
    records: impl IntoIterator<Item = T>,
    headers: &[&str],
) -> Result<(), PairtraderError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| report_err(path, e))?;
    wtr.write_record(headers).map_err(|e| report_err(path, e))?;
    for record in records {
        wtr.serialize(record).map_err(|e| report_err(path, e))?;
    }
    wtr.flush().map_err(|e| report_err(path, e))?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_dir: &Path,
    ) -> Result<(), PairtraderError> {
        fs::create_dir_all(output_dir).map_err(|e| report_err(output_dir, e))?;

        // Explicit headers: an empty table still gets its header row.
        write_records(
            &output_dir.join(SIGNALS_FILE),
            result.rows.iter().map(SignalRecord::from),
            &["date", "price_a", "price_b", "ratio", "zscore", "rsi", "position"],
        )?;

        write_records(
            &output_dir.join(TRADES_FILE),
            result.ledger.iter().map(TradeRecord::from),
            &[
                "entry_date",
                "exit_date",
                "trade_type",
                "entry_price_a",
                "entry_price_b",
                "exit_price_a",
                "exit_price_b",
                "profit_pct",
                "holding_period_days",
                "max_drawdown_pct",
            ],
        )?;

        let mut summary = vec![
            SummaryRecord {
                metric: "Symbol A",
                value: config.symbol_a.clone(),
            },
            SummaryRecord {
                metric: "Symbol B",
                value: config.symbol_b.clone(),
            },
            SummaryRecord {
                metric: "Start Date",
                value: config.start_date.to_string(),
            },
            SummaryRecord {
                metric: "End Date",
                value: config.end_date.to_string(),
            },
        ];
        summary.extend(
            result
                .metrics()
                .to_table()
                .into_iter()
                .map(|(metric, value)| SummaryRecord { metric, value }),
        );
        write_records(
            &output_dir.join(SUMMARY_FILE),
            summary,
            &["metric", "value"],
        )?;

        info!(
            output_dir = %output_dir.display(),
            rows = result.rows.len(),
            trades = result.ledger.len(),
            "report written"
        );
        Ok(())
    }
}
