//! Configuration validation.
//!
//! Validates all config fields before a backtest runs and hands back the
//! parsed values, so each key is read and parsed once.

use crate::domain::backtest::{
    DEFAULT_ENTRY_DEVIATION, DEFAULT_EXIT_DEVIATION, DEFAULT_LOOKBACK, DEFAULT_RSI_PERIOD,
};
use crate::domain::error::PairtraderError;
use crate::domain::indicator::RsiSource;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

/// Validated `[backtest]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSettings {
    pub symbol_a: String,
    pub symbol_b: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Validated `[strategy]` section, defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySettings {
    pub lookback: usize,
    pub rsi_period: usize,
    pub rsi_source: RsiSource,
    pub entry_deviation: f64,
    pub exit_deviation: f64,
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<PairSettings, PairtraderError> {
    let (start_date, end_date) = validate_dates(config)?;
    let (symbol_a, symbol_b) = validate_symbols(config)?;
    Ok(PairSettings {
        symbol_a,
        symbol_b,
        start_date,
        end_date,
    })
}

pub fn validate_strategy_config(
    config: &dyn ConfigPort,
) -> Result<StrategySettings, PairtraderError> {
    let lookback = positive_int(config, "lookback", DEFAULT_LOOKBACK)?;
    let rsi_period = positive_int(config, "rsi_period", DEFAULT_RSI_PERIOD)?;
    let rsi_source = validate_rsi_source(config)?;
    let (entry_deviation, exit_deviation) = validate_deviations(config)?;
    Ok(StrategySettings {
        lookback,
        rsi_period,
        rsi_source,
        entry_deviation,
        exit_deviation,
    })
}

fn invalid(section: &str, key: &str, reason: String) -> PairtraderError {
    PairtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), PairtraderError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date > end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must not be after end_date".to_string(),
        ));
    }
    Ok((start_date, end_date))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, PairtraderError> {
    match value {
        None => Err(PairtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "backtest",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn required_symbol(config: &dyn ConfigPort, key: &str) -> Result<String, PairtraderError> {
    match config.get_string("backtest", key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(PairtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(String, String), PairtraderError> {
    let symbol_a = required_symbol(config, "symbol_a")?;
    let symbol_b = required_symbol(config, "symbol_b")?;
    if symbol_a == symbol_b {
        return Err(invalid(
            "backtest",
            "symbol_b",
            "symbol_b must differ from symbol_a".to_string(),
        ));
    }
    Ok((symbol_a, symbol_b))
}

fn positive_int(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, PairtraderError> {
    let value = config
        .get_int("strategy", key)
        .map_err(|e| invalid("strategy", key, format!("{key} must be an integer: {e}")))?;
    match value {
        None => Ok(default),
        Some(v) => usize::try_from(v)
            .ok()
            .filter(|v| *v >= 1)
            .ok_or_else(|| invalid("strategy", key, format!("{key} must be at least 1"))),
    }
}

fn validate_rsi_source(config: &dyn ConfigPort) -> Result<RsiSource, PairtraderError> {
    match config.get_string("strategy", "rsi_source") {
        Some(s) => s
            .parse::<RsiSource>()
            .map_err(|reason| invalid("strategy", "rsi_source", reason)),
        None => Ok(RsiSource::default()),
    }
}

fn positive_double(
    config: &dyn ConfigPort,
    key: &str,
    default: f64,
) -> Result<f64, PairtraderError> {
    let value = config
        .get_double("strategy", key)
        .map_err(|e| invalid("strategy", key, format!("{key} must be a number: {e}")))?
        .unwrap_or(default);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid("strategy", key, format!("{key} must be positive")));
    }
    Ok(value)
}

fn validate_deviations(config: &dyn ConfigPort) -> Result<(f64, f64), PairtraderError> {
    let entry = positive_double(config, "entry_deviation", DEFAULT_ENTRY_DEVIATION)?;
    let exit = positive_double(config, "exit_deviation", DEFAULT_EXIT_DEVIATION)?;
    if exit >= entry {
        return Err(invalid(
            "strategy",
            "exit_deviation",
            "exit_deviation must be below entry_deviation".to_string(),
        ));
    }
    Ok((entry, exit))
}
