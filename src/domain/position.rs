//! Pair position state and closed trades.

use chrono::NaiveDate;
use std::fmt;

/// Direction of a ratio trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeType {
    /// Long the ratio: long A, short B.
    Long,
    /// Short the ratio: short A, long B.
    Short,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Long => f.write_str("Long"),
            TradeType::Short => f.write_str("Short"),
        }
    }
}

/// Fractional return of the dollar-neutral spread opened at `(entry_a, entry_b)`
/// and marked at `(price_a, price_b)`.
pub fn spread_return(
    trade_type: TradeType,
    entry_a: f64,
    entry_b: f64,
    price_a: f64,
    price_b: f64,
) -> f64 {
    match trade_type {
        TradeType::Long => (price_a - entry_a) / entry_a - (price_b - entry_b) / entry_b,
        TradeType::Short => (entry_b - price_b) / entry_b - (entry_a - price_a) / entry_a,
    }
}

/// Entry snapshot plus the running worst mark of an open position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenLeg {
    pub entry_date: NaiveDate,
    pub entry_price_a: f64,
    pub entry_price_b: f64,
    pub worst_profit: f64,
}

impl OpenLeg {
    pub fn new(entry_date: NaiveDate, entry_price_a: f64, entry_price_b: f64) -> Self {
        Self {
            entry_date,
            entry_price_a,
            entry_price_b,
            worst_profit: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long(OpenLeg),
    Short(OpenLeg),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn trade_type(&self) -> Option<TradeType> {
        match self {
            PositionState::Flat => None,
            PositionState::Long(_) => Some(TradeType::Long),
            PositionState::Short(_) => Some(TradeType::Short),
        }
    }

    pub fn open_leg(&self) -> Option<&OpenLeg> {
        match self {
            PositionState::Flat => None,
            PositionState::Long(leg) | PositionState::Short(leg) => Some(leg),
        }
    }

    /// Return of the open position if it were closed at these prices.
    pub fn mark(&self, price_a: f64, price_b: f64) -> Option<f64> {
        let trade_type = self.trade_type()?;
        let leg = self.open_leg()?;
        Some(spread_return(
            trade_type,
            leg.entry_price_a,
            leg.entry_price_b,
            price_a,
            price_b,
        ))
    }

    pub fn label(&self) -> &'static str {
        match self {
            PositionState::Flat => "Flat",
            PositionState::Long(_) => "Long",
            PositionState::Short(_) => "Short",
        }
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub trade_type: TradeType,
    pub entry_price_a: f64,
    pub entry_price_b: f64,
    pub exit_price_a: f64,
    pub exit_price_b: f64,
    pub profit_pct: f64,
    pub holding_period_days: i64,
    pub max_drawdown_pct: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.profit_pct > 0.0
    }
}
