//! Entry/exit state machine driven by the ratio z-score.
//!
//! Each bar is evaluated in strict priority order, exactly one action fires:
//! 1. Flat and z > entry → enter Short
//! 2. Flat and z < -entry → enter Long
//! 3. Open and |z| < exit → close at this bar's prices
//! 4. Otherwise hold
//!
//! A bar without a z-score is skipped entirely: no transition and no
//! drawdown update. While a position is open (including its entry and exit
//! bars) the running worst mark is lowered to the bar's mark if smaller.

use chrono::NaiveDate;
use tracing::debug;

use super::ledger::TradeLedger;
use super::position::{OpenLeg, PositionState, Trade, TradeType};

/// One aligned row as the state machine sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub price_a: f64,
    pub price_b: f64,
    pub zscore: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub entry_deviation: f64,
    pub exit_deviation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    EnterShort,
    EnterLong,
    Exit,
    Hold,
    Skip,
}

/// Outcome of a single bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: PositionState,
    pub action: Action,
    pub trade: Option<Trade>,
}

/// Advance `state` by one bar.
pub fn step(state: PositionState, bar: &Bar, thresholds: &Thresholds) -> Step {
    let Some(z) = bar.zscore else {
        return Step {
            state,
            action: Action::Skip,
            trade: None,
        };
    };

    match state {
        PositionState::Flat => {
            let leg = OpenLeg::new(bar.date, bar.price_a, bar.price_b);
            let (opened, action) = if z > thresholds.entry_deviation {
                (PositionState::Short(leg), Action::EnterShort)
            } else if z < -thresholds.entry_deviation {
                (PositionState::Long(leg), Action::EnterLong)
            } else {
                return Step {
                    state,
                    action: Action::Hold,
                    trade: None,
                };
            };
            debug!(date = %bar.date, zscore = z, position = %opened, "entered position");
            Step {
                state: track_worst(opened, bar),
                action,
                trade: None,
            }
        }
        PositionState::Long(_) | PositionState::Short(_) => {
            let state = track_worst(state, bar);
            if z.abs() < thresholds.exit_deviation {
                let trade = close(&state, bar);
                debug!(
                    date = %bar.date,
                    zscore = z,
                    profit_pct = trade.as_ref().map(|t| t.profit_pct),
                    "closed position"
                );
                Step {
                    state: PositionState::Flat,
                    action: Action::Exit,
                    trade,
                }
            } else {
                Step {
                    state,
                    action: Action::Hold,
                    trade: None,
                }
            }
        }
    }
}

fn track_worst(state: PositionState, bar: &Bar) -> PositionState {
    let Some(current) = state.mark(bar.price_a, bar.price_b) else {
        return state;
    };
    let lower = |leg: OpenLeg| OpenLeg {
        worst_profit: leg.worst_profit.min(current),
        ..leg
    };
    match state {
        PositionState::Flat => state,
        PositionState::Long(leg) => PositionState::Long(lower(leg)),
        PositionState::Short(leg) => PositionState::Short(lower(leg)),
    }
}

fn close(state: &PositionState, bar: &Bar) -> Option<Trade> {
    let trade_type: TradeType = state.trade_type()?;
    let leg = state.open_leg()?;
    let profit = state.mark(bar.price_a, bar.price_b)?;

    Some(Trade {
        entry_date: leg.entry_date,
        exit_date: bar.date,
        trade_type,
        entry_price_a: leg.entry_price_a,
        entry_price_b: leg.entry_price_b,
        exit_price_a: bar.price_a,
        exit_price_b: bar.price_b,
        profit_pct: profit * 100.0,
        holding_period_days: (bar.date - leg.entry_date).num_days(),
        max_drawdown_pct: leg.worst_profit * 100.0,
    })
}

/// Result of scanning a full bar sequence from `Flat`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Action fired on each bar, index-aligned with the input.
    pub actions: Vec<Action>,
    /// State after each bar, index-aligned with the input.
    pub states: Vec<PositionState>,
    pub ledger: TradeLedger,
}

impl ScanResult {
    pub fn final_state(&self) -> PositionState {
        self.states.last().copied().unwrap_or_default()
    }
}

pub fn scan(bars: &[Bar], thresholds: &Thresholds) -> ScanResult {
    let mut state = PositionState::Flat;
    let mut actions = Vec::with_capacity(bars.len());
    let mut states = Vec::with_capacity(bars.len());
    let mut ledger = TradeLedger::new();

    for bar in bars {
        let next = step(state, bar, thresholds);
        if let Some(trade) = next.trade {
            ledger.append(trade);
        }
        actions.push(next.action);
        states.push(next.state);
        state = next.state;
    }

    ScanResult {
        actions,
        states,
        ledger,
    }
}
