//! Summary statistics over a trade ledger.
//!
//! Rates are percentages (0-100). Every ratio has a defined value for an
//! empty ledger or an empty subset: 0.

use super::ledger::TradeLedger;
use super::position::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub total_trades: usize,
    pub win_rate: f64,
    pub lose_rate: f64,
    pub long_trades: usize,
    pub long_win_rate: f64,
    pub long_lose_rate: f64,
    pub short_trades: usize,
    pub short_win_rate: f64,
    pub short_lose_rate: f64,
    pub max_drawdown: f64,
    pub profit_factor: f64,
    pub total_profit_pct: f64,
    pub avg_profit_pct: f64,
    pub avg_holding_period_days: f64,
}

impl SummaryMetrics {
    pub fn compute(ledger: &TradeLedger) -> Self {
        let (total_trades, win_rate, lose_rate) = win_lose(ledger.iter());
        let (long_trades, long_win_rate, long_lose_rate) = win_lose(ledger.long_trades());
        let (short_trades, short_win_rate, short_lose_rate) = win_lose(ledger.short_trades());

        let max_drawdown = ledger
            .iter()
            .map(|t| t.max_drawdown_pct)
            .reduce(f64::min)
            .unwrap_or(0.0);

        let mut gross_wins = 0.0_f64;
        let mut gross_losses = 0.0_f64;
        let mut total_days = 0i64;
        for trade in ledger {
            if trade.is_win() {
                gross_wins += trade.profit_pct;
            } else {
                gross_losses += trade.profit_pct;
            }
            total_days += trade.holding_period_days;
        }

        let profit_factor = if gross_losses != 0.0 {
            gross_wins / gross_losses.abs()
        } else {
            0.0
        };

        let total_profit_pct = gross_wins + gross_losses;
        let (avg_profit_pct, avg_holding_period_days) = if total_trades > 0 {
            (
                total_profit_pct / total_trades as f64,
                total_days as f64 / total_trades as f64,
            )
        } else {
            (0.0, 0.0)
        };

        SummaryMetrics {
            total_trades,
            win_rate,
            lose_rate,
            long_trades,
            long_win_rate,
            long_lose_rate,
            short_trades,
            short_win_rate,
            short_lose_rate,
            max_drawdown,
            profit_factor,
            total_profit_pct,
            avg_profit_pct,
            avg_holding_period_days,
        }
    }

    /// Flat `(metric, value)` table for display.
    pub fn to_table(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Trades", self.total_trades.to_string()),
            ("Win Rate (%)", format!("{:.2}", self.win_rate)),
            ("Lose Rate (%)", format!("{:.2}", self.lose_rate)),
            ("Long Trades", self.long_trades.to_string()),
            ("Long Win Rate (%)", format!("{:.2}", self.long_win_rate)),
            ("Long Lose Rate (%)", format!("{:.2}", self.long_lose_rate)),
            ("Short Trades", self.short_trades.to_string()),
            ("Short Win Rate (%)", format!("{:.2}", self.short_win_rate)),
            ("Short Lose Rate (%)", format!("{:.2}", self.short_lose_rate)),
            ("Max Drawdown (%)", format!("{:.2}", self.max_drawdown)),
            ("Profit Factor", format!("{:.2}", self.profit_factor)),
            ("Total Profit (%)", format!("{:.2}", self.total_profit_pct)),
            ("Average Profit (%)", format!("{:.2}", self.avg_profit_pct)),
            (
                "Average Holding Period (days)",
                format!("{:.1}", self.avg_holding_period_days),
            ),
        ]
    }
}

/// `(count, win %, lose %)` for a group of trades; rates are 0 when empty.
fn win_lose<'a>(trades: impl Iterator<Item = &'a Trade>) -> (usize, f64, f64) {
    let mut count = 0usize;
    let mut wins = 0usize;
    for trade in trades {
        count += 1;
        if trade.is_win() {
            wins += 1;
        }
    }
    if count == 0 {
        return (0, 0.0, 0.0);
    }
    let losses = count - wins;
    (
        count,
        100.0 * wins as f64 / count as f64,
        100.0 * losses as f64 / count as f64,
    )
}
