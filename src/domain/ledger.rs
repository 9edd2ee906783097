//! Append-only record of closed trades, in order of closure.

use super::position::{Trade, TradeType};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn of_type(&self, trade_type: TradeType) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(move |t| t.trade_type == trade_type)
    }

    pub fn long_trades(&self) -> impl Iterator<Item = &Trade> {
        self.of_type(TradeType::Long)
    }

    pub fn short_trades(&self) -> impl Iterator<Item = &Trade> {
        self.of_type(TradeType::Short)
    }
}

impl<'a> IntoIterator for &'a TradeLedger {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}
