//! Core domain types and logic.

pub mod price;
pub mod alignment;
pub mod indicator;
pub mod position;
pub mod state_machine;
pub mod ledger;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
