//! Price data access port trait.

use crate::domain::error::PairtraderError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Prices for `symbol` inside the inclusive window, sorted by date.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, PairtraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, PairtraderError>;
}
