//! Raw price series element and the inclusive date window a run covers.

use crate::domain::error::PairtraderError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// A point is usable when its price is a positive real number.
    pub fn has_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PairtraderError> {
        if start > end {
            return Err(PairtraderError::invalid_input(
                "start_date",
                format!("start_date {start} is after end_date {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
