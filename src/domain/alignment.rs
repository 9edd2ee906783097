//! Inner join of two price series onto a shared, strictly increasing timeline.

use crate::domain::error::PairtraderError;
use crate::domain::price::{DateWindow, PricePoint};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// The two raw inputs of a pair, labelled for error reporting.
#[derive(Debug, Clone, Copy)]
pub struct SeriesPair<'a> {
    pub symbol_a: &'a str,
    pub series_a: &'a [PricePoint],
    pub symbol_b: &'a str,
    pub series_b: &'a [PricePoint],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub price_a: f64,
    pub price_b: f64,
}

impl AlignedRow {
    pub fn ratio(&self) -> f64 {
        self.price_a / self.price_b
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    rows: Vec<AlignedRow>,
}

impl AlignedSeries {
    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn prices_a(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.price_a).collect()
    }

    pub fn prices_b(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.price_b).collect()
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.rows.iter().map(AlignedRow::ratio).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}

/// Join both series on date within `window`.
///
/// Points with a missing price on either side are dropped; nothing is filled.
pub fn join(pair: &SeriesPair, window: &DateWindow) -> AlignedSeries {
    let usable = |p: &&PricePoint| p.has_price() && window.contains(p.date);

    let index_b: HashMap<NaiveDate, f64> = pair
        .series_b
        .iter()
        .filter(usable)
        .map(|p| (p.date, p.price))
        .collect();

    let by_date_a: BTreeMap<NaiveDate, f64> = pair
        .series_a
        .iter()
        .filter(usable)
        .map(|p| (p.date, p.price))
        .collect();

    let rows = by_date_a
        .into_iter()
        .filter_map(|(date, price_a)| {
            index_b.get(&date).map(|&price_b| AlignedRow {
                date,
                price_a,
                price_b,
            })
        })
        .collect();

    AlignedSeries { rows }
}

/// Like [`join`], but an empty intersection is an error.
pub fn align(pair: &SeriesPair, window: &DateWindow) -> Result<AlignedSeries, PairtraderError> {
    let aligned = join(pair, window);
    if aligned.is_empty() {
        return Err(PairtraderError::DataUnavailable {
            series: format!("{}/{}", pair.symbol_a, pair.symbol_b),
            start: window.start,
            end: window.end,
            reason: format!(
                "no common dates with prices on both sides ({} and {} points in input)",
                pair.series_a.len(),
                pair.series_b.len()
            ),
        });
    }
    Ok(aligned)
}
