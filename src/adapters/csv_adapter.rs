//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row. The
//! `date` column is required; prices come from the first of `adj_close`,
//! `adj close`, `close` or `price` that is present (case-insensitive).

use crate::domain::error::PairtraderError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const PRICE_COLUMNS: [&str; 4] = ["adj_close", "adj close", "close", "price"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Empty, `NaN`, zero and negative cells are missing prices, anything else
/// must be numeric.
fn parse_price(cell: &str) -> Result<f64, String> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    let price = cell.parse::<f64>().map_err(|e| e.to_string())?;
    Ok(if price > 0.0 { price } else { f64::NAN })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, PairtraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| PairtraderError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| PairtraderError::DataSource {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();

        let date_idx = column_index(&headers, "date").ok_or_else(|| {
            PairtraderError::DataSource {
                reason: format!("missing date column in {}", path.display()),
            }
        })?;
        let price_idx = PRICE_COLUMNS
            .iter()
            .find_map(|name| column_index(&headers, name))
            .ok_or_else(|| PairtraderError::DataSource {
                reason: format!(
                    "no price column in {} (expected one of {})",
                    path.display(),
                    PRICE_COLUMNS.join(", ")
                ),
            })?;

        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| PairtraderError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_idx).ok_or_else(|| PairtraderError::DataSource {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                PairtraderError::DataSource {
                    reason: format!("invalid date format '{}': {}", date_str, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let price = parse_price(record.get(price_idx).unwrap_or("")).map_err(|e| {
                PairtraderError::DataSource {
                    reason: format!("invalid price for {} on {}: {}", symbol, date, e),
                }
            })?;

            points.push(PricePoint::new(date, price));
        }

        points.sort_by_key(|p| p.date);
        debug!(symbol, points = points.len(), path = %path.display(), "loaded prices");
        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, PairtraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| PairtraderError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| PairtraderError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
