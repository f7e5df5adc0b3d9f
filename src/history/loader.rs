//! Load price histories from CSV files
//!
//! Expected layout: one `<TICKER>.csv` per security with at least a `Date`
//! and a `Close` column. Extra columns (Open, High, Volume, ...) are ignored.

use super::data::{PriceHistory, PricePoint};
use super::source::HistorySource;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use csv::Reader;
use std::path::{Path, PathBuf};

/// Raw CSV row for a daily bar
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Close")]
    close: String,
}

impl CsvRow {
    /// `None` for rows without a usable close (blank or `null` in vendor exports)
    fn to_point(&self) -> Result<Option<PricePoint>> {
        let close = self.close.trim();
        if close.is_empty() || close.eq_ignore_ascii_case("null") {
            return Ok(None);
        }

        // Accept timestamps like "2024-01-02 00:00:00-05:00" by keeping the date part
        let date_str = self.date.trim();
        let date_part = date_str.get(..10).unwrap_or(date_str);
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|e| Error::Parse(format!("Invalid date '{}': {}", self.date, e)))?;
        let close: f64 = close
            .parse()
            .map_err(|_| Error::Parse(format!("Invalid close '{}' on {}", self.close, date)))?;
        if !close.is_finite() {
            return Err(Error::Parse(format!("Non-finite close '{}' on {}", self.close, date)));
        }

        Ok(Some(PricePoint::new(date, close)))
    }
}

/// Load a price history from any reader
pub fn load_history_from_reader<R: std::io::Read>(reader: R) -> Result<PriceHistory> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut points = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        if let Some(point) = row.to_point()? {
            points.push(point);
        }
    }

    Ok(PriceHistory::new(points))
}

/// Load a price history from a CSV file
pub fn load_history<P: AsRef<Path>>(path: P) -> Result<PriceHistory> {
    let file = std::fs::File::open(path)?;
    load_history_from_reader(file)
}

/// History source backed by a directory of `<TICKER>.csv` files
#[derive(Debug, Clone)]
pub struct CsvHistorySource {
    dir: PathBuf,
}

impl CsvHistorySource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the CSV file for a ticker
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }
}

impl HistorySource for CsvHistorySource {
    fn full_history(&self, ticker: &str) -> Result<PriceHistory> {
        let path = self.path_for(ticker);
        load_history(&path).map_err(|e| Error::HistoryUnavailable {
            ticker: ticker.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })
    }
}
