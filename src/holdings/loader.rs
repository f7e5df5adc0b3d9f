//! Import holdings from CSV
//!
//! Headers are matched case-insensitively. A `TICKER` column is required,
//! plus either `SHARES` (priced at the latest close) or `AMOUNT` (dollars).

use super::data::HoldingRequest;
use crate::error::{Error, Result};
use crate::history::HistorySource;
use csv::{Reader, StringRecord};
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

/// How the quantity column of a holdings file is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuantityKind {
    Shares,
    Amount,
}

/// A row that could not be turned into a holding request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    /// 1-based line number in the file (header is line 1)
    pub line: usize,
    pub ticker: String,
    pub reason: String,
}

/// Holdings accepted from a file, plus the rows that were rejected
#[derive(Debug, Clone)]
pub struct LoadedHoldings {
    pub requests: Vec<HoldingRequest>,
    pub rejected: Vec<RejectedRow>,
}

/// Locate the ticker and quantity columns
fn resolve_columns(headers: &StringRecord) -> Result<(usize, usize, QuantityKind)> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let ticker_idx = find("TICKER").ok_or_else(|| {
        Error::Parse(format!(
            "holdings file must have a TICKER column (found: {:?})",
            headers.iter().collect::<Vec<_>>()
        ))
    })?;

    let (qty_idx, kind) = match (find("SHARES"), find("AMOUNT")) {
        (Some(idx), _) => (idx, QuantityKind::Shares),
        (None, Some(idx)) => (idx, QuantityKind::Amount),
        (None, None) => {
            return Err(Error::Parse(format!(
                "holdings file must have a SHARES or AMOUNT column (found: {:?})",
                headers.iter().collect::<Vec<_>>()
            )))
        }
    };

    Ok((ticker_idx, qty_idx, kind))
}

/// Latest close for a ticker, used to value share counts
fn latest_price<S: HistorySource + ?Sized>(source: &S, ticker: &str) -> std::result::Result<f64, String> {
    let history = source.full_history(ticker).map_err(|e| e.to_string())?;
    match history.last() {
        Some(point) if point.close.is_finite() && point.close > 0.0 => Ok(point.close),
        Some(point) => Err(format!("unusable latest close {}", point.close)),
        None => Err("no price history".to_string()),
    }
}

/// Load holdings from any reader
pub fn load_holdings_from_reader<R, S>(reader: R, source: &S) -> Result<LoadedHoldings>
where
    R: std::io::Read,
    S: HistorySource + ?Sized,
{
    let mut csv_reader = Reader::from_reader(reader);
    let (ticker_idx, qty_idx, kind) = resolve_columns(csv_reader.headers()?)?;

    let mut requests = Vec::new();
    let mut rejected = Vec::new();

    for (index, result) in csv_reader.records().enumerate() {
        let record = result?;
        let line = index + 2;
        let ticker = record.get(ticker_idx).unwrap_or("").trim().to_ascii_uppercase();
        let quantity = record.get(qty_idx).unwrap_or("").trim();

        // Blank rows are common at the end of spreadsheet exports
        if ticker.is_empty() || ticker == "NAN" || quantity.is_empty() {
            continue;
        }

        let mut reject = |reason: String| {
            warn!("Skipping {} on line {}: {}", ticker, line, reason);
            rejected.push(RejectedRow {
                line,
                ticker: ticker.clone(),
                reason,
            });
        };

        if !ticker.chars().all(|c| c.is_ascii_alphabetic()) {
            reject("ticker must contain letters only".to_string());
            continue;
        }

        let quantity: f64 = match quantity.replace([',', '$'], "").parse() {
            Ok(q) if q > 0.0 && f64::is_finite(q) => q,
            Ok(q) => {
                reject(format!("quantity must be greater than 0, got {}", q));
                continue;
            }
            Err(_) => {
                reject(format!("invalid quantity '{}'", quantity));
                continue;
            }
        };

        let amount = match kind {
            QuantityKind::Amount => quantity,
            QuantityKind::Shares => match latest_price(source, &ticker) {
                Ok(price) => {
                    info!("{}: {} shares @ ${:.2} = ${:.2}", ticker, quantity, price, quantity * price);
                    quantity * price
                }
                Err(reason) => {
                    reject(format!("could not price shares: {}", reason));
                    continue;
                }
            },
        };

        match HoldingRequest::new(&ticker, amount) {
            Ok(request) => requests.push(request),
            Err(e) => reject(e.to_string()),
        }
    }

    if requests.is_empty() {
        return Err(Error::NoValidHoldings);
    }

    info!("Imported {} holdings ({} rows rejected)", requests.len(), rejected.len());
    Ok(LoadedHoldings { requests, rejected })
}

/// Load holdings from a CSV file
pub fn load_holdings<P, S>(path: P, source: &S) -> Result<LoadedHoldings>
where
    P: AsRef<Path>,
    S: HistorySource + ?Sized,
{
    let file = std::fs::File::open(path)?;
    load_holdings_from_reader(file, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{InMemoryHistorySource, PriceHistory};
    use chrono::NaiveDate;

    fn source() -> InMemoryHistorySource {
        let history = |last: f64| {
            PriceHistory::from_pairs(vec![
                (NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 1.0),
                (NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), last),
            ])
        };
        InMemoryHistorySource::new()
            .with("AAPL", history(200.0))
            .with("MSFT", history(400.0))
            .with("DEAD", history(0.0))
    }

    #[test]
    fn test_shares_priced_at_latest_close() {
        let data = "\
 ticker ,Shares
aapl,10
MSFT,2.5
,
";
        let loaded = load_holdings_from_reader(data.as_bytes(), &source()).unwrap();
        assert_eq!(loaded.requests.len(), 2);
        assert_eq!(loaded.requests[0].ticker(), "AAPL");
        assert_eq!(loaded.requests[0].initial_amount(), 2000.0);
        assert_eq!(loaded.requests[1].initial_amount(), 1000.0);
        assert!(loaded.rejected.is_empty());
    }

    #[test]
    fn test_load_holdings_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("holdings.csv");
        std::fs::write(&path, "TICKER,AMOUNT\nmsft,2500\n").unwrap();

        let loaded = load_holdings(&path, &source()).unwrap();
        assert_eq!(loaded.requests.len(), 1);
        assert_eq!(loaded.requests[0].ticker(), "MSFT");
        assert_eq!(loaded.requests[0].initial_amount(), 2500.0);
    }

    #[test]
    fn test_invalid_rows_rejected_with_reason() {
        let data = "\
TICKER,SHARES
AAPL,1
BRK.B,3
MSFT,-2
MSFT,lots
DEAD,5
ZZZZ,1
";
        let loaded = load_holdings_from_reader(data.as_bytes(), &source()).unwrap();
        assert_eq!(loaded.requests.len(), 1);

        let lines: Vec<usize> = loaded.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6, 7]);
        assert_eq!(loaded.rejected[0].ticker, "BRK.B");
    }

    #[test]
    fn test_amount_column() {
        let data = "Ticker,Amount\nVOO,\"10,000\"\nQQQ,$2500\n";
        let empty = InMemoryHistorySource::new();
        let loaded = load_holdings_from_reader(data.as_bytes(), &empty).unwrap();
        assert_eq!(loaded.requests.len(), 2);
        assert_eq!(loaded.requests[0].initial_amount(), 10_000.0);
        assert_eq!(loaded.requests[1].initial_amount(), 2500.0);
    }

    #[test]
    fn test_missing_columns() {
        let data = "Symbol,Shares\nAAPL,1\n";
        assert!(matches!(
            load_holdings_from_reader(data.as_bytes(), &source()),
            Err(Error::Parse(_))
        ));

        let data = "Ticker,Weight\nAAPL,1\n";
        assert!(matches!(
            load_holdings_from_reader(data.as_bytes(), &source()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_no_valid_rows() {
        let data = "TICKER,SHARES\n123,1\n";
        assert!(matches!(
            load_holdings_from_reader(data.as_bytes(), &source()),
            Err(Error::NoValidHoldings)
        ));
    }
}
