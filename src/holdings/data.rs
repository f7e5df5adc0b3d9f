//! Holding requests submitted for projection

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One position to project: a ticker and the dollars invested in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HoldingFields")]
pub struct HoldingRequest {
    ticker: String,
    initial_amount: f64,
}

impl HoldingRequest {
    /// Validate and build a request. Tickers are trimmed and upper-cased.
    pub fn new(ticker: impl AsRef<str>, initial_amount: f64) -> Result<Self> {
        let ticker = ticker.as_ref().trim().to_ascii_uppercase();
        if ticker.is_empty() {
            return Err(Error::InvalidRequest("ticker is empty".to_string()));
        }
        if !initial_amount.is_finite() || initial_amount <= 0.0 {
            return Err(Error::InvalidRequest(format!(
                "amount for {} must be a positive number, got {}",
                ticker, initial_amount
            )));
        }
        Ok(Self { ticker, initial_amount })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn initial_amount(&self) -> f64 {
        self.initial_amount
    }
}

/// Unvalidated form used when deserializing
#[derive(Deserialize)]
struct HoldingFields {
    ticker: String,
    initial_amount: f64,
}

impl TryFrom<HoldingFields> for HoldingRequest {
    type Error = Error;

    fn try_from(fields: HoldingFields) -> Result<Self> {
        HoldingRequest::new(fields.ticker, fields.initial_amount)
    }
}
