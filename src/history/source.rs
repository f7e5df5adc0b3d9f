//! Access to per-ticker price histories

use super::data::PriceHistory;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Supplies already-parsed, chronologically ordered price histories.
///
/// Retries, timeouts and vendor payload parsing belong to the implementor;
/// the projector only ever sees a finished `PriceHistory` and slices its
/// lookback window from it.
pub trait HistorySource {
    /// Entire available history for a ticker
    fn full_history(&self, ticker: &str) -> Result<PriceHistory>;
}

impl<F> HistorySource for F
where
    F: Fn(&str) -> Result<PriceHistory>,
{
    fn full_history(&self, ticker: &str) -> Result<PriceHistory> {
        self(ticker)
    }
}

/// History source holding every series in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistorySource {
    histories: HashMap<String, PriceHistory>,
}

impl InMemoryHistorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the history for a ticker
    pub fn insert(&mut self, ticker: impl Into<String>, history: PriceHistory) {
        self.histories.insert(ticker.into().to_ascii_uppercase(), history);
    }

    pub fn with(mut self, ticker: impl Into<String>, history: PriceHistory) -> Self {
        self.insert(ticker, history);
        self
    }
}

impl HistorySource for InMemoryHistorySource {
    fn full_history(&self, ticker: &str) -> Result<PriceHistory> {
        self.histories
            .get(&ticker.to_ascii_uppercase())
            .cloned()
            .ok_or_else(|| Error::HistoryUnavailable {
                ticker: ticker.to_string(),
                reason: "no history registered".to_string(),
            })
    }
}
