//! CAGR estimator
//!
//! Single-period geometric estimate over a price window:
//! `(last_close / first_close)^(1 / elapsed_years) - 1`

use crate::error::{Error, Result};
use crate::history::PriceHistory;
use serde::{Deserialize, Serialize};

/// Trading sessions per year assumed for daily-bar windows
pub const DEFAULT_TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// How elapsed time is derived from a window.
///
/// A projection run uses exactly one convention for every security.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ElapsedConvention {
    /// Observation count divided by sessions per year
    TradingDays { per_year: f64 },
    /// Days between first and last observation / 365.25
    CalendarSpan,
}

impl Default for ElapsedConvention {
    fn default() -> Self {
        ElapsedConvention::TradingDays {
            per_year: DEFAULT_TRADING_DAYS_PER_YEAR,
        }
    }
}

impl ElapsedConvention {
    /// Elapsed years covered by a window under this convention
    pub fn elapsed_years(&self, window: &PriceHistory) -> f64 {
        match self {
            ElapsedConvention::TradingDays { per_year } => window.len() as f64 / per_year,
            ElapsedConvention::CalendarSpan => window.span_years(),
        }
    }
}

/// Result of a CAGR estimate, before and after capping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthEstimate {
    /// Rate implied by the window
    pub raw_rate: f64,
    /// Rate used for projection (raw rate, clamped to the cap if one applies)
    pub rate: f64,
    /// Whether the cap was applied
    pub capped: bool,
    /// Elapsed years the rate was annualized over
    pub elapsed_years: f64,
    /// Number of observations in the window
    pub observations: usize,
}

impl GrowthEstimate {
    /// Estimate the growth rate of a window.
    ///
    /// # Arguments
    /// * `history` - Price window, at least two points
    /// * `elapsed_years` - Span actually covered by `history` (not the security's age)
    /// * `cap` - Optional upper bound; declines are never floored
    ///
    /// # Errors
    /// * `InsufficientData` - fewer than two points
    /// * `Division` - `elapsed_years <= 0` or a zero starting price
    /// * `NonFiniteResult` - a non-finite endpoint price, or a ratio with no
    ///   real root (e.g. negative prices)
    pub fn compute(history: &PriceHistory, elapsed_years: f64, cap: Option<f64>) -> Result<Self> {
        let (first, last) = match (history.first(), history.last()) {
            (Some(first), Some(last)) if history.len() >= 2 => (first.close, last.close),
            _ => return Err(Error::InsufficientData { points: history.len() }),
        };

        if !first.is_finite() || !last.is_finite() {
            return Err(Error::NonFiniteResult("closing price"));
        }

        // Also rejects NaN
        if !(elapsed_years > 0.0) {
            return Err(Error::Division(format!(
                "elapsed years must be positive, got {}",
                elapsed_years
            )));
        }
        if first == 0.0 {
            return Err(Error::Division("first close is zero".to_string()));
        }

        let raw_rate = (last / first).powf(1.0 / elapsed_years) - 1.0;
        if !raw_rate.is_finite() {
            return Err(Error::NonFiniteResult("growth rate"));
        }

        let (rate, capped) = match cap {
            Some(cap) if raw_rate > cap => (cap, true),
            _ => (raw_rate, false),
        };

        Ok(Self {
            raw_rate,
            rate,
            capped,
            elapsed_years,
            observations: history.len(),
        })
    }
}

/// Compound annual growth rate of a window, optionally capped
pub fn estimate_cagr(history: &PriceHistory, elapsed_years: f64, cap: Option<f64>) -> Result<f64> {
    GrowthEstimate::compute(history, elapsed_years, cap).map(|e| e.rate)
}
