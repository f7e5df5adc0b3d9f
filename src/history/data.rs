//! Price series, lookback windows and security age

use crate::error::{Error, Result};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Days per year used for age and calendar-span conversions
pub const DAYS_PER_YEAR: f64 = 365.25;

/// A single closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Lookback window applied to a price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowSpec {
    /// Entire available history
    Max,
    /// Observations within the last N years of the series
    TrailingYears(u32),
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowSpec::Max => write!(f, "max"),
            WindowSpec::TrailingYears(n) => write!(f, "{}y", n),
        }
    }
}

impl FromStr for WindowSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        if s == "max" {
            return Ok(WindowSpec::Max);
        }
        let years = s
            .strip_suffix('y')
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| Error::Parse(format!("Unknown window: {}", s)))?;
        Ok(WindowSpec::TrailingYears(years))
    }
}

/// Ordered (ascending by date) series of closing prices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Build a history, sorting the points chronologically
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    /// Build from `(date, close)` pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(pairs.into_iter().map(|(d, c)| PricePoint::new(d, c)).collect())
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last().map(|p| p.date)
    }

    /// Calendar span between first and last observation, in years
    pub fn span_years(&self) -> f64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days() as f64 / DAYS_PER_YEAR,
            _ => 0.0,
        }
    }

    /// Slice the history to the given window.
    ///
    /// Trailing windows are anchored on the last observation: a `5y` window
    /// keeps every point dated on or after `last_date - 5 years`.
    pub fn window(&self, spec: WindowSpec) -> PriceHistory {
        let years = match spec {
            WindowSpec::Max => return self.clone(),
            WindowSpec::TrailingYears(n) => n,
        };
        let cutoff = self
            .last_date()
            .and_then(|last| last.checked_sub_months(Months::new(years.saturating_mul(12))));

        match cutoff {
            Some(cutoff) => PriceHistory {
                points: self.points.iter().copied().filter(|p| p.date >= cutoff).collect(),
            },
            None => self.clone(),
        }
    }

    /// Simple (non-annualized) return over a window: last / first - 1
    pub fn trailing_return(&self, spec: WindowSpec) -> Result<f64> {
        let window = self.window(spec);
        let (first, last) = match (window.first(), window.last()) {
            (Some(f), Some(l)) if window.len() >= 2 => (f.close, l.close),
            _ => return Err(Error::InsufficientData { points: window.len() }),
        };
        if first == 0.0 {
            return Err(Error::Division("first close is zero".to_string()));
        }
        Ok(last / first - 1.0)
    }
}

/// Years elapsed since a security's first observed trade
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SecurityAge(f64);

impl SecurityAge {
    pub fn from_years(years: f64) -> Self {
        Self(years.max(0.0))
    }

    /// Age between the first trading date and an as-of date
    pub fn between(first_trade: NaiveDate, as_of: NaiveDate) -> Self {
        Self::from_years((as_of - first_trade).num_days() as f64 / DAYS_PER_YEAR)
    }

    pub fn years(&self) -> f64 {
        self.0
    }
}
