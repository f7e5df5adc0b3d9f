//! Error types for growth estimation, projection and data loading

use thiserror::Error;

/// Errors raised by the projection engine and its loaders.
///
/// The first four variants are per-security: the projector turns them into
/// [`SkippedSecurity`](crate::projection::SkippedSecurity) entries instead of
/// aborting the run. `NoValidProjections` is the only run-level failure
/// produced by the projector itself.
#[derive(Debug, Error)]
pub enum Error {
    #[error("insufficient price data: need at least 2 points, got {points}")]
    InsufficientData { points: usize },

    #[error("division error: {0}")]
    Division(String),

    #[error("non-finite result in {0}")]
    NonFiniteResult(&'static str),

    #[error("price history unavailable for {ticker}: {reason}")]
    HistoryUnavailable { ticker: String, reason: String },

    #[error("no valid projections ({skipped} securities skipped)")]
    NoValidProjections { skipped: usize },

    #[error("invalid holding request: {0}")]
    InvalidRequest(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no valid holdings found in input")]
    NoValidHoldings,

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that exclude a single security but not the run
    pub fn is_per_security(&self) -> bool {
        matches!(
            self,
            Error::InsufficientData { .. }
                | Error::Division(_)
                | Error::NonFiniteResult(_)
                | Error::HistoryUnavailable { .. }
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
