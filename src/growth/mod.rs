//! Compound annual growth rate estimation

mod cagr;

pub use cagr::{estimate_cagr, ElapsedConvention, GrowthEstimate, DEFAULT_TRADING_DAYS_PER_YEAR};
