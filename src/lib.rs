//! Growth Projector - Portfolio value projection from historical growth rates
//!
//! This library provides:
//! - CAGR estimation from a price window, with an optional cap
//! - Age-based lookback window selection per security
//! - Year-by-year nominal and inflation-adjusted projections
//! - Portfolio aggregation (totals, blended and average CAGR)
//! - CSV loaders for price histories, holdings and assumptions

pub mod error;
pub mod history;
pub mod holdings;
pub mod growth;
pub mod assumptions;
pub mod projection;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use history::{HistorySource, PriceHistory, PricePoint, SecurityAge, WindowSpec};
pub use holdings::HoldingRequest;
pub use growth::{estimate_cagr, ElapsedConvention, GrowthEstimate};
pub use assumptions::{Assumptions, WindowPolicy, WindowTier};
pub use projection::{
    project, PortfolioProjection, PortfolioSummary, ProjectionConfig, ProjectionEngine, ProjectionRecord,
    SkippedSecurity,
};
pub use scenario::ScenarioRunner;
