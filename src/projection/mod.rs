//! Projection engine for single-security and portfolio growth projections

mod engine;
mod records;

pub use engine::{
    project, ProjectionConfig, ProjectionEngine, DEFAULT_HOLDING_PERIOD_YEARS, DEFAULT_INFLATION_RATE,
};
pub use records::{
    PortfolioProjection, PortfolioSummary, ProjectionRecord, SecurityOutcome, SkippedSecurity,
};
