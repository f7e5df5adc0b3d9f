//! Core projection engine: window selection, growth estimation, compounding

use super::records::{PortfolioProjection, ProjectionRecord, SecurityOutcome, SkippedSecurity};
use crate::assumptions::Assumptions;
use crate::error::{Error, Result};
use crate::growth::GrowthEstimate;
use crate::history::{HistorySource, SecurityAge};
use crate::holdings::HoldingRequest;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rayon::prelude::*;

/// US 10-year average inflation, approximate
pub const DEFAULT_INFLATION_RATE: f64 = 0.025;

/// Default holding period in years
pub const DEFAULT_HOLDING_PERIOD_YEARS: u32 = 10;

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Number of years to compound over
    pub holding_period_years: u32,

    /// Annual inflation used to deflate final values
    pub inflation_rate: f64,

    /// Date security ages are measured to.
    /// If None, each security's last observation date is used.
    pub as_of: Option<NaiveDate>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            holding_period_years: DEFAULT_HOLDING_PERIOD_YEARS,
            inflation_rate: DEFAULT_INFLATION_RATE,
            as_of: None,
        }
    }
}

/// Main projection engine
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    fn validate(&self) -> Result<()> {
        if self.config.holding_period_years == 0 {
            return Err(Error::InvalidParameter(
                "holding period must be at least 1 year".to_string(),
            ));
        }
        let inflation = self.config.inflation_rate;
        if !inflation.is_finite() || inflation <= -1.0 {
            return Err(Error::InvalidParameter(format!(
                "inflation rate must be finite and above -100%, got {}",
                inflation
            )));
        }
        Ok(())
    }

    /// Project every request and aggregate the survivors.
    ///
    /// Securities are evaluated in parallel; each failure is logged and
    /// returned as a `SkippedSecurity`. Fails only when no security survives.
    pub fn project<S>(&self, requests: &[HoldingRequest], source: &S) -> Result<PortfolioProjection>
    where
        S: HistorySource + Sync + ?Sized,
    {
        self.validate()?;
        info!(
            "Projecting {} securities over {} years (inflation {:.2}%)",
            requests.len(),
            self.config.holding_period_years,
            self.config.inflation_rate * 100.0
        );

        let outcomes: Vec<SecurityOutcome> = requests
            .par_iter()
            .map(|request| {
                self.project_security(request, source).map_err(|error| {
                    warn!("Skipping {}: {}", request.ticker(), error);
                    SkippedSecurity {
                        ticker: request.ticker().to_string(),
                        error,
                    }
                })
            })
            .collect();

        PortfolioProjection::from_outcomes(outcomes, self.config.holding_period_years)
    }

    /// Project a single holding
    pub fn project_security<S>(&self, request: &HoldingRequest, source: &S) -> Result<ProjectionRecord>
    where
        S: HistorySource + ?Sized,
    {
        self.validate()?;
        let ticker = request.ticker();

        // Age from the first observation of the full history
        let full_history = source.full_history(ticker)?;
        let first_date = full_history
            .first_date()
            .ok_or(Error::InsufficientData { points: 0 })?;
        let as_of = self.config.as_of.or(full_history.last_date()).unwrap_or(first_date);
        let age = SecurityAge::between(first_date, as_of);

        let tier = self.assumptions.window_policy.select(age);
        let window = full_history.window(tier.window);
        info!(
            "{}: {:.1} years since first trade, using {} window ({}), {} observations",
            ticker,
            age.years(),
            tier.window,
            tier.label,
            window.len()
        );

        let growth_assumptions = &self.assumptions.growth;
        let elapsed_years = growth_assumptions.elapsed.elapsed_years(&window);
        let estimate = GrowthEstimate::compute(&window, elapsed_years, growth_assumptions.max_cagr)?;
        if estimate.capped {
            info!(
                "{}: CAGR {:.2}% capped at {:.2}%",
                ticker,
                estimate.raw_rate * 100.0,
                estimate.rate * 100.0
            );
        } else {
            debug!(
                "{}: CAGR {:.4}% over {:.2} years",
                ticker,
                estimate.rate * 100.0,
                estimate.elapsed_years
            );
        }

        ProjectionRecord::build(
            ticker,
            request.initial_amount(),
            age.years(),
            tier.window,
            estimate,
            self.config.holding_period_years,
            self.config.inflation_rate,
        )
    }
}

/// Project with default assumptions (age-tier windows, 15% cap, 252-day years)
pub fn project<S>(
    requests: &[HoldingRequest],
    holding_period_years: u32,
    inflation_rate: f64,
    source: &S,
) -> Result<PortfolioProjection>
where
    S: HistorySource + Sync + ?Sized,
{
    let config = ProjectionConfig {
        holding_period_years,
        inflation_rate,
        as_of: None,
    };
    ProjectionEngine::new(Assumptions::default_growth(), config).project(requests, source)
}
