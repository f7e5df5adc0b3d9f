//! Sensitivity runs over a fixed set of holdings
//!
//! Window policy and growth settings are read once; each run only varies the
//! holding period, inflation rate or as-of date.

use crate::assumptions::{Assumptions, GrowthAssumptions};
use crate::error::Result;
use crate::history::HistorySource;
use crate::holdings::HoldingRequest;
use crate::projection::{PortfolioProjection, ProjectionConfig, ProjectionEngine};
use std::path::Path;

/// Projects the same holdings under several configurations.
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv_path(Path::new("data/assumptions"))?;
///
/// for inflation_rate in [0.02, 0.025, 0.035] {
///     let config = ProjectionConfig { inflation_rate, ..Default::default() };
///     let projection = runner.run(&requests, &source, config)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Built-in age tiers and a 15% cap
    pub fn new() -> Self {
        Self::with_assumptions(Assumptions::default_growth())
    }

    /// Read `window_policy.csv` and `growth.csv` from `dir`
    pub fn from_csv_path(dir: &Path) -> Result<Self> {
        Assumptions::from_csv_path(dir).map(Self::with_assumptions)
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    /// Cap and elapsed-time convention shared by every run
    pub fn growth_mut(&mut self) -> &mut GrowthAssumptions {
        &mut self.assumptions.growth
    }

    /// Project `requests` under one configuration
    pub fn run<S>(
        &self,
        requests: &[HoldingRequest],
        source: &S,
        config: ProjectionConfig,
    ) -> Result<PortfolioProjection>
    where
        S: HistorySource + Sync + ?Sized,
    {
        ProjectionEngine::new(self.assumptions.clone(), config).project(requests, source)
    }

    /// One result per config, in order. A failing config does not stop the others.
    pub fn run_scenarios<S>(
        &self,
        requests: &[HoldingRequest],
        source: &S,
        configs: &[ProjectionConfig],
    ) -> Vec<Result<PortfolioProjection>>
    where
        S: HistorySource + Sync + ?Sized,
    {
        configs
            .iter()
            .map(|config| self.run(requests, source, config.clone()))
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
