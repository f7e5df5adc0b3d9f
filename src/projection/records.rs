//! Projection output structures: per-security records and portfolio summary

use crate::error::{Error, Result};
use crate::growth::GrowthEstimate;
use crate::history::WindowSpec;
use serde::Serialize;

/// Projected growth of a single holding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionRecord {
    pub ticker: String,
    pub initial_amount: f64,

    // Estimation inputs
    pub security_age_years: f64,
    pub window: WindowSpec,
    pub growth: GrowthEstimate,

    /// Nominal value at the start of each year, index 0 = initial amount
    pub yearly_values: Vec<f64>,
    pub nominal_final: f64,
    /// Final value deflated by compounded inflation
    pub real_final: f64,
}

impl ProjectionRecord {
    /// Compound `initial_amount` at the estimated rate for `holding_period_years`.
    ///
    /// Fails with `NonFiniteResult` rather than letting NaN or infinity reach
    /// the portfolio totals.
    pub fn build(
        ticker: &str,
        initial_amount: f64,
        security_age_years: f64,
        window: WindowSpec,
        growth: GrowthEstimate,
        holding_period_years: u32,
        inflation_rate: f64,
    ) -> Result<Self> {
        let factor = 1.0 + growth.rate;
        let yearly_values: Vec<f64> = (0..=holding_period_years)
            .map(|year| initial_amount * factor.powf(year as f64))
            .collect();

        if yearly_values.iter().any(|v| !v.is_finite()) {
            return Err(Error::NonFiniteResult("yearly values"));
        }

        let nominal_final = yearly_values[yearly_values.len() - 1];
        let real_final = nominal_final / (1.0 + inflation_rate).powf(holding_period_years as f64);
        if !real_final.is_finite() {
            return Err(Error::NonFiniteResult("real final value"));
        }

        Ok(Self {
            ticker: ticker.to_string(),
            initial_amount,
            security_age_years,
            window,
            growth,
            yearly_values,
            nominal_final,
            real_final,
        })
    }

    /// Growth rate used for the projection (after capping)
    pub fn growth_rate(&self) -> f64 {
        self.growth.rate
    }

    /// `(year, nominal value)` pairs for plotting
    pub fn yearly_points(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.yearly_values.iter().enumerate().map(|(i, &v)| (i as u32, v))
    }
}

/// A security excluded from the run, with the reason
#[derive(Debug)]
pub struct SkippedSecurity {
    pub ticker: String,
    pub error: Error,
}

/// Per-security result collected before aggregation
pub type SecurityOutcome = std::result::Result<ProjectionRecord, SkippedSecurity>;

/// Portfolio-level totals for one projection run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub holding_period_years: u32,
    pub securities: usize,
    pub total_initial: f64,
    pub total_nominal: f64,
    pub total_real: f64,
    pub nominal_gain: f64,
    pub nominal_gain_pct: f64,
    pub real_gain: f64,
    pub real_gain_pct: f64,
    /// Dollar-weighted rate implied by the totals
    pub portfolio_cagr: f64,
    /// Arithmetic mean of the individual growth rates
    pub average_stock_cagr: f64,
    /// Sum of every record's value at each year
    pub total_yearly_values: Vec<f64>,
}

impl PortfolioSummary {
    /// Aggregate included records.
    ///
    /// `portfolio_cagr` and `average_stock_cagr` differ whenever position
    /// sizes or rates differ; both are kept.
    pub fn from_records(records: &[ProjectionRecord], holding_period_years: u32) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::NoValidProjections { skipped: 0 });
        }

        let total_initial: f64 = records.iter().map(|r| r.initial_amount).sum();
        let total_nominal: f64 = records.iter().map(|r| r.nominal_final).sum();
        let total_real: f64 = records.iter().map(|r| r.real_final).sum();

        let portfolio_cagr =
            (total_nominal / total_initial).powf(1.0 / holding_period_years as f64) - 1.0;
        let average_stock_cagr =
            records.iter().map(|r| r.growth_rate()).sum::<f64>() / records.len() as f64;

        let mut total_yearly_values = vec![0.0; holding_period_years as usize + 1];
        for record in records {
            for (total, value) in total_yearly_values.iter_mut().zip(&record.yearly_values) {
                *total += value;
            }
        }

        let totals_finite = [total_initial, total_nominal, total_real]
            .iter()
            .chain(&total_yearly_values)
            .all(|v| v.is_finite());
        if !totals_finite {
            return Err(Error::NonFiniteResult("portfolio totals"));
        }

        let nominal_gain = total_nominal - total_initial;
        let real_gain = total_real - total_initial;

        Ok(Self {
            holding_period_years,
            securities: records.len(),
            total_initial,
            total_nominal,
            total_real,
            nominal_gain,
            nominal_gain_pct: nominal_gain / total_initial,
            real_gain,
            real_gain_pct: real_gain / total_initial,
            portfolio_cagr,
            average_stock_cagr,
            total_yearly_values,
        })
    }

    /// `(year, combined nominal value)` pairs for plotting
    pub fn total_yearly_points(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.total_yearly_values.iter().enumerate().map(|(i, &v)| (i as u32, v))
    }
}

/// Complete result of a projection run
#[derive(Debug)]
pub struct PortfolioProjection {
    pub records: Vec<ProjectionRecord>,
    pub skipped: Vec<SkippedSecurity>,
    pub summary: PortfolioSummary,
}

impl PortfolioProjection {
    /// Partition per-security outcomes and aggregate the successes
    pub fn from_outcomes(outcomes: Vec<SecurityOutcome>, holding_period_years: u32) -> Result<Self> {
        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(record) => records.push(record),
                Err(skip) => skipped.push(skip),
            }
        }

        if records.is_empty() {
            return Err(Error::NoValidProjections { skipped: skipped.len() });
        }

        let summary = PortfolioSummary::from_records(&records, holding_period_years)?;
        Ok(Self { records, skipped, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn estimate(rate: f64) -> GrowthEstimate {
        GrowthEstimate {
            raw_rate: rate,
            rate,
            capped: false,
            elapsed_years: 5.0,
            observations: 1260,
        }
    }

    fn record(ticker: &str, initial: f64, rate: f64, years: u32) -> ProjectionRecord {
        ProjectionRecord::build(ticker, initial, 12.0, WindowSpec::TrailingYears(5), estimate(rate), years, 0.025)
            .unwrap()
    }

    #[test]
    fn test_single_security_scenario() {
        let r = record("ABC", 10_000.0, 0.10, 3);
        let expected = [10_000.0, 11_000.0, 12_100.0, 13_310.0];
        assert_eq!(r.yearly_values.len(), 4);
        for (value, want) in r.yearly_values.iter().zip(expected) {
            assert_relative_eq!(*value, want, epsilon = 1e-6);
        }
        assert_relative_eq!(r.nominal_final, 13_310.0, epsilon = 1e-6);
        assert_relative_eq!(r.real_final, 13_310.0 / 1.025_f64.powi(3), epsilon = 1e-6);
        assert!((r.real_final - 12_359.66).abs() < 0.01);
    }

    #[test]
    fn test_first_value_is_initial_amount() {
        for years in [1, 2, 10, 40] {
            for rate in [-0.3, 0.0, 0.07, 0.15] {
                assert_eq!(record("X", 1234.56, rate, years).yearly_values[0], 1234.56);
            }
        }
    }

    #[test]
    fn test_monotonicity() {
        let up = record("UP", 1000.0, 0.05, 20);
        assert!(up.yearly_values.windows(2).all(|w| w[1] > w[0]));

        let down = record("DOWN", 1000.0, -0.05, 20);
        assert!(down.yearly_values.windows(2).all(|w| w[1] < w[0]));

        let flat = record("FLAT", 1000.0, 0.0, 20);
        assert!(flat.yearly_values.iter().all(|&v| v == 1000.0));
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = ProjectionRecord::build("BIG", 1e300, 1.0, WindowSpec::Max, estimate(1e10), 50, 0.025);
        assert!(matches!(result, Err(Error::NonFiniteResult(_))));
    }

    #[test]
    fn test_blended_cagr_between_rates() {
        let records = vec![record("A", 5000.0, 0.08, 5), record("B", 5000.0, 0.12, 5)];
        let summary = PortfolioSummary::from_records(&records, 5).unwrap();

        assert!(summary.portfolio_cagr > 0.08 && summary.portfolio_cagr < 0.12);
        assert_relative_eq!(summary.average_stock_cagr, 0.10, epsilon = 1e-12);
        assert!((summary.portfolio_cagr - summary.average_stock_cagr).abs() > 1e-6);
    }

    #[test]
    fn test_totals_match_records() {
        let records = vec![
            record("A", 1000.0, 0.03, 7),
            record("B", 2500.0, -0.02, 7),
            record("C", 7300.0, 0.15, 7),
        ];
        let summary = PortfolioSummary::from_records(&records, 7).unwrap();

        let nominal: f64 = records.iter().map(|r| r.nominal_final).sum();
        let real: f64 = records.iter().map(|r| r.real_final).sum();
        assert_relative_eq!(summary.total_nominal, nominal, epsilon = 1e-6);
        assert_relative_eq!(summary.total_real, real, epsilon = 1e-6);
        assert_relative_eq!(summary.total_initial, 10_800.0, epsilon = 1e-9);

        assert_eq!(summary.total_yearly_values.len(), 8);
        assert_relative_eq!(summary.total_yearly_values[0], 10_800.0, epsilon = 1e-9);
        assert_relative_eq!(summary.total_yearly_values[7], nominal, epsilon = 1e-6);
        assert_relative_eq!(summary.nominal_gain, nominal - 10_800.0, epsilon = 1e-6);

        let implied = summary.total_initial * (1.0 + summary.portfolio_cagr).powi(7);
        assert_relative_eq!(implied, summary.total_nominal, epsilon = 1e-6);
    }

    #[test]
    fn test_overflowing_totals_rejected() {
        let records = vec![record("A", 1e308, 0.15, 1), record("B", 1e308, 0.15, 1)];
        assert!(matches!(
            PortfolioSummary::from_records(&records, 1),
            Err(Error::NonFiniteResult("portfolio totals"))
        ));
    }

    #[test]
    fn test_outcomes_partitioned() {
        let outcomes = vec![
            Ok(record("A", 1000.0, 0.05, 3)),
            Err(SkippedSecurity {
                ticker: "B".to_string(),
                error: Error::InsufficientData { points: 1 },
            }),
        ];
        let projection = PortfolioProjection::from_outcomes(outcomes, 3).unwrap();
        assert_eq!(projection.records.len(), 1);
        assert_eq!(projection.skipped.len(), 1);
        assert_eq!(projection.summary.securities, 1);
    }

    #[test]
    fn test_all_skipped_is_fatal() {
        let outcomes = vec![Err(SkippedSecurity {
            ticker: "B".to_string(),
            error: Error::InsufficientData { points: 1 },
        })];
        assert!(matches!(
            PortfolioProjection::from_outcomes(outcomes, 3),
            Err(Error::NoValidProjections { skipped: 1 })
        ));
    }
}
