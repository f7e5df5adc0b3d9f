//! Age-based lookback window policy
//!
//! Heuristic, not derived law: young securities use all available history,
//! older ones only the recent years so early hyper-growth does not dominate
//! the estimate.

use crate::error::{Error, Result};
use crate::history::{SecurityAge, WindowSpec};
use serde::{Deserialize, Serialize};

/// One tier of the policy: applies from `min_age_years` up to the next tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowTier {
    pub min_age_years: f64,
    pub window: WindowSpec,
    pub label: String,
}

impl WindowTier {
    pub fn new(min_age_years: f64, window: WindowSpec, label: impl Into<String>) -> Self {
        Self {
            min_age_years,
            window,
            label: label.into(),
        }
    }
}

/// Mapping from security age to lookback window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowPolicy {
    tiers: Vec<WindowTier>,
}

impl WindowPolicy {
    /// Build a policy from tiers in any order.
    ///
    /// The youngest tier must start at age 0 so every security resolves.
    pub fn new(mut tiers: Vec<WindowTier>) -> Result<Self> {
        if tiers.iter().any(|t| !t.min_age_years.is_finite()) {
            return Err(Error::InvalidParameter("window tier ages must be finite".to_string()));
        }
        tiers.sort_by(|a, b| a.min_age_years.total_cmp(&b.min_age_years));

        match tiers.first() {
            Some(first) if first.min_age_years <= 0.0 => Ok(Self { tiers }),
            Some(first) => Err(Error::InvalidParameter(format!(
                "window policy must start at age 0, youngest tier starts at {}",
                first.min_age_years
            ))),
            None => Err(Error::InvalidParameter("window policy has no tiers".to_string())),
        }
    }

    /// Under 5 years: everything. 5-10 years and 10+ years: the last 5 years.
    pub fn default_age_tiers() -> Self {
        Self {
            tiers: vec![
                WindowTier::new(0.0, WindowSpec::Max, "young company"),
                WindowTier::new(5.0, WindowSpec::TrailingYears(5), "excluding early hypergrowth"),
                WindowTier::new(10.0, WindowSpec::TrailingYears(5), "mature company"),
            ],
        }
    }

    pub fn tiers(&self) -> &[WindowTier] {
        &self.tiers
    }

    /// Tier with the largest starting age not above `age`
    pub fn select(&self, age: SecurityAge) -> &WindowTier {
        self.tiers
            .iter()
            .rev()
            .find(|t| t.min_age_years <= age.years())
            .unwrap_or(&self.tiers[0])
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::default_age_tiers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let policy = WindowPolicy::default();
        let pick = |years: f64| policy.select(SecurityAge::from_years(years)).window;

        assert_eq!(pick(0.0), WindowSpec::Max);
        assert_eq!(pick(4.99), WindowSpec::Max);
        assert_eq!(pick(5.0), WindowSpec::TrailingYears(5));
        assert_eq!(pick(9.9), WindowSpec::TrailingYears(5));
        assert_eq!(pick(10.0), WindowSpec::TrailingYears(5));
        assert_eq!(pick(80.0), WindowSpec::TrailingYears(5));

        assert_eq!(policy.select(SecurityAge::from_years(7.0)).label, "excluding early hypergrowth");
        assert_eq!(policy.select(SecurityAge::from_years(12.0)).label, "mature company");
    }

    #[test]
    fn test_custom_tiers_sorted() {
        let policy = WindowPolicy::new(vec![
            WindowTier::new(3.0, WindowSpec::TrailingYears(3), "recent"),
            WindowTier::new(0.0, WindowSpec::Max, "all"),
        ])
        .unwrap();
        assert_eq!(policy.tiers()[0].label, "all");
        assert_eq!(policy.select(SecurityAge::from_years(4.0)).window, WindowSpec::TrailingYears(3));
    }

    #[test]
    fn test_policy_must_cover_age_zero() {
        assert!(WindowPolicy::new(vec![]).is_err());
        assert!(WindowPolicy::new(vec![WindowTier::new(1.0, WindowSpec::Max, "late")]).is_err());
        assert!(WindowPolicy::new(vec![WindowTier::new(f64::NAN, WindowSpec::Max, "nan")]).is_err());
    }
}
