//! Projection assumptions: lookback window policy and growth-rate settings

mod window;
pub mod loader;

pub use window::{WindowPolicy, WindowTier};
pub use loader::LoadedAssumptions;

use crate::error::{Error, Result};
use crate::growth::ElapsedConvention;
use serde::Serialize;
use std::path::Path;

/// Default cap on the estimated growth rate (15% per year)
pub const DEFAULT_MAX_CAGR: f64 = 0.15;

/// Check a growth cap: finite and not negative.
///
/// A NaN cap would never clamp anything and a negative one would turn every
/// positive rate into a decline.
pub fn validate_max_cagr(cap: f64) -> Result<f64> {
    if cap.is_finite() && cap >= 0.0 {
        Ok(cap)
    } else {
        Err(Error::InvalidParameter(format!(
            "max CAGR must be finite and non-negative, got {}",
            cap
        )))
    }
}

/// Settings applied to every growth estimate in a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthAssumptions {
    /// Upper bound on the projected rate; `None` disables capping
    pub max_cagr: Option<f64>,
    /// How elapsed years are derived from each window
    pub elapsed: ElapsedConvention,
}

impl Default for GrowthAssumptions {
    fn default() -> Self {
        Self {
            max_cagr: Some(DEFAULT_MAX_CAGR),
            elapsed: ElapsedConvention::default(),
        }
    }
}

/// Container for all projection assumptions
#[derive(Debug, Clone, Serialize)]
pub struct Assumptions {
    pub window_policy: WindowPolicy,
    pub growth: GrowthAssumptions,
}

impl Assumptions {
    /// Built-in defaults: three age tiers, 15% cap, 252 trading days per year
    pub fn default_growth() -> Self {
        Self {
            window_policy: WindowPolicy::default_age_tiers(),
            growth: GrowthAssumptions::default(),
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;

        Ok(Self {
            growth: GrowthAssumptions {
                max_cagr: loader::parse_max_cagr(&loaded.growth_settings, Some(DEFAULT_MAX_CAGR))?,
                elapsed: loader::parse_elapsed_convention(&loaded.growth_settings)?,
            },
            window_policy: loaded.window_policy,
        })
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_growth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_matches_defaults() {
        let from_csv = Assumptions::from_csv().expect("Failed to load assumptions");
        let defaults = Assumptions::default_growth();
        assert_eq!(from_csv.window_policy, defaults.window_policy);
        assert_eq!(from_csv.growth, defaults.growth);
    }

    #[test]
    fn test_validate_max_cagr() {
        assert_eq!(validate_max_cagr(0.15).unwrap(), 0.15);
        assert_eq!(validate_max_cagr(0.0).unwrap(), 0.0);
        assert!(validate_max_cagr(-0.01).is_err());
        assert!(validate_max_cagr(f64::NAN).is_err());
        assert!(validate_max_cagr(f64::INFINITY).is_err());
    }
}
