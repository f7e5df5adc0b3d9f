//! CSV-based assumption loader
//!
//! Loads projection assumptions from CSV files in data/assumptions/

use super::window::{WindowPolicy, WindowTier};
use crate::error::{Error, Result};
use crate::growth::{ElapsedConvention, DEFAULT_TRADING_DAYS_PER_YEAR};
use crate::history::WindowSpec;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

fn parse_f64(field: &str, what: &str) -> Result<f64> {
    field
        .trim()
        .parse()
        .map_err(|_| Error::Parse(format!("Invalid {}: '{}'", what, field)))
}

/// Load window policy tiers from a reader.
/// Columns: MinAgeYears, Window, Label (label optional)
pub fn load_window_policy_from_reader<R: std::io::Read>(reader: R) -> Result<WindowPolicy> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut tiers = Vec::new();

    for result in reader.records() {
        let record = result?;
        let min_age = parse_f64(record.get(0).unwrap_or(""), "MinAgeYears")?;
        let window: WindowSpec = record.get(1).unwrap_or("").parse()?;
        let label = record.get(2).unwrap_or("").trim().to_string();
        tiers.push(WindowTier::new(min_age, window, label));
    }

    WindowPolicy::new(tiers)
}

/// Load window policy tiers from window_policy.csv
pub fn load_window_policy(path: &Path) -> Result<WindowPolicy> {
    let file = File::open(path.join("window_policy.csv"))?;
    load_window_policy_from_reader(file)
}

/// Load key/value growth settings from a reader.
/// Returns HashMap<key, raw value>
pub fn load_growth_settings_from_reader<R: std::io::Read>(reader: R) -> Result<HashMap<String, String>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut settings = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let (key, value) = match (record.get(0), record.get(1)) {
            (Some(key), Some(value)) => (key.trim().to_ascii_lowercase(), value.trim().to_string()),
            _ => return Err(Error::Parse(format!("Expected Key,Value row, got {:?}", record))),
        };
        settings.insert(key, value);
    }

    Ok(settings)
}

/// Load key/value growth settings from growth.csv
pub fn load_growth_settings(path: &Path) -> Result<HashMap<String, String>> {
    let file = File::open(path.join("growth.csv"))?;
    load_growth_settings_from_reader(file)
}

/// Growth cap from settings. Missing key keeps the default; empty or `none` disables it.
pub fn parse_max_cagr(settings: &HashMap<String, String>, default: Option<f64>) -> Result<Option<f64>> {
    match settings.get("max_cagr").map(|v| v.as_str()) {
        None => Ok(default),
        Some(v) if v.is_empty() || v.eq_ignore_ascii_case("none") => Ok(None),
        Some(v) => super::validate_max_cagr(parse_f64(v, "max_cagr")?).map(Some),
    }
}

/// Elapsed-time convention from settings
pub fn parse_elapsed_convention(settings: &HashMap<String, String>) -> Result<ElapsedConvention> {
    let per_year = match settings.get("trading_days_per_year") {
        Some(v) => parse_f64(v, "trading_days_per_year")?,
        None => DEFAULT_TRADING_DAYS_PER_YEAR,
    };
    if !(per_year > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "trading_days_per_year must be positive, got {}",
            per_year
        )));
    }

    match settings.get("elapsed_convention").map(|v| v.to_ascii_lowercase()) {
        None => Ok(ElapsedConvention::TradingDays { per_year }),
        Some(v) if v == "trading_days" => Ok(ElapsedConvention::TradingDays { per_year }),
        Some(v) if v == "calendar" => Ok(ElapsedConvention::CalendarSpan),
        Some(other) => Err(Error::Parse(format!("Unknown elapsed_convention: {}", other))),
    }
}

/// All assumption files loaded from a directory
pub struct LoadedAssumptions {
    pub window_policy: WindowPolicy,
    pub growth_settings: HashMap<String, String>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self {
            window_policy: load_window_policy(path)?,
            growth_settings: load_growth_settings(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_assumptions() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let loaded = result.unwrap();
        assert_eq!(loaded.window_policy, WindowPolicy::default_age_tiers());
        assert_eq!(parse_max_cagr(&loaded.growth_settings, None).unwrap(), Some(0.15));
    }

    #[test]
    fn test_window_policy_from_reader() {
        let data = "MinAgeYears,Window,Label\n0,max\n3,3y,recent\n";
        let policy = load_window_policy_from_reader(data.as_bytes()).unwrap();
        assert_eq!(policy.tiers().len(), 2);
        assert_eq!(policy.tiers()[0].label, "");
        assert_eq!(policy.tiers()[1].window, WindowSpec::TrailingYears(3));

        let bad = "MinAgeYears,Window,Label\n0,forever,x\n";
        assert!(load_window_policy_from_reader(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_growth_settings() {
        let data = "Key,Value\nmax_cagr,none\nelapsed_convention,calendar\n";
        let settings = load_growth_settings_from_reader(data.as_bytes()).unwrap();
        assert_eq!(parse_max_cagr(&settings, Some(0.15)).unwrap(), None);
        assert_eq!(parse_elapsed_convention(&settings).unwrap(), ElapsedConvention::CalendarSpan);

        let data = "Key,Value\ntrading_days_per_year,250\n";
        let settings = load_growth_settings_from_reader(data.as_bytes()).unwrap();
        assert_eq!(parse_max_cagr(&settings, Some(0.15)).unwrap(), Some(0.15));
        assert_eq!(
            parse_elapsed_convention(&settings).unwrap(),
            ElapsedConvention::TradingDays { per_year: 250.0 }
        );

        let data = "Key,Value\ntrading_days_per_year,0\n";
        let settings = load_growth_settings_from_reader(data.as_bytes()).unwrap();
        assert!(parse_elapsed_convention(&settings).is_err());
    }

    #[test]
    fn test_single_column_growth_settings_rejected() {
        let data = "Key\nmax_cagr\n";
        assert!(matches!(
            load_growth_settings_from_reader(data.as_bytes()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_max_cagr_rejected() {
        for value in ["-0.05", "NaN", "inf"] {
            let data = format!("Key,Value\nmax_cagr,{}\n", value);
            let settings = load_growth_settings_from_reader(data.as_bytes()).unwrap();
            assert!(
                matches!(parse_max_cagr(&settings, None), Err(Error::InvalidParameter(_))),
                "max_cagr {} accepted",
                value
            );
        }
    }
}
