//! Engine configuration
//!
//! Everything here has a hard-coded default; a JSON file may override any
//! subset of fields.

use super::FiscalYearProfile;
use crate::policy::STANDARD_RATE;
use crate::DataError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters shared by every analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Statutory VAT rate the supplied full liabilities were computed at
    #[serde(default = "default_standard_rate")]
    pub standard_rate: f64,

    /// Linear nominal turnover growth per projection year (0.025 = 2.5%)
    #[serde(default = "default_turnover_growth")]
    pub turnover_growth: f64,

    /// Fiscal years in the horizon, nearest first
    #[serde(default = "FiscalYearProfile::default_horizon")]
    pub fiscal_years: Vec<FiscalYearProfile>,
}

fn default_standard_rate() -> f64 { STANDARD_RATE }
fn default_turnover_growth() -> f64 { 0.025 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_rate: default_standard_rate(),
            turnover_growth: default_turnover_growth(),
            fiscal_years: FiscalYearProfile::default_horizon(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file and validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DataError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Turnover multiplier applied at a given year index
    pub fn turnover_factor(&self, year_index: usize) -> f64 {
        1.0 + self.turnover_growth * year_index as f64
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if !(self.standard_rate > 0.0 && self.standard_rate <= 1.0) {
            return Err(DataError::Config(format!(
                "standard_rate must be in (0, 1], got {}",
                self.standard_rate
            )));
        }
        if self.fiscal_years.is_empty() {
            return Err(DataError::Config("fiscal_years must not be empty".to_string()));
        }
        for (i, year) in self.fiscal_years.iter().enumerate() {
            if !(year.population_growth_factor.is_finite() && year.population_growth_factor > 0.0) {
                return Err(DataError::Config(format!(
                    "{}: population_growth_factor must be positive, got {}",
                    year.label, year.population_growth_factor
                )));
            }
            if !year.baseline_threshold.is_finite() || year.baseline_threshold.value() < 0.0 {
                return Err(DataError::Config(format!(
                    "{}: baseline_threshold must be non-negative",
                    year.label
                )));
            }
            let factor = self.turnover_factor(i);
            if !(factor.is_finite() && factor > 0.0) {
                return Err(DataError::Config(format!(
                    "{}: turnover growth gives non-positive factor {}",
                    year.label, factor
                )));
            }
        }
        Ok(())
    }
}
