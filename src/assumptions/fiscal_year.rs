//! Fiscal-year profile for the projection horizon

use crate::Pounds;
use serde::{Deserialize, Serialize};

/// Number of fiscal years in the default horizon
pub const HORIZON_YEARS: usize = 6;

/// Unreformed rules and population growth for one fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalYearProfile {
    /// Financial year identifier, e.g. "2025-26"
    pub label: String,
    /// Registration threshold in force that year without any reform
    pub baseline_threshold: Pounds,
    /// Multiplier on every firm weight for net population growth
    pub population_growth_factor: f64,
}

impl FiscalYearProfile {
    pub fn new(label: &str, baseline_threshold: f64, population_growth_factor: f64) -> Self {
        Self {
            label: label.to_string(),
            baseline_threshold: Pounds(baseline_threshold),
            population_growth_factor,
        }
    }

    /// Default six-year horizon. Index 0 is the nearest year.
    pub fn default_horizon() -> Vec<FiscalYearProfile> {
        vec![
            Self::new("2025-26", 90_000.0, 1.0516),
            Self::new("2026-27", 90_000.0, 1.0779),
            Self::new("2027-28", 90_000.0, 1.1102),
            Self::new("2028-29", 90_000.0, 1.1424),
            Self::new("2029-30", 90_000.0, 1.1761),
            Self::new("2030-31", 90_000.0, 1.2114),
        ]
    }
}
