//! Baseline statistics under unreformed rules

use crate::assumptions::EngineConfig;
use crate::firms::FirmTable;
use crate::policy::{population_liabilities, ResolvedPolicy};
use crate::projection::{age_population, registered_weight, weighted_revenue};
use crate::{DataError, Pounds};

/// Revenue and registrations for one fiscal year with no reform at all
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineYear {
    pub label: String,
    pub threshold: Pounds,
    pub total_revenue: Pounds,
    /// Weighted count of firms with positive liability
    pub registered_firms: f64,
    pub growth_factor: f64,
}

pub(super) fn baseline_year(
    table: &FirmTable,
    config: &EngineConfig,
    year_index: usize,
) -> Result<BaselineYear, DataError> {
    let population = age_population(table, config, year_index)?;
    let year = &config.fiscal_years[year_index];
    let policy = ResolvedPolicy::baseline(year.baseline_threshold);
    let liabilities = population_liabilities(&population, &policy, config.standard_rate);

    Ok(BaselineYear {
        label: year.label.clone(),
        threshold: year.baseline_threshold,
        total_revenue: weighted_revenue(&liabilities, &population.weight),
        registered_firms: registered_weight(&liabilities, &population.weight),
        growth_factor: year.population_growth_factor,
    })
}
