//! Population aging

use crate::assumptions::EngineConfig;
use crate::firms::{FirmTable, Sector};
use crate::{DataError, Pounds};

/// Column-oriented copy of the firm table projected to one fiscal year
#[derive(Debug, Clone, PartialEq)]
pub struct AgedPopulation {
    pub year_index: usize,
    pub turnover: Vec<Pounds>,
    pub weight: Vec<f64>,
    pub full_liability: Vec<Pounds>,
    pub sector: Vec<Sector>,
}

impl AgedPopulation {
    pub fn len(&self) -> usize {
        self.turnover.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turnover.is_empty()
    }

    /// Row takes part in aggregates (positive turnover and weight)
    pub fn is_included(&self, row: usize) -> bool {
        self.turnover[row].value() > 0.0 && self.weight[row] > 0.0
    }

    /// Same population with a replacement turnover column
    pub fn with_turnover(&self, turnover: Vec<Pounds>) -> Self {
        debug_assert_eq!(turnover.len(), self.len());
        Self {
            year_index: self.year_index,
            turnover,
            weight: self.weight.clone(),
            full_liability: self.full_liability.clone(),
            sector: self.sector.clone(),
        }
    }
}

/// Project the table to fiscal year `year_index`.
///
/// Weights scale by the year's population growth factor and turnover by
/// `1 + growth × year_index`. The source table is left untouched.
pub fn age_population(
    table: &FirmTable,
    config: &EngineConfig,
    year_index: usize,
) -> Result<AgedPopulation, DataError> {
    let year = config.fiscal_years.get(year_index).ok_or(DataError::YearOutOfRange {
        index: year_index,
        horizon: config.fiscal_years.len(),
    })?;

    let growth = year.population_growth_factor;
    let turnover_factor = config.turnover_factor(year_index);
    let records = table.records();

    Ok(AgedPopulation {
        year_index,
        turnover: records.iter().map(|r| r.turnover * turnover_factor).collect(),
        weight: records.iter().map(|r| r.weight * growth).collect(),
        full_liability: records.iter().map(|r| r.full_liability).collect(),
        sector: records.iter().map(|r| r.sector).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firms::FirmRecord;

    fn sample_table() -> FirmTable {
        FirmTable::new(vec![
            FirmRecord::new(Pounds(100_000.0), "47", 1.0, Pounds(10_000.0)),
            FirmRecord::new(Pounds(40_000.0), "56", 2.5, Pounds(3_000.0)),
        ])
    }

    #[test]
    fn test_year_zero_only_scales_weights() {
        let table = sample_table();
        let config = EngineConfig::default();
        let aged = age_population(&table, &config, 0).expect("year 0");

        assert_eq!(aged.turnover, vec![Pounds(100_000.0), Pounds(40_000.0)]);
        assert!((aged.weight[0] - 1.0516).abs() < 1e-12);
        assert!((aged.weight[1] - 2.5 * 1.0516).abs() < 1e-12);
    }

    #[test]
    fn test_turnover_grows_linearly() {
        let table = sample_table();
        let config = EngineConfig::default();
        let aged = age_population(&table, &config, 3).expect("year 3");

        assert!((aged.turnover[0].value() - 107_500.0).abs() < 1e-9);
        assert!((aged.weight[0] - 1.1424).abs() < 1e-12);
        // Liability and sector are carried through unchanged
        assert_eq!(aged.full_liability[0], Pounds(10_000.0));
        assert_eq!(aged.sector[1], Sector::Division(56));
    }

    #[test]
    fn test_aging_is_idempotent_and_non_mutating() {
        let table = sample_table();
        let before = table.records().to_vec();
        let config = EngineConfig::default();

        let first = age_population(&table, &config, 5).expect("year 5");
        let second = age_population(&table, &config, 5).expect("year 5");

        assert_eq!(first, second);
        assert_eq!(table.records(), before.as_slice());
    }

    #[test]
    fn test_year_out_of_range() {
        let table = sample_table();
        let config = EngineConfig::default();
        let err = age_population(&table, &config, 6).unwrap_err();
        assert!(matches!(err, DataError::YearOutOfRange { index: 6, horizon: 6 }));
    }
}
