//! Firm records and the immutable population table

use super::Sector;
use crate::Pounds;
use std::collections::BTreeSet;

/// One synthetic firm from the population file
#[derive(Debug, Clone, PartialEq)]
pub struct FirmRecord {
    /// Annual turnover
    pub turnover: Pounds,
    /// Raw SIC classification code as it appeared in the source
    pub sector_code: String,
    /// SIC division derived from `sector_code` at load time
    pub sector: Sector,
    /// Number of real firms this record stands in for
    pub weight: f64,
    /// Liability owed if fully registered at the standard rate
    pub full_liability: Pounds,
}

impl FirmRecord {
    pub fn new(turnover: Pounds, sector_code: &str, weight: f64, full_liability: Pounds) -> Self {
        Self {
            turnover,
            sector_code: sector_code.to_string(),
            sector: Sector::from_sic_code(sector_code),
            weight,
            full_liability,
        }
    }

    /// Whether the record takes part in revenue and registration aggregates.
    /// Excluded records stay in the table but always carry zero liability.
    pub fn is_included(&self) -> bool {
        self.turnover.value() > 0.0 && self.weight > 0.0
    }
}

/// Read-only snapshot of the firm population, loaded once per process
#[derive(Debug, Clone, Default)]
pub struct FirmTable {
    records: Vec<FirmRecord>,
    sectors: Vec<Sector>,
}

impl FirmTable {
    pub fn new(records: Vec<FirmRecord>) -> Self {
        let sectors: BTreeSet<Sector> = records.iter().map(|r| r.sector).collect();
        Self {
            records,
            sectors: sectors.into_iter().collect(),
        }
    }

    pub fn records(&self) -> &[FirmRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every sector present in the table, sorted by division with
    /// `Unclassified` last
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Weighted firm count over included records
    pub fn total_weight(&self) -> f64 {
        self.records
            .iter()
            .filter(|r| r.is_included())
            .map(|r| r.weight)
            .sum()
    }
}
