//! Sector elasticity table
//!
//! Produced by the external calibration scripts and consumed read-only by
//! the behavioural response strategy.

use crate::firms::Sector;
use crate::DataError;
use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Elasticity used for sectors missing from the table
pub const DEFAULT_ELASTICITY: f64 = 1.0;

#[derive(Debug, Deserialize)]
struct RawElasticityRow {
    sic_2digit: u8,
    elasticity: f64,
}

/// Threshold-response elasticity by SIC division
#[derive(Debug, Clone, Default)]
pub struct ElasticityTable {
    by_division: HashMap<u8, f64>,
}

impl ElasticityTable {
    pub fn from_pairs(pairs: &[(u8, f64)]) -> Self {
        Self {
            by_division: pairs.iter().copied().collect(),
        }
    }

    /// Elasticity for a sector, or the default if not calibrated
    pub fn get(&self, sector: Sector) -> f64 {
        sector
            .division()
            .and_then(|d| self.by_division.get(&d).copied())
            .unwrap_or(DEFAULT_ELASTICITY)
    }

    pub fn len(&self) -> usize {
        self.by_division.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_division.is_empty()
    }
}

/// Load elasticities from a CSV file path
pub fn load_elasticities<P: AsRef<Path>>(path: P) -> Result<ElasticityTable, DataError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    load_elasticities_from_reader(file, &path.display().to_string())
}

pub fn load_elasticities_from_reader<R: Read>(reader: R, source_name: &str) -> Result<ElasticityTable, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in ["sic_2digit", "elasticity"] {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn {
                column: column.to_string(),
                source_name: source_name.to_string(),
            });
        }
    }

    let mut by_division = HashMap::new();
    for (i, result) in rdr.deserialize::<RawElasticityRow>().enumerate() {
        let row = result?;
        if !row.elasticity.is_finite() || row.elasticity < 0.0 {
            return Err(DataError::InvalidRecord {
                source_name: source_name.to_string(),
                line: i as u64 + 2,
                message: format!("elasticity for SIC {} must be non-negative", row.sic_2digit),
            });
        }
        by_division.insert(row.sic_2digit, row.elasticity);
    }

    info!("Loaded {} sector elasticities from {}", by_division.len(), source_name);
    Ok(ElasticityTable { by_division })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_with_default() {
        let table = load_elasticities_from_reader(
            "sic_2digit,elasticity,source\n56,1.8,calibrated\n96,0.4,calibrated\n".as_bytes(),
            "sample",
        )
        .expect("Failed to load");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(Sector::Division(56)), 1.8);
        assert_eq!(table.get(Sector::Division(47)), DEFAULT_ELASTICITY);
        assert_eq!(table.get(Sector::Unclassified), DEFAULT_ELASTICITY);
    }

    #[test]
    fn test_missing_column() {
        let err = load_elasticities_from_reader("sic,elasticity\n56,1.0\n".as_bytes(), "bad").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
    }

    #[test]
    fn test_negative_elasticity_reports_csv_line() {
        // Repeated division on lines 2-3, bad value on line 4
        let csv = "sic_2digit,elasticity\n56,1.0\n56,1.2\n47,-0.5\n";
        let err = load_elasticities_from_reader(csv.as_bytes(), "dup").unwrap_err();
        assert!(matches!(err, DataError::InvalidRecord { line: 4, .. }), "{err}");
    }

    #[test]
    fn test_repeated_division_keeps_last_value() {
        let csv = "sic_2digit,elasticity\n56,1.0\n56,1.2\n";
        let table = load_elasticities_from_reader(csv.as_bytes(), "dup").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(Sector::Division(56)), 1.2);
    }
}
