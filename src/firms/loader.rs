//! Load the synthetic firm population from CSV
//!
//! The file records turnover and liability in thousands of pounds. Both are
//! converted to `Pounds` here and nowhere else.

use super::{FirmRecord, FirmTable};
use crate::{DataError, Pounds};
use log::info;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Columns the engine cannot run without
pub const REQUIRED_COLUMNS: [&str; 4] = ["annual_turnover_k", "sic_code", "weight", "vat_liability_k"];

/// One row as it appears in the population file
#[derive(Debug, Deserialize)]
struct RawFirmRow {
    annual_turnover_k: f64,
    sic_code: String,
    weight: f64,
    vat_liability_k: f64,
}

/// Load firms from a CSV file path
pub fn load_firms<P: AsRef<Path>>(path: P) -> Result<FirmTable, DataError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    load_firms_from_reader(file, &path.display().to_string())
}

/// Load firms from any reader. `source_name` only labels error messages.
pub fn load_firms_from_reader<R: Read>(reader: R, source_name: &str) -> Result<FirmTable, DataError> {
    let start = Instant::now();
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn {
                column: column.to_string(),
                source_name: source_name.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for result in rdr.deserialize::<RawFirmRow>() {
        let row = result?;
        let line = records.len() as u64 + 2;

        if !row.annual_turnover_k.is_finite() || !row.vat_liability_k.is_finite() || !row.weight.is_finite() {
            return Err(invalid(source_name, line, "non-finite numeric value"));
        }
        if row.weight < 0.0 {
            return Err(invalid(source_name, line, &format!("negative weight {}", row.weight)));
        }
        if row.vat_liability_k < 0.0 {
            return Err(invalid(source_name, line, &format!("negative liability {}", row.vat_liability_k)));
        }

        records.push(FirmRecord::new(
            Pounds::from_thousands(row.annual_turnover_k),
            &row.sic_code,
            row.weight,
            Pounds::from_thousands(row.vat_liability_k),
        ));
    }

    let table = FirmTable::new(records);
    info!(
        "Loaded {} firms ({:.0} weighted) across {} sectors from {} in {:?}",
        table.len(),
        table.total_weight(),
        table.sectors().len(),
        source_name,
        start.elapsed()
    );
    Ok(table)
}

fn invalid(source_name: &str, line: u64, message: &str) -> DataError {
    DataError::InvalidRecord {
        source_name: source_name.to_string(),
        line,
        message: message.to_string(),
    }
}
