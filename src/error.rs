//! Error types
//!
//! Validation errors are the caller's fault and can be fixed by resubmitting.
//! Data errors mean the engine and its data collaborator disagree about the
//! schema or horizon. Internal errors cover anything that would otherwise
//! leak a wrong number.

use thiserror::Error;

/// A policy request that falls outside the accepted contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("Registration threshold must be between £0 and £500,000 (got {0})")]
    ThresholdOutOfRange(i64),

    #[error("Custom taper requires taper_start and taper_end")]
    MissingTaperBounds,

    #[error("Taper start must be less than taper end (start={start}, end={end})")]
    InvertedTaper { start: i64, end: i64 },

    #[error("Sector rate for SIC {sector} must be between 0 and 1 (got {rate})")]
    SectorRateOutOfRange { sector: u8, rate: f64 },

    #[error("Unknown SIC division {0} in sector rates")]
    InvalidSector(u8),
}

/// Schema or horizon mismatch between the engine and its inputs
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Required column '{column}' missing from {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Fiscal year index {index} out of range (horizon has {horizon} years)")]
    YearOutOfRange { index: usize, horizon: usize },

    #[error("Invalid value in {source_name} at line {line}: {message}")]
    InvalidRecord {
        source_name: String,
        line: u64,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything the reform engine can fail with
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(#[from] PolicyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Short machine-readable category used by the response layer
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation_error",
            EngineError::Data(_) => "data_error",
            EngineError::Internal(_) => "internal_error",
        }
    }
}
