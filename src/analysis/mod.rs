//! Cross-sectional aggregation and the reform analysis entry point

mod aggregate;
pub mod band;
mod baseline;
mod orchestrator;
pub mod sector;

pub use aggregate::AggregateImpact;
pub use band::{aggregate_by_band, turnover_bands, BandImpact, TurnoverBand};
pub use baseline::BaselineYear;
pub use orchestrator::{ReformAnalysis, ReformAnalyzer};
pub use sector::{aggregate_by_sector, SectorImpact};
