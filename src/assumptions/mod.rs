//! Fixed modelling assumptions: fiscal-year profile, engine configuration
//! and behavioural parameter tables

mod config;
pub mod elasticity;
pub mod fiscal_year;

pub use config::EngineConfig;
pub use elasticity::{load_elasticities, load_elasticities_from_reader, ElasticityTable};
pub use fiscal_year::{FiscalYearProfile, HORIZON_YEARS};
