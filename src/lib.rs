//! VAT registration threshold reform simulator
//!
//! Takes a weighted synthetic firm population and a proposed threshold
//! policy, ages the population across a fixed fiscal-year horizon and
//! reports baseline vs reform revenue and registration impacts by year,
//! by sector and by turnover band.

pub mod money;
pub mod error;
pub mod firms;
pub mod policy;
pub mod assumptions;
pub mod projection;
pub mod analysis;
pub mod api;

pub use money::Pounds;
pub use error::{DataError, EngineError, PolicyError};
pub use assumptions::{EngineConfig, FiscalYearProfile};
pub use firms::{FirmRecord, FirmTable, Sector};
pub use policy::{PolicyRequest, ResolvedPolicy, TaperKind};
pub use analysis::{ReformAnalysis, ReformAnalyzer};
