//! Reform requests, validation and the liability function

mod reform;
pub mod liability;

pub use reform::{PolicyRequest, ResolvedPolicy, TaperKind, TaperSchedule, MAX_THRESHOLD};
pub use liability::{liability, population_liabilities, STANDARD_RATE};
