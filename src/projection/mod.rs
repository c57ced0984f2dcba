//! Projection of the firm population across the fiscal-year horizon
//!
//! Aging is the only place growth assumptions enter. The yearly calculator
//! ages once per year and evaluates both the baseline and the reform
//! scenario against that single aged copy.

mod aging;
pub mod response;
mod yearly;

pub use aging::{age_population, AgedPopulation};
pub use response::{BehaviouralResponse, NoResponse, ResponseContext, ThresholdBunching};
pub use yearly::{registered_weight, weighted_revenue, yearly_impact, YearObservation, YearOutcome, YearlyResult};
