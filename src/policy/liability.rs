//! Liability function
//!
//! Gates and scales a firm's externally supplied full liability according
//! to the policy schedule. Nothing here recomputes the liability itself.

use super::{ResolvedPolicy, TaperSchedule};
use crate::projection::AgedPopulation;
use crate::Pounds;
use rayon::prelude::*;

/// Statutory VAT rate the full liabilities are computed at
pub const STANDARD_RATE: f64 = 0.20;

/// Liability owed by one firm.
///
/// `rate` is the statutory rate that applies to the firm under the policy;
/// at `rate == standard_rate` the result never exceeds `full_liability`.
pub fn liability(
    turnover: Pounds,
    full_liability: Pounds,
    schedule: &TaperSchedule,
    rate: f64,
    standard_rate: f64,
) -> Pounds {
    let multiplier = schedule.multiplier(turnover);
    if multiplier == 0.0 {
        return Pounds::ZERO;
    }
    if rate == standard_rate {
        full_liability * multiplier
    } else {
        full_liability * multiplier * (rate / standard_rate)
    }
}

/// Apply the policy to every row of an aged population at once.
/// Excluded rows (non-positive turnover or weight) owe nothing.
pub fn population_liabilities(
    population: &AgedPopulation,
    policy: &ResolvedPolicy,
    standard_rate: f64,
) -> Vec<Pounds> {
    (0..population.len())
        .into_par_iter()
        .map(|row| {
            if !population.is_included(row) {
                return Pounds::ZERO;
            }
            let rate = policy.rate_for(population.sector[row], standard_rate);
            liability(
                population.turnover[row],
                population.full_liability[row],
                &policy.schedule,
                rate,
                standard_rate,
            )
        })
        .collect()
}
