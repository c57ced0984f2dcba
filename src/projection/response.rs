//! Behavioural response to a threshold reform
//!
//! A response strategy rewrites the reform scenario's turnover column before
//! liabilities are computed. The baseline scenario never sees it. Strategies
//! that draw random numbers must be seeded explicitly so an analysis can be
//! reproduced exactly.

use super::AgedPopulation;
use crate::assumptions::ElasticityTable;
use crate::Pounds;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// What a strategy knows about the year it is adjusting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseContext {
    pub year_index: usize,
    pub baseline_threshold: Pounds,
    pub reform_threshold: Pounds,
}

/// Pluggable firm-level response to a reform
pub trait BehaviouralResponse: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Reform-scenario turnover for every row of `population`, in row order
    fn adjusted_turnover(&self, ctx: &ResponseContext, population: &AgedPopulation) -> Vec<Pounds>;
}

/// Firms do not react; reform turnover equals aged turnover
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResponse;

impl BehaviouralResponse for NoResponse {
    fn name(&self) -> &'static str {
        "none"
    }

    fn adjusted_turnover(&self, _ctx: &ResponseContext, population: &AgedPopulation) -> Vec<Pounds> {
        population.turnover.clone()
    }
}

/// Firms bunched just below the current threshold follow a raised
/// threshold up, landing a little below it.
///
/// A firm within `window` below the baseline threshold moves with
/// probability `(1 - distance / window) × elasticity`, clamped to [0, 1].
/// Nothing moves when the reform does not raise the threshold.
#[derive(Debug, Clone)]
pub struct ThresholdBunching {
    pub seed: u64,
    pub elasticities: ElasticityTable,
    pub window: Pounds,
    pub max_shortfall: Pounds,
}

impl ThresholdBunching {
    pub fn new(seed: u64, elasticities: ElasticityTable) -> Self {
        Self {
            seed,
            elasticities,
            window: Pounds(20_000.0),
            max_shortfall: Pounds(5_000.0),
        }
    }

    /// Independent stream per year so parallel years stay reproducible
    fn year_rng(&self, year_index: usize) -> ChaCha20Rng {
        let mix = (year_index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        ChaCha20Rng::seed_from_u64(self.seed ^ mix)
    }
}

impl BehaviouralResponse for ThresholdBunching {
    fn name(&self) -> &'static str {
        "threshold-bunching"
    }

    fn adjusted_turnover(&self, ctx: &ResponseContext, population: &AgedPopulation) -> Vec<Pounds> {
        if ctx.reform_threshold <= ctx.baseline_threshold || self.window.value() <= 0.0 {
            return population.turnover.clone();
        }

        let mut rng = self.year_rng(ctx.year_index);
        let shortfall = self.max_shortfall.value().max(0.0);

        population
            .turnover
            .iter()
            .enumerate()
            .map(|(row, &turnover)| {
                if !population.is_included(row) {
                    return turnover;
                }
                let distance = ctx.baseline_threshold.value() - turnover.value();
                if distance <= 0.0 || distance > self.window.value() {
                    return turnover;
                }

                let closeness = 1.0 - distance / self.window.value();
                let probability = (closeness * self.elasticities.get(population.sector[row])).clamp(0.0, 1.0);
                if rng.random::<f64>() < probability {
                    let landing = ctx.reform_threshold - Pounds(rng.random_range(0.0..=shortfall));
                    landing.max(turnover)
                } else {
                    turnover
                }
            })
            .collect()
    }
}
