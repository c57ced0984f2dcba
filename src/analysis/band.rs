//! Impact by turnover band
//!
//! Bands are half-open `[lower, upper)`: £10k steps up to £200k, then
//! £200-300k, £300-500k, £500k-1m and an open-ended £1m+ band.

use super::AggregateImpact;
use crate::projection::YearObservation;
use crate::Pounds;

/// One turnover band
#[derive(Debug, Clone, PartialEq)]
pub struct TurnoverBand {
    pub label: String,
    pub lower: Pounds,
    /// `None` for the top, open-ended band
    pub upper: Option<Pounds>,
}

impl TurnoverBand {
    fn new(lower: f64, upper: Option<f64>, label: String) -> Self {
        Self {
            label,
            lower: Pounds(lower),
            upper: upper.map(Pounds),
        }
    }

    pub fn contains(&self, turnover: Pounds) -> bool {
        turnover >= self.lower && self.upper.map_or(true, |u| turnover < u)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandImpact {
    pub band: TurnoverBand,
    pub impact: AggregateImpact,
}

/// The fixed band layout, lowest first
pub fn turnover_bands() -> Vec<TurnoverBand> {
    let mut bands: Vec<TurnoverBand> = (0..20)
        .map(|i| {
            let lower = i * 10;
            let upper = lower + 10;
            TurnoverBand::new(
                lower as f64 * 1_000.0,
                Some(upper as f64 * 1_000.0),
                format!("£{}k-{}k", lower, upper),
            )
        })
        .collect();

    bands.push(TurnoverBand::new(200_000.0, Some(300_000.0), "£200k-300k".to_string()));
    bands.push(TurnoverBand::new(300_000.0, Some(500_000.0), "£300k-500k".to_string()));
    bands.push(TurnoverBand::new(500_000.0, Some(1_000_000.0), "£500k-1m".to_string()));
    bands.push(TurnoverBand::new(1_000_000.0, None, "£1m+".to_string()));
    bands
}

/// Index of the band holding `turnover`. Non-positive turnover falls in
/// the first band.
pub fn band_index(bands: &[TurnoverBand], turnover: Pounds) -> usize {
    bands
        .partition_point(|b| b.lower <= turnover)
        .saturating_sub(1)
}

/// Sum baseline and reform liabilities per band across every observed
/// year. Bands with no firms still appear, with zero totals.
pub fn aggregate_by_band(observations: &[YearObservation]) -> Vec<BandImpact> {
    let bands = turnover_bands();
    let mut totals = vec![AggregateImpact::default(); bands.len()];

    for obs in observations {
        let population = &obs.population;
        for row in 0..population.len() {
            let idx = band_index(&bands, population.turnover[row]);
            totals[idx].record(obs.baseline[row], obs.reform[row], population.weight[row]);
        }
    }

    bands
        .into_iter()
        .zip(totals)
        .map(|(band, impact)| BandImpact { band, impact })
        .collect()
}
