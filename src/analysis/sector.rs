//! Impact by SIC division

use super::AggregateImpact;
use crate::firms::Sector;
use crate::projection::YearObservation;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SectorImpact {
    pub sector: Sector,
    pub description: String,
    pub impact: AggregateImpact,
}

/// Sum baseline and reform liabilities per sector across every observed
/// year. Every sector in `sectors` appears in the output, in that order,
/// even when none of its firms carry weight. Sectors observed in the
/// population but missing from `sectors` get their own buckets, appended
/// in sector order.
pub fn aggregate_by_sector(sectors: &[Sector], observations: &[YearObservation]) -> Vec<SectorImpact> {
    let mut index: HashMap<Sector, usize> = sectors.iter().enumerate().map(|(i, &s)| (s, i)).collect();
    let mut buckets: Vec<Sector> = sectors.to_vec();
    let mut totals = vec![AggregateImpact::default(); sectors.len()];

    for obs in observations {
        let population = &obs.population;
        for row in 0..population.len() {
            let sector = population.sector[row];
            let idx = *index.entry(sector).or_insert_with(|| {
                buckets.push(sector);
                totals.push(AggregateImpact::default());
                buckets.len() - 1
            });
            totals[idx].record(obs.baseline[row], obs.reform[row], population.weight[row]);
        }
    }

    if buckets.len() > sectors.len() {
        debug!("{} sectors observed outside the listed set", buckets.len() - sectors.len());
    }

    let mut impacts: Vec<SectorImpact> = buckets
        .into_iter()
        .zip(totals)
        .map(|(sector, impact)| SectorImpact {
            sector,
            description: sector.description(),
            impact,
        })
        .collect();
    impacts[sectors.len()..].sort_by_key(|s| s.sector);
    impacts
}
