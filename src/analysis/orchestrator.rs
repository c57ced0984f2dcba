//! Reform analysis entry point
//!
//! `ReformAnalyzer` is built once per process around the firm table and the
//! engine configuration and then shared by every request. It holds no
//! mutable state: each call ages fresh copies of the population.

use super::baseline::baseline_year;
use super::{aggregate_by_band, aggregate_by_sector, BandImpact, BaselineYear, SectorImpact};
use crate::assumptions::EngineConfig;
use crate::firms::FirmTable;
use crate::policy::{PolicyRequest, ResolvedPolicy};
use crate::projection::{yearly_impact, BehaviouralResponse, NoResponse, YearOutcome, YearlyResult};
use crate::{DataError, EngineError, Pounds};
use log::info;
use rayon::prelude::*;
use std::time::Instant;

/// Consolidated result of one reform analysis
#[derive(Debug, Clone)]
pub struct ReformAnalysis {
    /// Σ yearly revenue deltas over the horizon
    pub total_impact: Pounds,
    pub yearly: Vec<YearlyResult>,
    pub bands: Vec<BandImpact>,
    pub sectors: Vec<SectorImpact>,
    /// The policy as applied, including derived taper bounds
    pub policy: ResolvedPolicy,
    /// Each year's unreformed threshold, in horizon order
    pub baseline_thresholds: Vec<(String, Pounds)>,
    /// Name of the behavioural response strategy in effect
    pub response: &'static str,
}

/// Shared, read-only reform simulation service
#[derive(Debug)]
pub struct ReformAnalyzer {
    firms: FirmTable,
    config: EngineConfig,
    response: Box<dyn BehaviouralResponse>,
}

impl ReformAnalyzer {
    pub fn new(firms: FirmTable, config: EngineConfig) -> Result<Self, DataError> {
        config.validate()?;
        Ok(Self {
            firms,
            config,
            response: Box::new(NoResponse),
        })
    }

    /// Replace the default no-response strategy
    pub fn with_response(mut self, response: Box<dyn BehaviouralResponse>) -> Self {
        self.response = response;
        self
    }

    pub fn firms(&self) -> &FirmTable {
        &self.firms
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate a request and run the full horizon
    pub fn analyze(&self, request: &PolicyRequest) -> Result<ReformAnalysis, EngineError> {
        let policy = request.validate()?;
        self.analyze_resolved(policy)
    }

    /// Run the full horizon for an already validated policy
    pub fn analyze_resolved(&self, policy: ResolvedPolicy) -> Result<ReformAnalysis, EngineError> {
        let start = Instant::now();
        info!(
            "Starting reform analysis: threshold={} taper={:?} response={}",
            policy.threshold,
            policy.taper_kind,
            self.response.name()
        );

        // Years are independent; indexed collect keeps horizon order
        let outcomes: Vec<YearOutcome> = (0..self.config.fiscal_years.len())
            .into_par_iter()
            .map(|i| yearly_impact(&self.firms, &self.config, self.response.as_ref(), i, &policy))
            .collect::<Result<_, _>>()?;
        info!("Yearly impacts computed in {:?}", start.elapsed());

        let (yearly, observations): (Vec<_>, Vec<_>) =
            outcomes.into_iter().map(|o| (o.result, o.observation)).unzip();

        let agg_start = Instant::now();
        let bands = aggregate_by_band(&observations);
        let sectors = aggregate_by_sector(self.firms.sectors(), &observations);
        info!("Band and sector aggregation completed in {:?}", agg_start.elapsed());

        let total_impact: Pounds = yearly.iter().map(|y| y.revenue_delta).sum();

        let analysis = ReformAnalysis {
            total_impact,
            yearly,
            bands,
            sectors,
            policy,
            baseline_thresholds: self
                .config
                .fiscal_years
                .iter()
                .map(|y| (y.label.clone(), y.baseline_threshold))
                .collect(),
            response: self.response.name(),
        };
        check_finite(&analysis)?;

        info!(
            "Total reform analysis time: {:?} (impact {})",
            start.elapsed(),
            analysis.total_impact
        );
        Ok(analysis)
    }

    /// Revenue and registrations per year with no reform applied
    pub fn baseline_statistics(&self) -> Result<Vec<BaselineYear>, EngineError> {
        let stats: Vec<BaselineYear> = (0..self.config.fiscal_years.len())
            .into_par_iter()
            .map(|i| baseline_year(&self.firms, &self.config, i))
            .collect::<Result<_, _>>()?;

        if stats
            .iter()
            .any(|s| !s.total_revenue.is_finite() || !s.registered_firms.is_finite())
        {
            return Err(EngineError::Internal("non-finite baseline statistic".to_string()));
        }
        Ok(stats)
    }
}

fn check_finite(analysis: &ReformAnalysis) -> Result<(), EngineError> {
    if !analysis.total_impact.is_finite() {
        return Err(EngineError::Internal("non-finite total impact".to_string()));
    }
    for year in &analysis.yearly {
        if !(year.baseline_revenue.is_finite() && year.reform_revenue.is_finite() && year.firms_affected.is_finite()) {
            return Err(EngineError::Internal(format!("non-finite result for {}", year.label)));
        }
    }
    if let Some(band) = analysis.bands.iter().find(|b| !b.impact.is_finite()) {
        return Err(EngineError::Internal(format!("non-finite result for band {}", band.band.label)));
    }
    if let Some(sector) = analysis.sectors.iter().find(|s| !s.impact.is_finite()) {
        return Err(EngineError::Internal(format!("non-finite result for {}", sector.description)));
    }
    Ok(())
}
