//! Yearly impact calculator

use super::{age_population, AgedPopulation, BehaviouralResponse, ResponseContext};
use crate::assumptions::EngineConfig;
use crate::firms::FirmTable;
use crate::policy::{population_liabilities, ResolvedPolicy};
use crate::{EngineError, Pounds};
use log::debug;
use std::time::Instant;

/// Baseline vs reform summary for one fiscal year.
///
/// `firms_affected` is the net change in registered weight, not gross churn:
/// equal numbers registering and deregistering net to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyResult {
    pub year_index: usize,
    pub label: String,
    pub baseline_threshold: Pounds,
    pub baseline_revenue: Pounds,
    pub reform_revenue: Pounds,
    pub revenue_delta: Pounds,
    /// Weighted count of firms with positive baseline liability
    pub baseline_registered: f64,
    /// Weighted count of firms with positive reform liability
    pub reform_registered: f64,
    pub firms_affected: f64,
    pub newly_registered: f64,
    pub newly_deregistered: f64,
}

/// Per-firm liabilities for one year, kept for the cross-sectional
/// aggregators
#[derive(Debug, Clone)]
pub struct YearObservation {
    /// Aged population before any behavioural response
    pub population: AgedPopulation,
    pub baseline: Vec<Pounds>,
    pub reform: Vec<Pounds>,
}

#[derive(Debug, Clone)]
pub struct YearOutcome {
    pub result: YearlyResult,
    pub observation: YearObservation,
}

/// Compute baseline and reform liabilities for one year.
///
/// The population is aged once. The baseline is always a hard step at the
/// year's own threshold and standard rate; only the reform scenario sees
/// the proposed policy and the behavioural response. A response that does
/// not return one turnover per firm is an internal error.
pub fn yearly_impact(
    table: &FirmTable,
    config: &EngineConfig,
    response: &dyn BehaviouralResponse,
    year_index: usize,
    policy: &ResolvedPolicy,
) -> Result<YearOutcome, EngineError> {
    let start = Instant::now();
    let population = age_population(table, config, year_index)?;
    let year = &config.fiscal_years[year_index];

    let baseline_policy = ResolvedPolicy::baseline(year.baseline_threshold);
    let baseline = population_liabilities(&population, &baseline_policy, config.standard_rate);

    let ctx = ResponseContext {
        year_index,
        baseline_threshold: year.baseline_threshold,
        reform_threshold: policy.threshold,
    };
    let adjusted = response.adjusted_turnover(&ctx, &population);
    if adjusted.len() != population.len() {
        return Err(EngineError::Internal(format!(
            "{} response returned {} turnovers for {} firms",
            response.name(),
            adjusted.len(),
            population.len()
        )));
    }
    let reform_population = population.with_turnover(adjusted);
    let reform = population_liabilities(&reform_population, policy, config.standard_rate);

    let baseline_revenue = weighted_revenue(&baseline, &population.weight);
    let reform_revenue = weighted_revenue(&reform, &population.weight);
    let baseline_registered = registered_weight(&baseline, &population.weight);
    let reform_registered = registered_weight(&reform, &population.weight);

    let result = YearlyResult {
        year_index,
        label: year.label.clone(),
        baseline_threshold: year.baseline_threshold,
        baseline_revenue,
        reform_revenue,
        revenue_delta: reform_revenue - baseline_revenue,
        baseline_registered,
        reform_registered,
        firms_affected: (reform_registered - baseline_registered).abs(),
        newly_registered: (reform_registered - baseline_registered).max(0.0),
        newly_deregistered: (baseline_registered - reform_registered).max(0.0),
    };

    debug!(
        "Year {}: baseline {} reform {} in {:?}",
        result.label,
        result.baseline_revenue,
        result.reform_revenue,
        start.elapsed()
    );

    Ok(YearOutcome {
        result,
        observation: YearObservation {
            population,
            baseline,
            reform,
        },
    })
}

/// Σ liability × weight
pub fn weighted_revenue(liabilities: &[Pounds], weights: &[f64]) -> Pounds {
    liabilities.iter().zip(weights).map(|(&l, &w)| l * w).sum()
}

/// Σ weight over rows with positive liability
pub fn registered_weight(liabilities: &[Pounds], weights: &[f64]) -> f64 {
    liabilities
        .iter()
        .zip(weights)
        .filter(|(l, _)| l.value() > 0.0)
        .map(|(_, &w)| w)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::FiscalYearProfile;
    use crate::firms::FirmRecord;
    use crate::policy::PolicyRequest;
    use crate::projection::NoResponse;
    use crate::DataError;
    use approx::assert_relative_eq;

    fn flat_config() -> EngineConfig {
        EngineConfig {
            turnover_growth: 0.0,
            fiscal_years: vec![FiscalYearProfile::new("2025-26", 90_000.0, 1.0)],
            ..EngineConfig::default()
        }
    }

    fn table() -> FirmTable {
        FirmTable::new(vec![
            FirmRecord::new(Pounds(100_000.0), "47", 1.0, Pounds(10_000.0)),
            FirmRecord::new(Pounds(95_000.0), "56", 2.0, Pounds(8_000.0)),
            FirmRecord::new(Pounds(60_000.0), "96", 3.0, Pounds(4_000.0)),
        ])
    }

    #[test]
    fn test_raising_threshold_deregisters() {
        let policy = PolicyRequest::threshold_only(97_000).validate().unwrap();
        let outcome = yearly_impact(&table(), &flat_config(), &NoResponse, 0, &policy).unwrap();
        let r = outcome.result;

        assert_eq!(r.baseline_revenue, Pounds(26_000.0));
        assert_eq!(r.reform_revenue, Pounds(10_000.0));
        assert_eq!(r.revenue_delta, Pounds(-16_000.0));
        assert_eq!(r.baseline_registered, 3.0);
        assert_eq!(r.reform_registered, 1.0);
        assert_eq!(r.firms_affected, 2.0);
        assert_eq!(r.newly_registered, 0.0);
        assert_eq!(r.newly_deregistered, 2.0);
    }

    #[test]
    fn test_lowering_threshold_registers() {
        let policy = PolicyRequest::threshold_only(50_000).validate().unwrap();
        let r = yearly_impact(&table(), &flat_config(), &NoResponse, 0, &policy).unwrap().result;
        assert_eq!(r.reform_revenue, Pounds(38_000.0));
        assert_eq!(r.newly_registered, 3.0);
        assert_eq!(r.newly_deregistered, 0.0);
    }

    #[test]
    fn test_firms_affected_is_net_not_gross() {
        // Retail firm drops out via a zero rate while a café below the old
        // threshold is pulled in: two firms change status, net change is zero
        let table = FirmTable::new(vec![
            FirmRecord::new(Pounds(91_000.0), "47", 1.0, Pounds(1_000.0)),
            FirmRecord::new(Pounds(60_000.0), "56", 1.0, Pounds(1_000.0)),
        ]);
        let mut request = PolicyRequest::threshold_only(50_000);
        request.sector_rates.insert(47, 0.0);
        let policy = request.validate().unwrap();

        let r = yearly_impact(&table, &flat_config(), &NoResponse, 0, &policy).unwrap().result;
        assert_eq!(r.baseline_registered, 1.0);
        assert_eq!(r.reform_registered, 1.0);
        assert_eq!(r.firms_affected, 0.0);
        assert_eq!(r.newly_registered, 0.0);
        assert_eq!(r.newly_deregistered, 0.0);
    }

    #[test]
    fn test_baseline_independent_of_reform() {
        let config = EngineConfig::default();
        let low = PolicyRequest::threshold_only(10_000).validate().unwrap();
        let high = PolicyRequest {
            taper_type: crate::policy::TaperKind::Aggressive,
            ..PolicyRequest::threshold_only(400_000)
        }
        .validate()
        .unwrap();

        for year in 0..config.fiscal_years.len() {
            let a = yearly_impact(&table(), &config, &NoResponse, year, &low).unwrap();
            let b = yearly_impact(&table(), &config, &NoResponse, year, &high).unwrap();
            assert_eq!(a.result.baseline_revenue, b.result.baseline_revenue);
            assert_eq!(a.observation.baseline, b.observation.baseline);
        }
    }

    #[test]
    fn test_weights_scale_revenue() {
        let config = EngineConfig::default();
        let policy = PolicyRequest::threshold_only(90_000).validate().unwrap();
        let r = yearly_impact(&table(), &config, &NoResponse, 1, &policy).unwrap().result;
        // Year 1 turnover grows 2.5%, weights by 1.0779
        assert_relative_eq!(r.baseline_revenue.value(), 26_000.0 * 1.0779, epsilon = 1e-6);
        assert_relative_eq!(r.revenue_delta.value(), 0.0);
    }

    #[test]
    fn test_year_out_of_range_is_data_error() {
        let policy = PolicyRequest::threshold_only(90_000).validate().unwrap();
        let err = yearly_impact(&table(), &flat_config(), &NoResponse, 1, &policy).unwrap_err();
        assert!(matches!(err, EngineError::Data(DataError::YearOutOfRange { .. })));
    }

    /// Drops the last firm from its output
    #[derive(Debug)]
    struct TruncatingResponse;

    impl BehaviouralResponse for TruncatingResponse {
        fn name(&self) -> &'static str {
            "truncating"
        }

        fn adjusted_turnover(&self, _ctx: &ResponseContext, population: &AgedPopulation) -> Vec<Pounds> {
            let mut turnover = population.turnover.clone();
            turnover.pop();
            turnover
        }
    }

    #[test]
    fn test_short_response_is_internal_error() {
        let policy = PolicyRequest::threshold_only(90_000).validate().unwrap();
        let err = yearly_impact(&table(), &flat_config(), &TruncatingResponse, 0, &policy).unwrap_err();
        assert_eq!(err.kind(), "internal_error");
        assert!(err.to_string().contains("2 turnovers for 3 firms"));
    }
}
