//! HTTP-facing request routing and response shapes
//!
//! Everything here is transport-agnostic: `handle` takes a method, a path
//! and a raw body and returns a status code with a JSON body. The Lambda
//! binary adapts it to `lambda_http`; tests call it directly.
//!
//! Monetary values leave the engine as `Pounds` and are scaled here only:
//! revenues in £bn, impacts in £m. Firm counts are truncated to integers.

use crate::analysis::{BandImpact, BaselineYear, SectorImpact};
use crate::projection::YearlyResult;
use crate::{EngineError, PolicyRequest, Pounds, ReformAnalysis, ReformAnalyzer, TaperKind};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Instant;

/// Upper bound reported for the open-ended top band
pub const OPEN_BAND_MAX: f64 = 999_999_999.0;

/// Status code and JSON body produced for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(500, "internal_error", &format!("failed to serialize response: {e}")),
        }
    }

    fn error(status: u16, kind: &str, detail: &str) -> Self {
        Self {
            status,
            body: json!({ "error": kind, "detail": detail }),
        }
    }

    fn from_engine_error(err: &EngineError) -> Self {
        match err {
            EngineError::Validation(e) => {
                warn!("Validation error: {}", e);
                Self::error(400, err.kind(), &e.to_string())
            }
            EngineError::Data(_) | EngineError::Internal(_) => {
                error!("Error analyzing reform: {}", err);
                Self::error(500, err.kind(), &err.to_string())
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct YearlyImpactDto {
    pub year: String,
    /// £bn
    pub baseline_revenue: f64,
    /// £bn
    pub reform_revenue: f64,
    /// £m
    pub revenue_impact: f64,
    pub firms_affected: i64,
    pub newly_registered: i64,
    pub newly_deregistered: i64,
}

impl From<&YearlyResult> for YearlyImpactDto {
    fn from(y: &YearlyResult) -> Self {
        Self {
            year: y.label.clone(),
            baseline_revenue: y.baseline_revenue.to_billions(),
            reform_revenue: y.reform_revenue.to_billions(),
            revenue_impact: y.revenue_delta.to_millions(),
            firms_affected: y.firms_affected as i64,
            newly_registered: y.newly_registered as i64,
            newly_deregistered: y.newly_deregistered as i64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RevenueBandDto {
    pub band: String,
    pub min_revenue: f64,
    pub max_revenue: f64,
    /// £bn
    pub baseline_vat: f64,
    /// £bn
    pub reform_vat: f64,
    /// £m
    pub revenue_impact: f64,
    pub firms_affected: i64,
}

impl From<&BandImpact> for RevenueBandDto {
    fn from(b: &BandImpact) -> Self {
        Self {
            band: b.band.label.clone(),
            min_revenue: b.band.lower.value(),
            max_revenue: b.band.upper.map_or(OPEN_BAND_MAX, Pounds::value),
            baseline_vat: b.impact.baseline_revenue.to_billions(),
            reform_vat: b.impact.reform_revenue.to_billions(),
            revenue_impact: b.impact.revenue_delta().to_millions(),
            firms_affected: b.impact.firms_affected as i64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectorImpactDto {
    pub sector: String,
    /// `None` for unclassified firms
    pub division: Option<u8>,
    /// £bn
    pub baseline_revenue: f64,
    /// £bn
    pub reform_revenue: f64,
    /// £m
    pub revenue_impact: f64,
    pub firms_affected: i64,
}

impl From<&SectorImpact> for SectorImpactDto {
    fn from(s: &SectorImpact) -> Self {
        Self {
            sector: s.description.clone(),
            division: s.sector.division(),
            baseline_revenue: s.impact.baseline_revenue.to_billions(),
            reform_revenue: s.impact.reform_revenue.to_billions(),
            revenue_impact: s.impact.revenue_delta().to_millions(),
            firms_affected: s.impact.firms_affected as i64,
        }
    }
}

/// The policy as applied, with derived taper bounds filled in
#[derive(Debug, Serialize)]
pub struct ReformSummaryDto {
    pub registration_threshold: i64,
    pub taper_type: TaperKind,
    pub taper_start: Option<i64>,
    pub taper_end: Option<i64>,
    pub taper_rate: Option<f64>,
    pub sector_rates: BTreeMap<u8, f64>,
    pub baseline_thresholds: BTreeMap<String, i64>,
    pub behavioural_response: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    /// £m over the whole horizon
    pub total_impact: f64,
    pub yearly_impacts: Vec<YearlyImpactDto>,
    pub revenue_band_impacts: Vec<RevenueBandDto>,
    pub sector_impacts: Vec<SectorImpactDto>,
    pub reform_summary: ReformSummaryDto,
}

impl From<&ReformAnalysis> for AnalysisResponse {
    fn from(a: &ReformAnalysis) -> Self {
        let bounds = a.policy.schedule.bounds();
        Self {
            total_impact: a.total_impact.to_millions(),
            yearly_impacts: a.yearly.iter().map(YearlyImpactDto::from).collect(),
            revenue_band_impacts: a.bands.iter().map(RevenueBandDto::from).collect(),
            sector_impacts: a.sectors.iter().map(SectorImpactDto::from).collect(),
            reform_summary: ReformSummaryDto {
                registration_threshold: whole_pounds(a.policy.threshold),
                taper_type: a.policy.taper_kind,
                taper_start: bounds.map(|(start, _)| whole_pounds(start)),
                taper_end: bounds.map(|(_, end)| whole_pounds(end)),
                taper_rate: a.policy.taper_rate,
                sector_rates: a.policy.sector_rates.clone(),
                baseline_thresholds: a
                    .baseline_thresholds
                    .iter()
                    .map(|(label, t)| (label.clone(), whole_pounds(*t)))
                    .collect(),
                behavioural_response: a.response,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BaselineYearDto {
    pub year: String,
    pub threshold: i64,
    pub total_revenue_billions: f64,
    pub registered_firms: i64,
    pub growth_factor: f64,
}

impl From<&BaselineYear> for BaselineYearDto {
    fn from(b: &BaselineYear) -> Self {
        Self {
            year: b.label.clone(),
            threshold: whole_pounds(b.threshold),
            total_revenue_billions: b.total_revenue.to_billions(),
            registered_firms: b.registered_firms as i64,
            growth_factor: b.growth_factor,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BaselineResponse {
    pub baseline_statistics: Vec<BaselineYearDto>,
}

fn whole_pounds(p: Pounds) -> i64 {
    p.value().round() as i64
}

/// Route one request to the analyzer
pub fn handle(analyzer: &ReformAnalyzer, method: &str, path: &str, body: &[u8]) -> ApiResponse {
    let path = path.trim_end_matches('/');
    match (method, path) {
        ("GET", "") => ApiResponse::ok(&json!({
            "message": "VAT Policy Analysis API",
            "endpoints": {
                "/analyze": "POST - Analyze a VAT reform policy",
                "/baseline": "GET - Get baseline VAT statistics",
                "/health": "GET - Service health check",
            }
        })),
        ("GET", "/health") => ApiResponse::ok(&json!({ "status": "healthy" })),
        ("GET", "/baseline") => baseline(analyzer),
        ("POST", "/analyze") => analyze(analyzer, body),
        (_, "" | "/health" | "/baseline" | "/analyze") => {
            ApiResponse::error(405, "method_not_allowed", &format!("{method} not allowed on {path}"))
        }
        _ => ApiResponse::error(404, "not_found", &format!("no route for {path}")),
    }
}

fn analyze(analyzer: &ReformAnalyzer, body: &[u8]) -> ApiResponse {
    let request: PolicyRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected analysis request body: {}", e);
            return ApiResponse::error(400, "validation_error", &format!("invalid request body: {e}"));
        }
    };

    let start = Instant::now();
    info!("Analyzing reform: {:?}", request);
    match analyzer.analyze(&request) {
        Ok(analysis) => {
            info!("Analysis request served in {:?}", start.elapsed());
            ApiResponse::ok(&AnalysisResponse::from(&analysis))
        }
        Err(e) => ApiResponse::from_engine_error(&e),
    }
}

fn baseline(analyzer: &ReformAnalyzer) -> ApiResponse {
    match analyzer.baseline_statistics() {
        Ok(stats) => ApiResponse::ok(&BaselineResponse {
            baseline_statistics: stats.iter().map(BaselineYearDto::from).collect(),
        }),
        Err(e) => ApiResponse::from_engine_error(&e),
    }
}
