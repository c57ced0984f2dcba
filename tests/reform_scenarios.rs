//! End-to-end reform scenarios: CSV text through the loader, the analyzer
//! and the HTTP routing layer

use approx::assert_relative_eq;
use vat_threshold_sim::{
    api,
    assumptions::load_elasticities_from_reader,
    firms::load_firms_from_reader,
    projection::ThresholdBunching,
    DataError, EngineConfig, EngineError, FiscalYearProfile, PolicyError, PolicyRequest, Pounds, ReformAnalyzer,
    Sector, TaperKind,
};

const FIRMS_CSV: &str = "\
annual_turnover_k,sic_code,weight,vat_liability_k,region
45,56101,120.5,3.1,London
72,56101,80,5.0,Wales
86.5,47110,60,6.2,Scotland
89,47110,55,6.5,London
91,96020,40,7.0,North East
98,96020,35,7.4,London
110,4120,20,9.1,South West
140,62012,15,11.0,London
260,62012,8,21.0,London
750,01110,3,60.0,East
2400,64191,1,190.0,London
0,47110,10,0.0,London
120,,5,9.0,London
";

fn analyzer() -> ReformAnalyzer {
    let firms = load_firms_from_reader(FIRMS_CSV.as_bytes(), "firms.csv").expect("fixture loads");
    ReformAnalyzer::new(firms, EngineConfig::default()).expect("default config is valid")
}

fn flat_single_year() -> EngineConfig {
    EngineConfig {
        turnover_growth: 0.0,
        fiscal_years: vec![FiscalYearProfile::new("2025-26", 90_000.0, 1.0)],
        ..EngineConfig::default()
    }
}

#[test]
fn fixture_sectors_are_derived_at_load() {
    let analyzer = analyzer();
    let sectors = analyzer.firms().sectors();
    assert_eq!(
        sectors,
        &[
            Sector::Division(1),
            Sector::Division(41),
            Sector::Division(47),
            Sector::Division(56),
            Sector::Division(62),
            Sector::Division(64),
            Sector::Division(96),
            Sector::Unclassified,
        ]
    );
}

#[test]
fn raising_threshold_loses_revenue_every_year() {
    let analysis = analyzer().analyze(&PolicyRequest::threshold_only(100_000)).unwrap();
    assert_eq!(analysis.yearly.len(), 6);
    for year in &analysis.yearly {
        assert!(year.revenue_delta.value() < 0.0, "{} should lose revenue", year.label);
        assert!(year.newly_deregistered > 0.0);
        assert_eq!(year.newly_registered, 0.0);
    }
}

#[test]
fn lowering_threshold_gains_revenue() {
    let analysis = analyzer().analyze(&PolicyRequest::threshold_only(40_000)).unwrap();
    assert!(analysis.total_impact.value() > 0.0);
    assert!(analysis.yearly.iter().all(|y| y.newly_registered > 0.0));
}

#[test]
fn taper_sits_between_step_policies() {
    let analyzer = analyzer();
    let step = analyzer.analyze(&PolicyRequest::threshold_only(90_000)).unwrap();
    let tapered = analyzer
        .analyze(&PolicyRequest { taper_type: TaperKind::Moderate, ..PolicyRequest::threshold_only(90_000) })
        .unwrap();
    assert_eq!(tapered.policy.schedule.bounds(), Some((Pounds(65_000.0), Pounds(110_000.0))));

    // A £65k-£110k taper owes at least a step at its end and at most a step
    // at its start
    let at_end = analyzer.analyze(&PolicyRequest::threshold_only(110_000)).unwrap();
    let at_start = analyzer.analyze(&PolicyRequest::threshold_only(65_000)).unwrap();

    for (((s, t), lo), hi) in step.yearly.iter().zip(&tapered.yearly).zip(&at_end.yearly).zip(&at_start.yearly) {
        assert!(lo.reform_revenue.value() <= t.reform_revenue.value(), "{}", t.label);
        assert!(t.reform_revenue.value() <= hi.reform_revenue.value(), "{}", t.label);
        assert!(lo.reform_revenue.value() < hi.reform_revenue.value());
        assert_ne!(s.reform_revenue, t.reform_revenue);
        assert_eq!(s.baseline_revenue, t.baseline_revenue);
    }
}

#[test]
fn split_rate_only_changes_that_sector() {
    let analyzer = analyzer();
    let mut request = PolicyRequest::threshold_only(90_000);
    request.sector_rates.insert(56, 0.10);
    let analysis = analyzer.analyze(&request).unwrap();

    // Both cafés stay below £90k in every year, so the reduced rate has
    // nothing to apply to
    assert!(analysis.sectors.iter().all(|s| s.impact.revenue_delta() == Pounds(0.0)));

    request.sector_rates.insert(96, 0.10);
    let analysis = analyzer.analyze(&request).unwrap();
    let personal = analysis
        .sectors
        .iter()
        .find(|s| s.sector == Sector::Division(96))
        .unwrap();
    // Registered firms in 96 pay half
    assert!(personal.impact.reform_revenue.value() < personal.impact.baseline_revenue.value());
    let others: f64 = analysis
        .sectors
        .iter()
        .filter(|s| s.sector != Sector::Division(96))
        .map(|s| s.impact.revenue_delta().value())
        .sum();
    assert_eq!(others, 0.0);
}

#[test]
fn single_firm_concrete_scenarios() {
    let csv = "annual_turnover_k,sic_code,weight,vat_liability_k\n100,47,1,10\n";
    let firms = load_firms_from_reader(csv.as_bytes(), "one.csv").unwrap();
    let analyzer = ReformAnalyzer::new(firms, flat_single_year()).unwrap();

    let unchanged = analyzer.analyze(&PolicyRequest::threshold_only(90_000)).unwrap();
    assert_eq!(unchanged.yearly[0].reform_revenue, Pounds(10_000.0));

    let above = analyzer.analyze(&PolicyRequest::threshold_only(110_000)).unwrap();
    assert_eq!(above.yearly[0].reform_revenue, Pounds(0.0));

    // Half-way through a £90k-£110k taper
    let mid = analyzer.analyze(&PolicyRequest::custom_taper(100_000, 90_000, 110_000)).unwrap();
    assert_relative_eq!(mid.yearly[0].reform_revenue.value(), 5_000.0);

    let err = analyzer
        .analyze(&PolicyRequest::custom_taper(90_000, 100_000, 90_000))
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(PolicyError::InvertedTaper { .. })));
}

#[test]
fn missing_column_is_rejected() {
    let csv = "annual_turnover_k,sic_code,vat_liability_k\n100,47,10\n";
    let err = load_firms_from_reader(csv.as_bytes(), "bad.csv").unwrap_err();
    assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == "weight"));
}

#[test]
fn bunching_response_is_seeded_and_reform_only() {
    let elasticities = load_elasticities_from_reader(
        "sic_2digit,elasticity\n47,1.5\n56,0.8\n96,1.2\n".as_bytes(),
        "elasticities.csv",
    )
    .unwrap();

    let plain = analyzer();
    let bunching = analyzer().with_response(Box::new(ThresholdBunching::new(2024, elasticities.clone())));
    let again = analyzer().with_response(Box::new(ThresholdBunching::new(2024, elasticities)));

    let request = PolicyRequest::threshold_only(120_000);
    let a = plain.analyze(&request).unwrap();
    let b = bunching.analyze(&request).unwrap();
    let c = again.analyze(&request).unwrap();

    assert_eq!(b.yearly, c.yearly);
    for (ya, yb) in a.yearly.iter().zip(&b.yearly) {
        assert_eq!(ya.baseline_revenue, yb.baseline_revenue);
    }
    // Bands use pre-response turnover, so their baselines match too
    for (ba, bb) in a.bands.iter().zip(&b.bands) {
        assert_eq!(ba.impact.baseline_revenue, bb.impact.baseline_revenue);
    }
}

#[test]
fn http_layer_round_trip() {
    let analyzer = analyzer();

    let health = api::handle(&analyzer, "GET", "/health", b"");
    assert_eq!(health.status, 200);
    assert_eq!(health.body["status"], "healthy");

    let body = br#"{"registration_threshold": 100000, "taper_type": "aggressive", "taper_rate": 0.5}"#;
    let resp = api::handle(&analyzer, "POST", "/analyze", body);
    assert_eq!(resp.status, 200);
    let summary = &resp.body["reform_summary"];
    assert_eq!(summary["taper_type"], "aggressive");
    assert_eq!(summary["taper_start"], 65_000);
    assert_eq!(summary["taper_end"], 110_000);
    assert_eq!(summary["taper_rate"], 0.5);

    let bad = api::handle(&analyzer, "POST", "/analyze", br#"{"registration_threshold": -5}"#);
    assert_eq!(bad.status, 400);
    assert_eq!(bad.body["error"], "validation_error");

    let baseline = api::handle(&analyzer, "GET", "/baseline", b"");
    assert_eq!(baseline.status, 200);
    assert_eq!(baseline.body["baseline_statistics"].as_array().map(Vec::len), Some(6));
}

#[test]
fn empty_horizon_is_rejected() {
    let firms = load_firms_from_reader(FIRMS_CSV.as_bytes(), "firms.csv").unwrap();
    let config = EngineConfig { fiscal_years: Vec::new(), ..EngineConfig::default() };
    assert!(ReformAnalyzer::new(firms, config).is_err());
}
