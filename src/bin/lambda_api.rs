//! AWS Lambda HTTP front end for the reform analyzer
//!
//! The firm table is loaded once per cold start and shared by every
//! invocation. Environment:
//! - `VAT_FIRMS_PATH`: firm population CSV (default `firms.csv`)
//! - `VAT_CONFIG_PATH`: optional engine configuration JSON

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::info;
use std::sync::Arc;
use std::time::Instant;
use vat_threshold_sim::{api, firms::load_firms, EngineConfig, ReformAnalyzer};

fn build_analyzer() -> anyhow::Result<ReformAnalyzer> {
    let start = Instant::now();
    let firms_path = std::env::var("VAT_FIRMS_PATH").unwrap_or_else(|_| "firms.csv".to_string());
    let firms = load_firms(&firms_path)?;

    let config = match std::env::var("VAT_CONFIG_PATH").ok().filter(|s| !s.is_empty()) {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    };

    let analyzer = ReformAnalyzer::new(firms, config)?;
    info!(
        "Analyzer ready with {} firms from {} in {:?}",
        analyzer.firms().len(),
        firms_path,
        start.elapsed()
    );
    Ok(analyzer)
}

async fn handler(analyzer: &ReformAnalyzer, event: Request) -> Result<Response<Body>, Error> {
    let resp = api::handle(
        analyzer,
        event.method().as_str(),
        event.uri().path(),
        event.body().as_ref(),
    );

    let response = Response::builder()
        .status(resp.status)
        .header("content-type", "application/json")
        .header("cache-control", "no-store")
        .body(Body::from(resp.body.to_string()))?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let analyzer = Arc::new(build_analyzer().map_err(|e| Error::from(e.to_string()))?);

    run(service_fn(move |event: Request| {
        let analyzer = Arc::clone(&analyzer);
        async move { handler(&analyzer, event).await }
    }))
    .await
}
