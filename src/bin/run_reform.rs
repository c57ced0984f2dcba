//! Run a threshold reform analysis over a firm population CSV
//!
//! Writes the analysis as JSON to stdout and optionally the band and
//! yearly breakdowns as CSV files.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use vat_threshold_sim::{
    api::{AnalysisResponse, BaselineYearDto},
    assumptions::{load_elasticities, ElasticityTable},
    firms::load_firms,
    projection::ThresholdBunching,
    EngineConfig, PolicyRequest, ReformAnalyzer, TaperKind,
};

#[derive(Parser)]
#[command(name = "run_reform", about = "VAT registration threshold reform simulator")]
struct Cli {
    /// Firm population CSV
    #[arg(long, global = true, default_value = "firms.csv")]
    firms: PathBuf,

    /// Engine configuration JSON (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a reform against the baseline over the full horizon
    Analyze {
        /// Proposed registration threshold (£)
        #[arg(long)]
        threshold: i64,

        #[arg(long, value_enum, default_value_t = CliTaper::None)]
        taper: CliTaper,

        /// Custom taper start (£)
        #[arg(long)]
        taper_start: Option<i64>,

        /// Custom taper end (£)
        #[arg(long)]
        taper_end: Option<i64>,

        /// Reduced rate for a SIC division, as DIVISION=RATE (repeatable)
        #[arg(long = "sector-rate", value_parser = parse_sector_rate)]
        sector_rates: Vec<(u8, f64)>,

        /// Sector elasticity CSV; enables the threshold bunching response
        #[arg(long)]
        elasticities: Option<PathBuf>,

        /// Seed for the behavioural response
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Enable threshold bunching with default elasticities
        #[arg(long, default_value_t = false)]
        bunching: bool,

        /// Write the turnover band breakdown to this CSV
        #[arg(long)]
        bands_csv: Option<PathBuf>,

        /// Write the yearly breakdown to this CSV
        #[arg(long)]
        yearly_csv: Option<PathBuf>,
    },

    /// Report baseline revenue and registrations per fiscal year
    Baseline,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTaper {
    None,
    Moderate,
    Aggressive,
    Custom,
}

impl From<CliTaper> for TaperKind {
    fn from(value: CliTaper) -> Self {
        match value {
            CliTaper::None => TaperKind::None,
            CliTaper::Moderate => TaperKind::Moderate,
            CliTaper::Aggressive => TaperKind::Aggressive,
            CliTaper::Custom => TaperKind::Custom,
        }
    }
}

fn parse_sector_rate(raw: &str) -> Result<(u8, f64), String> {
    let (division, rate) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DIVISION=RATE, got '{raw}'"))?;
    let division = division
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("invalid division '{division}': {e}"))?;
    let rate = rate
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid rate '{rate}': {e}"))?;
    Ok((division, rate))
}

#[derive(Serialize)]
struct Report<T: Serialize> {
    generated_at: String,
    firms_file: String,
    firm_records: usize,
    #[serde(flatten)]
    body: T,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    eprintln!("Loading firms from {}...", cli.firms.display());
    let firms = load_firms(&cli.firms).with_context(|| format!("loading {}", cli.firms.display()))?;
    eprintln!("Loaded {} firm records in {:?}", firms.len(), start.elapsed());

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let firm_records = firms.len();
    let analyzer = ReformAnalyzer::new(firms, config)?;

    match cli.command {
        Commands::Analyze {
            threshold,
            taper,
            taper_start,
            taper_end,
            sector_rates,
            elasticities,
            seed,
            bunching,
            bands_csv,
            yearly_csv,
        } => {
            let analyzer = match (elasticities, bunching) {
                (Some(path), _) => {
                    let table = load_elasticities(&path).with_context(|| format!("loading {}", path.display()))?;
                    eprintln!("Loaded {} sector elasticities", table.len());
                    analyzer.with_response(Box::new(ThresholdBunching::new(seed, table)))
                }
                (None, true) => analyzer.with_response(Box::new(ThresholdBunching::new(seed, ElasticityTable::default()))),
                (None, false) => analyzer,
            };

            let request = PolicyRequest {
                registration_threshold: threshold,
                taper_type: taper.into(),
                taper_start,
                taper_end,
                taper_rate: None,
                sector_rates: sector_rates.into_iter().collect::<BTreeMap<_, _>>(),
            };

            eprintln!("Running analysis...");
            let run_start = Instant::now();
            let analysis = match analyzer.analyze(&request) {
                Ok(analysis) => analysis,
                Err(e) if e.kind() == "validation_error" => bail!("invalid reform: {e}"),
                Err(e) => return Err(e.into()),
            };
            eprintln!("Analysis complete in {:?}", run_start.elapsed());

            let response = AnalysisResponse::from(&analysis);
            if let Some(path) = bands_csv {
                write_csv(&path, &response.revenue_band_impacts)?;
            }
            if let Some(path) = yearly_csv {
                write_csv(&path, &response.yearly_impacts)?;
            }
            print_report(&cli.firms, firm_records, response)?;

            eprintln!(
                "Total impact over {} years: £{:.1}m",
                analysis.yearly.len(),
                analysis.total_impact.to_millions()
            );
        }
        Commands::Baseline => {
            let stats = analyzer.baseline_statistics()?;
            let rows: Vec<BaselineYearDto> = stats.iter().map(BaselineYearDto::from).collect();
            for row in &rows {
                eprintln!(
                    "  {}: threshold £{}, revenue £{:.2}bn, registered {}",
                    row.year, row.threshold, row.total_revenue_billions, row.registered_firms
                );
            }
            print_report(&cli.firms, firm_records, serde_json::json!({ "baseline_statistics": rows }))?;
        }
    }

    eprintln!("Total time: {:?}", start.elapsed());
    Ok(())
}

fn print_report<T: Serialize>(firms_file: &Path, firm_records: usize, body: T) -> Result<()> {
    let report = Report {
        generated_at: Utc::now().to_rfc3339(),
        firms_file: firms_file.display().to_string(),
        firm_records,
        body,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Flat rows only; CSV cannot hold nested fields
fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    eprintln!("Output written to {}", path.display());
    Ok(())
}
