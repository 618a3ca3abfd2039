//! Mutual fund comparison CLI
//!
//! Usage:
//!   fund_compare compare --scheme 120465 --scheme 118989
//!   fund_compare compare --config metrics.json --file axis_bluechip.json
//!   fund_compare search bluechip --limit 10
//!   fund_compare --quotes-config quotes.json compare --scheme 120465 --sip-interval quarterly
//!
//! NAV files use the mfapi.in response format. Logs go to stderr (RUST_LOG),
//! the report is printed as JSON on stdout.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use fund_compare::comparison::{compare_funds_concurrent, FundInput};
use fund_compare::config::MetricsConfig;
use fund_compare::investment_plans::PlanInterval;
use fund_compare::quotes::{amfi, mfapi, QuoteSourceConfig};
use std::path::{Path, PathBuf};

/// Funds the comparison view is designed for
const RECOMMENDED_MAX_FUNDS: usize = 5;

#[derive(Parser)]
#[command(version, about = "Compare mutual funds by CAGR, rolling CAGR and SIP XIRR")]
struct Cli {
    /// Quote source endpoints and timeout (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    quotes_config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Evaluate funds and print the comparison report
    Compare {
        /// Metrics configuration (JSON, partial overrides allowed)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// NAV history in mfapi.in JSON format
        #[arg(long = "file", value_name = "PATH")]
        files: Vec<PathBuf>,
        /// AMFI scheme code to fetch from mfapi.in
        #[arg(long = "scheme", value_name = "CODE")]
        schemes: Vec<String>,
        /// Override the SIP interval (weekly, monthly, quarterly, yearly)
        #[arg(long, value_name = "INTERVAL")]
        sip_interval: Option<PlanInterval>,
    },
    /// Search the AMFI scheme list by name or code
    Search {
        query: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn load_config(path: Option<&Path>) -> Result<MetricsConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            MetricsConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(MetricsConfig::default()),
    }
}

fn load_quotes_config(path: Option<&Path>) -> Result<QuoteSourceConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read quotes config {}", path.display()))?;
            QuoteSourceConfig::from_json(&json)
                .with_context(|| format!("Invalid quotes config {}", path.display()))
        }
        None => Ok(QuoteSourceConfig::default()),
    }
}

fn load_file(path: &Path) -> Result<FundInput> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let history = mfapi::parse_nav_history(&body)
        .with_context(|| format!("Invalid NAV history in {}", path.display()))?;

    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(history.into_fund_input(&fallback))
}

async fn fetch_schemes(quotes: &QuoteSourceConfig, codes: &[String]) -> Vec<FundInput> {
    let handles: Vec<_> = codes
        .iter()
        .map(|code| {
            let quotes = quotes.clone();
            let code = code.clone();
            tokio::spawn(async move {
                let result = mfapi::fetch_nav_history(&quotes, &code).await;
                (code, result)
            })
        })
        .collect();

    let mut inputs = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok((code, Ok(history))) => inputs.push(history.into_fund_input(&code)),
            Ok((code, Err(e))) => log::error!("Failed to fetch scheme {}: {:#}", code, e),
            Err(e) => log::error!("Fetch task failed: {}", e),
        }
    }
    inputs
}

async fn run_compare(
    quotes: &QuoteSourceConfig,
    config: Option<PathBuf>,
    files: Vec<PathBuf>,
    schemes: Vec<String>,
    sip_interval: Option<PlanInterval>,
) -> Result<()> {
    if files.is_empty() && schemes.is_empty() {
        return Err(anyhow!("Nothing to compare: pass --file and/or --scheme"));
    }

    let mut config = load_config(config.as_deref())?;
    if let Some(interval) = sip_interval {
        config.sip_interval = interval;
    }

    let mut inputs = Vec::new();
    for path in &files {
        inputs.push(load_file(path)?);
    }
    inputs.extend(fetch_schemes(quotes, &schemes).await);

    if inputs.len() > RECOMMENDED_MAX_FUNDS {
        log::warn!(
            "Comparing {} funds; the report is meant for up to {}",
            inputs.len(),
            RECOMMENDED_MAX_FUNDS
        );
    }

    let report = compare_funds_concurrent(inputs, config).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

async fn run_search(quotes: &QuoteSourceConfig, query: &str, limit: usize) -> Result<()> {
    let schemes = amfi::fetch_scheme_list(quotes).await?;
    let hits = amfi::search(&schemes, query, limit);

    if hits.is_empty() {
        log::info!("No scheme matches '{}'", query);
    }
    for scheme in hits {
        println!("{}  {}", scheme.code, scheme.name);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let quotes = load_quotes_config(cli.quotes_config.as_deref())?;

    match cli.cmd {
        Cmd::Compare {
            config,
            files,
            schemes,
            sip_interval,
        } => run_compare(&quotes, config, files, schemes, sip_interval).await,
        Cmd::Search { query, limit } => run_search(&quotes, &query, limit).await,
    }
}
