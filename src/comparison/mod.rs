//! Fund comparison
//!
//! Evaluates each fund independently (validation → CAGR → rolling CAGR →
//! SIP schedule → XIRR) and rolls the results up into category averages.
//! A fund that fails validation is reported as a failure; the rest of the
//! batch is still evaluated.

pub mod category;

pub use category::{average_by_category, category_averages, CategoryAverage};

use crate::config::MetricsConfig;
use crate::error::{MetricsError, Result};
use crate::investment_plans::{build_sip_schedule, SipPlan};
use crate::performance::{calculate_cagr, calculate_xirr, mean_rolling_cagr, rolling_cagr, RollingPoint};
use crate::series::{NavPoint, NavSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// NAV history of one fund as supplied by a collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundInput {
    pub name: String,
    #[serde(default)]
    pub scheme_code: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Assets under management, passed through untouched
    #[serde(default)]
    pub aum: Option<f64>,
    pub observations: Vec<NavPoint>,
}

/// Metrics for one fund
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundMetrics {
    pub name: String,
    pub scheme_code: Option<String>,
    pub category: Option<String>,
    pub aum: Option<f64>,
    /// Latest NAV
    pub last_value: f64,
    pub last_date: NaiveDate,
    pub observations: usize,
    /// Whole-period CAGR as percentage
    pub cagr_percent: f64,
    /// Mean rolling CAGR as percentage, `None` if the history is shorter than the window
    pub rolling_cagr_mean_percent: Option<f64>,
    /// SIP XIRR as percentage, `None` if unavailable
    pub sip_xirr_percent: Option<f64>,
    /// Whether the XIRR solver converged
    pub sip_xirr_converged: bool,
    pub sip_total_invested: Option<f64>,
    pub sip_final_value: Option<f64>,
    /// Rolling CAGR series for charting
    pub rolling_cagr: Vec<RollingPoint>,
}

/// A fund that could not be evaluated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundFailure {
    pub name: String,
    pub kind: String,
    pub error: String,
}

impl FundFailure {
    fn from_error(name: &str, error: &MetricsError) -> Self {
        Self {
            name: name.to_string(),
            kind: error.kind().to_string(),
            error: error.to_string(),
        }
    }
}

/// Comparison result for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub funds: Vec<FundMetrics>,
    pub failures: Vec<FundFailure>,
    pub category_averages: Vec<CategoryAverage>,
}

impl ComparisonReport {
    fn assemble(outcomes: Vec<(String, std::result::Result<FundMetrics, FundFailure>)>) -> Self {
        let mut funds = Vec::new();
        let mut failures = Vec::new();

        for (name, outcome) in outcomes {
            match outcome {
                Ok(metrics) => funds.push(metrics),
                Err(failure) => {
                    log::warn!("Skipping {}: {}", name, failure.error);
                    failures.push(failure);
                }
            }
        }

        let category_averages = category_averages(&funds);

        log::info!(
            "Comparison: {} funds evaluated, {} skipped, {} categories",
            funds.len(),
            failures.len(),
            category_averages.len()
        );

        Self {
            funds,
            failures,
            category_averages,
        }
    }
}

/// Compute all metrics for a single fund
pub fn evaluate_fund(input: &FundInput, config: &MetricsConfig) -> Result<FundMetrics> {
    config.validate()?;

    let series = NavSeries::from_unsorted(input.observations.clone(), config.min_observations)?;
    let last = series.last();

    let cagr_percent = calculate_cagr(&series)?;

    let rolling: Vec<RollingPoint> =
        rolling_cagr(&series, config.rolling_years, config.rolling_lookback)?.collect();
    let rolling_mean = mean_rolling_cagr(rolling.iter().copied());
    if rolling_mean.is_none() {
        log::info!(
            "{}: history too short for {}-year rolling CAGR ({} lookback)",
            input.name,
            config.rolling_years,
            config.rolling_lookback.as_str()
        );
    }

    let (sip_xirr_percent, sip_xirr_converged, sip_total_invested, sip_final_value) =
        match build_sip_schedule(&series, &SipPlan::from(config)) {
            Ok(schedule) => {
                let xirr = match calculate_xirr(&schedule.cash_flows(), config.non_convergence_policy) {
                    Ok(result) => {
                        if !result.converged {
                            log::warn!(
                                "{}: SIP XIRR not converged, reporting best effort {:.4}%",
                                input.name,
                                result.percent()
                            );
                        }
                        Some(result)
                    }
                    Err(e) => {
                        log::warn!("{}: SIP XIRR unavailable: {}", input.name, e);
                        None
                    }
                };
                (
                    xirr.map(|r| r.percent()),
                    xirr.map(|r| r.converged).unwrap_or(false),
                    Some(schedule.total_invested),
                    Some(schedule.final_value),
                )
            }
            Err(e) => {
                log::warn!("{}: SIP schedule unavailable: {}", input.name, e);
                (None, false, None, None)
            }
        };

    log::debug!(
        "{}: NAV={:.4}, CAGR={:.2}%, rolling={:?}, SIP XIRR={:?}",
        input.name,
        last.value,
        cagr_percent,
        rolling_mean,
        sip_xirr_percent
    );

    Ok(FundMetrics {
        name: input.name.clone(),
        scheme_code: input.scheme_code.clone(),
        category: input.category.clone(),
        aum: input.aum,
        last_value: last.value,
        last_date: last.date,
        observations: series.len(),
        cagr_percent,
        rolling_cagr_mean_percent: rolling_mean,
        sip_xirr_percent,
        sip_xirr_converged,
        sip_total_invested,
        sip_final_value,
        rolling_cagr: rolling,
    })
}

/// Evaluate funds one after another
pub fn compare_funds(inputs: &[FundInput], config: &MetricsConfig) -> ComparisonReport {
    let outcomes = inputs
        .iter()
        .map(|input| {
            let outcome = evaluate_fund(input, config)
                .map_err(|e| FundFailure::from_error(&input.name, &e));
            (input.name.clone(), outcome)
        })
        .collect();

    ComparisonReport::assemble(outcomes)
}

/// Evaluate every fund on its own blocking task; results keep input order
pub async fn compare_funds_concurrent(inputs: Vec<FundInput>, config: MetricsConfig) -> ComparisonReport {
    let handles: Vec<_> = inputs
        .into_iter()
        .map(|input| {
            let config = config.clone();
            let name = input.name.clone();
            let handle = tokio::task::spawn_blocking(move || {
                evaluate_fund(&input, &config).map_err(|e| FundFailure::from_error(&input.name, &e))
            });
            (name, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(FundFailure {
                name: name.clone(),
                kind: "task_failed".to_string(),
                error: e.to_string(),
            }),
        };
        outcomes.push((name, outcome));
    }

    ComparisonReport::assemble(outcomes)
}
