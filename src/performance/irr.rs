//! XIRR (Internal Rate of Return for irregular cash flows)

use crate::config::{NonConvergencePolicy, DAYS_PER_YEAR};
use crate::error::{MetricsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Initial guess: 10%
const INITIAL_RATE: f64 = 0.10;
const MAX_ITERATIONS: u32 = 200;
const TOLERANCE: f64 = 1e-6;
/// Residual NPV accepted at the root, relative to the sum of absolute flows
const NPV_TOLERANCE: f64 = 1e-9;
/// Rates at or below -100% are undefined
const RATE_FLOOR: f64 = -1.0;

/// A dated cash flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64, // Negative = purchase, Positive = redemption
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// XIRR calculation result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XirrResult {
    /// XIRR as decimal (0.1 = 10%)
    pub rate: f64,
    /// Whether the step size dropped below tolerance
    pub converged: bool,
    /// Number of iterations used
    pub iterations: u32,
}

impl XirrResult {
    pub fn percent(&self) -> f64 {
        self.rate * 100.0
    }
}

/// Calculate XIRR
///
/// Uses Newton-Raphson method to find the rate r where NPV = 0
/// NPV = Σ CF_i / (1 + r)^t_i, t_i = days since the first flow / 365.
///
/// There is no bracketing fallback: with several sign changes the NPV may have
/// more than one root and the solver returns whichever its path reaches.
pub fn calculate_xirr(cash_flows: &[CashFlow], policy: NonConvergencePolicy) -> Result<XirrResult> {
    solve_xirr(cash_flows, policy, MAX_ITERATIONS)
}

fn solve_xirr(
    cash_flows: &[CashFlow],
    policy: NonConvergencePolicy,
    max_iterations: u32,
) -> Result<XirrResult> {
    let negative = cash_flows.iter().filter(|cf| cf.amount < 0.0).count();
    let positive = cash_flows.iter().filter(|cf| cf.amount > 0.0).count();
    if negative == 0 || positive == 0 {
        return Err(MetricsError::InvalidCashFlowPattern { negative, positive });
    }

    let first_date = cash_flows[0].date;
    let cf_series: Vec<(f64, f64)> = cash_flows
        .iter()
        .map(|cf| {
            let years = (cf.date - first_date).num_days() as f64 / DAYS_PER_YEAR as f64;
            (cf.amount, years)
        })
        .collect();

    let scale: f64 = cash_flows.iter().map(|cf| cf.amount.abs()).sum();
    let mut rate = INITIAL_RATE;

    for iteration in 1..=max_iterations {
        let (npv, dnpv) = calculate_npv_and_derivative(&cf_series, rate);

        if dnpv == 0.0 || !dnpv.is_finite() {
            // Flat NPV, Newton step undefined
            log::debug!("XIRR: degenerate derivative at rate {} (iteration {})", rate, iteration);
            return Err(MetricsError::XirrNotConverged {
                iterations: iteration,
                last_rate: rate,
            });
        }

        let mut new_rate = rate - npv / dnpv;
        if !new_rate.is_finite() {
            return Err(MetricsError::XirrNotConverged {
                iterations: iteration,
                last_rate: rate,
            });
        }

        if new_rate <= RATE_FLOOR {
            // Overshot past -100%: go halfway to the floor instead
            new_rate = (rate + RATE_FLOOR) / 2.0;
            if new_rate <= RATE_FLOOR {
                return Err(MetricsError::XirrNotConverged {
                    iterations: iteration,
                    last_rate: rate,
                });
            }
        } else if (new_rate - rate).abs() < TOLERANCE && npv.abs() <= NPV_TOLERANCE * scale {
            log::debug!("XIRR converged: {:.6}% after {} iterations", new_rate * 100.0, iteration);
            return Ok(XirrResult {
                rate: new_rate,
                converged: true,
                iterations: iteration,
            });
        }

        rate = new_rate;
    }

    match policy {
        NonConvergencePolicy::Fail => Err(MetricsError::XirrNotConverged {
            iterations: max_iterations,
            last_rate: rate,
        }),
        NonConvergencePolicy::BestEffort => {
            log::warn!(
                "XIRR did not converge after {} iterations, reporting last rate {:.4}%",
                max_iterations,
                rate * 100.0
            );
            Ok(XirrResult {
                rate,
                converged: false,
                iterations: max_iterations,
            })
        }
    }
}

/// NPV and its derivative for Newton-Raphson
fn calculate_npv_and_derivative(cash_flows: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (cf, years) in cash_flows {
        let discount = (1.0 + rate).powf(*years);
        npv += cf / discount;

        // d/dr [cf / (1+r)^t] = -t * cf / (1+r)^(t+1)
        dnpv -= years * cf / (discount * (1.0 + rate));
    }

    (npv, dnpv)
}
