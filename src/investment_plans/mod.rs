//! Investment Plans (SIP)
//!
//! Builds the cash-flow schedule of a systematic investment plan against a NAV
//! series: a fixed amount is invested at every period anchor inside the
//! trailing window, and the accumulated units are redeemed at the last NAV.

use crate::config::MetricsConfig;
use crate::error::{MetricsError, Result};
use crate::performance::CashFlow;
use crate::series::{latest_at_or_before, years_before, NavPoint, NavSeries};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Plan interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanInterval {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl PlanInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// First anchor on or after `start`
    fn first_anchor(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Weekly => Some(start),
            Self::Monthly | Self::Quarterly | Self::Yearly => {
                if start.day() == 1 {
                    Some(start)
                } else {
                    add_months(month_start(start)?, 1)
                }
            }
        }
    }

    fn next_anchor(&self, anchor: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Weekly => anchor.checked_add_signed(Duration::days(7)),
            Self::Monthly => add_months(anchor, 1),
            Self::Quarterly => add_months(anchor, 3),
            Self::Yearly => add_months(anchor, 12),
        }
    }
}

impl FromStr for PlanInterval {
    type Err = String;

    /// Case-insensitive, as accepted on the command line
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "QUARTERLY" => Ok(Self::Quarterly),
            "YEARLY" => Ok(Self::Yearly),
            _ => Err(format!(
                "unknown interval '{}' (expected weekly, monthly, quarterly or yearly)",
                s
            )),
        }
    }
}

/// SIP parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipPlan {
    /// Contribution per period
    pub amount: f64,
    pub interval: PlanInterval,
    /// Trailing years covered by the plan
    pub years: u32,
}

impl Default for SipPlan {
    fn default() -> Self {
        Self {
            amount: 5000.0,
            interval: PlanInterval::Monthly,
            years: 5,
        }
    }
}

impl From<&MetricsConfig> for SipPlan {
    fn from(config: &MetricsConfig) -> Self {
        Self {
            amount: config.sip_amount,
            interval: config.sip_interval,
            years: config.sip_years,
        }
    }
}

/// SIP cash-flow schedule
///
/// `amounts` and `dates` are parallel; the last entry is always the redemption.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipSchedule {
    pub amounts: Vec<f64>,
    pub dates: Vec<NaiveDate>,
    /// Units held at redemption
    pub units: f64,
    /// Sum of all contributions
    pub total_invested: f64,
    /// Redemption value (units × last NAV)
    pub final_value: f64,
    /// Number of purchases made
    pub installments: usize,
}

impl SipSchedule {
    pub fn cash_flows(&self) -> Vec<CashFlow> {
        self.dates
            .iter()
            .zip(&self.amounts)
            .map(|(date, amount)| CashFlow::new(*date, *amount))
            .collect()
    }
}

/// Build the SIP schedule over the trailing `plan.years` of the series.
///
/// Anchors with no NAV on or before them inside the window are skipped.
pub fn build_sip_schedule(series: &NavSeries, plan: &SipPlan) -> Result<SipSchedule> {
    if !plan.amount.is_finite() || plan.amount <= 0.0 {
        return Err(MetricsError::InvalidConfig(format!(
            "SIP amount must be a positive number, got {}",
            plan.amount
        )));
    }
    if plan.years == 0 {
        return Err(MetricsError::InvalidConfig(
            "SIP period must be at least one year".to_string(),
        ));
    }

    let window: &[NavPoint] = series.trailing(plan.years);
    let last = series.last();
    let window_start = years_before(last.date, plan.years).ok_or_else(|| {
        MetricsError::InvalidConfig(format!(
            "SIP period of {} years reaches past the supported calendar range",
            plan.years
        ))
    })?;

    let mut amounts = Vec::new();
    let mut dates = Vec::new();
    let mut units = 0.0;
    let mut skipped = 0usize;

    let mut anchor = plan.interval.first_anchor(window_start);
    while let Some(date) = anchor {
        if date > last.date {
            break;
        }

        match latest_at_or_before(window, date) {
            Some(nav) => {
                units += plan.amount / nav.value;
                amounts.push(-plan.amount);
                dates.push(date);
            }
            None => {
                skipped += 1;
                log::debug!("SIP: no NAV on or before {}, skipping installment", date);
            }
        }

        anchor = plan.interval.next_anchor(date);
    }

    let installments = amounts.len();
    if installments == 0 {
        return Err(MetricsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let final_value = units * last.value;
    amounts.push(final_value);
    dates.push(last.date);

    log::debug!(
        "SIP: {} installments ({} skipped), {:.4} units, value {:.2} on {}",
        installments, skipped, units, final_value, last.date
    );

    Ok(SipSchedule {
        amounts,
        dates,
        units,
        total_invested: plan.amount * installments as f64,
        final_value,
        installments,
    })
}

fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

/// Add months, clamping the day to the length of the target month
fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    let month = total % 12 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}
