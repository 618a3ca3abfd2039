//! Metrics configuration
//!
//! All knobs of the engine with their defaults. Every field can be overridden
//! per call; the CLI loads overrides from a JSON file.

use crate::error::{MetricsError, Result};
use crate::investment_plans::PlanInterval;
use serde::{Deserialize, Serialize};

/// Days per year used by every annualization and calendar offset in the crate
pub const DAYS_PER_YEAR: i64 = 365;

/// Upper bound for `rollingYears` and `sipYears`
pub const MAX_WINDOW_YEARS: u32 = 100;

/// How the rolling-CAGR lookback observation is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollingLookback {
    /// Shift by `years * 365` positions. Assumes one observation per calendar
    /// day; gaps (holidays, late NAV publication) misalign the comparison.
    #[default]
    Positional,
    /// Latest observation dated at or before `date - years * 365 days`
    Calendar,
}

impl RollingLookback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positional => "positional",
            Self::Calendar => "calendar",
        }
    }
}

/// What the XIRR solver does when the iteration budget runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonConvergencePolicy {
    /// Return `XirrNotConverged`
    #[default]
    Fail,
    /// Return the last iterate flagged as not converged
    BestEffort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsConfig {
    /// Minimum number of NAV observations before a fund is evaluated
    pub min_observations: usize,
    /// Rolling-CAGR window in whole years
    pub rolling_years: u32,
    pub rolling_lookback: RollingLookback,
    /// SIP contribution per period
    pub sip_amount: f64,
    pub sip_interval: PlanInterval,
    /// Trailing years covered by the SIP schedule
    pub sip_years: u32,
    pub non_convergence_policy: NonConvergencePolicy,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            min_observations: 800,
            rolling_years: 5,
            rolling_lookback: RollingLookback::Positional,
            sip_amount: 5000.0,
            sip_interval: PlanInterval::Monthly,
            sip_years: 5,
            non_convergence_policy: NonConvergencePolicy::Fail,
        }
    }
}

impl MetricsConfig {
    /// Reject parameters the calculators cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.rolling_years == 0 || self.rolling_years > MAX_WINDOW_YEARS {
            return Err(MetricsError::InvalidConfig(format!(
                "rollingYears must be between 1 and {}, got {}",
                MAX_WINDOW_YEARS, self.rolling_years
            )));
        }
        if self.sip_years == 0 || self.sip_years > MAX_WINDOW_YEARS {
            return Err(MetricsError::InvalidConfig(format!(
                "sipYears must be between 1 and {}, got {}",
                MAX_WINDOW_YEARS, self.sip_years
            )));
        }
        if !self.sip_amount.is_finite() || self.sip_amount <= 0.0 {
            return Err(MetricsError::InvalidConfig(format!(
                "sipAmount must be a positive number, got {}",
                self.sip_amount
            )));
        }
        Ok(())
    }

    /// Parse a (partial) JSON configuration, filling gaps with defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: MetricsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
