//! Error taxonomy for the metrics engine
//!
//! Every failure the core can signal for a single fund. The batch layer turns
//! these into per-fund failure entries instead of aborting the whole comparison.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Why a single observation was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationIssue {
    /// NaN or infinite value
    NonFinite,
    /// Zero or negative value
    NonPositive,
    /// Date earlier than the preceding observation
    OutOfOrder,
}

impl ObservationIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonFinite => "non-finite value",
            Self::NonPositive => "non-positive value",
            Self::OutOfOrder => "date out of order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("insufficient data: {actual} observations, at least {required} required")]
    InsufficientData { required: usize, actual: usize },

    #[error("invalid observation #{index} on {date}: {}", issue.as_str())]
    InvalidObservation {
        index: usize,
        date: NaiveDate,
        issue: ObservationIssue,
    },

    /// Span too short to annualize (zero days, or growth that overflows)
    #[error("degenerate interval: {days} days between first and last observation")]
    DegenerateInterval { days: i64 },

    #[error("invalid cash flow pattern: {negative} outflows, {positive} inflows (need at least one of each)")]
    InvalidCashFlowPattern { negative: usize, positive: usize },

    #[error("XIRR did not converge after {iterations} iterations (last rate {last_rate})")]
    XirrNotConverged { iterations: u32, last_rate: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MetricsError {
    /// Stable identifier for serialized failure reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "insufficient_data",
            Self::InvalidObservation { .. } => "invalid_observation",
            Self::DegenerateInterval { .. } => "degenerate_interval",
            Self::InvalidCashFlowPattern { .. } => "invalid_cash_flow_pattern",
            Self::XirrNotConverged { .. } => "xirr_not_converged",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

pub type Result<T> = std::result::Result<T, MetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MetricsError::InsufficientData { required: 800, actual: 799 };
        assert_eq!(
            err.to_string(),
            "insufficient data: 799 observations, at least 800 required"
        );

        let err = MetricsError::InvalidObservation {
            index: 3,
            date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            issue: ObservationIssue::NonPositive,
        };
        assert_eq!(
            err.to_string(),
            "invalid observation #3 on 2024-02-29: non-positive value"
        );
    }
}
