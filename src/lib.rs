//! Mutual fund metrics engine
//!
//! Validates NAV histories and computes whole-period CAGR, rolling CAGR, the
//! XIRR of a simulated SIP and per-category CAGR averages. HTTP collaborators
//! for AMFI and mfapi.in live in [`quotes`].

pub mod comparison;
pub mod config;
pub mod error;
pub mod investment_plans;
pub mod performance;
pub mod quotes;
pub mod series;

pub use comparison::{compare_funds, compare_funds_concurrent, evaluate_fund, ComparisonReport, FundInput, FundMetrics};
pub use config::MetricsConfig;
pub use error::{MetricsError, Result};
pub use series::{NavPoint, NavSeries};
