//! Performance calculation module
//!
//! Implements the return metrics used for fund comparison:
//! - CAGR (Compound Annual Growth Rate) over the whole history
//! - Rolling CAGR over an N-year lookback window
//! - XIRR (Internal Rate of Return of an irregular cash-flow stream)
//!
//! ## CAGR Formula
//!
//! ```text
//! years = (last.date - first.date).days / 365
//! CAGR  = ((V_last / V_first)^(1 / years) - 1) × 100
//! ```
//!
//! The day count is a fixed 365 days per year everywhere (no leap-year calendar).
//!
//! ## Rolling CAGR
//!
//! For each observation `d` with a lookback observation `d_N` N years earlier:
//!
//! ```text
//! rolling(d) = ((V_d / V_{d_N})^(1 / N) - 1) × 100
//! ```
//!
//! The lookback is found either by position (`N × 365` observations back) or by
//! calendar date, see [`crate::config::RollingLookback`].
//!
//! ## XIRR Formula
//!
//! XIRR finds the discount rate where Net Present Value (NPV) equals zero.
//! Uses Newton-Raphson iteration:
//!
//! ```text
//! NPV = Σ CF_i / (1 + r)^t_i = 0
//!
//! Where:
//!   CF_i = Cash flow i (negative = purchase, positive = redemption)
//!   t_i  = days since the first cash flow / 365
//!   r    = XIRR (the rate we're solving for)
//!
//! Newton-Raphson iteration:
//!   r_new = r_old - NPV(r_old) / NPV'(r_old)
//!
//! Where NPV' is the derivative:
//!   NPV'(r) = Σ -t_i × CF_i / (1 + r)^(t_i + 1)
//! ```
//!
//! ## Cash Flow Sign Convention
//!
//! - Negative cash flow = money paid into the fund (SIP purchase)
//! - Positive cash flow = money received (redemption value)

pub mod cagr;
pub mod irr;
pub mod rolling;

pub use cagr::{annualized_growth, calculate_cagr};
pub use irr::{calculate_xirr, CashFlow, XirrResult};
pub use rolling::{mean_rolling_cagr, rolling_cagr, RollingCagr, RollingPoint};
