//! Rolling CAGR over an N-year lookback

use super::cagr::annualized_growth;
use crate::config::{RollingLookback, DAYS_PER_YEAR};
use crate::error::{MetricsError, Result};
use crate::series::{latest_at_or_before, years_before, NavPoint, NavSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rolling CAGR (percent) at a date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub cagr: f64,
}

/// Lazy sequence of rolling CAGR points.
///
/// Dates without a lookback observation, or whose figure overflows, are
/// skipped; a series shorter than the window yields nothing.
#[derive(Debug, Clone)]
pub struct RollingCagr<'a> {
    points: &'a [NavPoint],
    years: u32,
    lookback: RollingLookback,
    index: usize,
}

impl RollingCagr<'_> {
    fn window_days(&self) -> i64 {
        self.years as i64 * DAYS_PER_YEAR
    }

    fn lookback_for(&self, index: usize) -> Option<NavPoint> {
        match self.lookback {
            RollingLookback::Positional => {
                let offset = self.window_days() as usize;
                index.checked_sub(offset).map(|i| self.points[i])
            }
            RollingLookback::Calendar => {
                let target = years_before(self.points[index].date, self.years)?;
                latest_at_or_before(&self.points[..index], target)
            }
        }
    }
}

impl Iterator for RollingCagr<'_> {
    type Item = RollingPoint;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.points.len() {
            let index = self.index;
            self.index += 1;

            if let Some(base) = self.lookback_for(index) {
                let current = self.points[index];
                let cagr = annualized_growth(base.value, current.value, self.years as f64);
                if cagr.is_finite() {
                    return Some(RollingPoint {
                        date: current.date,
                        cagr,
                    });
                }
                log::debug!("Rolling CAGR: dropping non-finite figure on {}", current.date);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Overflowing figures are dropped, so only the upper bound is exact
        let upper = match self.lookback {
            RollingLookback::Positional => {
                let start = self.index.max(self.window_days() as usize);
                self.points.len().saturating_sub(start)
            }
            RollingLookback::Calendar => self.points.len().saturating_sub(self.index),
        };
        (0, Some(upper))
    }
}

/// Rolling CAGR sequence over the series with a window of `years`
pub fn rolling_cagr(
    series: &NavSeries,
    years: u32,
    lookback: RollingLookback,
) -> Result<RollingCagr<'_>> {
    if years == 0 {
        return Err(MetricsError::InvalidConfig(
            "rolling window must be at least one year".to_string(),
        ));
    }

    let mut rolling = RollingCagr {
        points: series.points(),
        years,
        lookback,
        index: 0,
    };
    if lookback == RollingLookback::Positional {
        // Nothing before the first full window can match
        rolling.index = rolling.window_days() as usize;
    }
    Ok(rolling)
}

/// Arithmetic mean of a rolling sequence, `None` when it is empty
pub fn mean_rolling_cagr<I>(points: I) -> Option<f64>
where
    I: IntoIterator<Item = RollingPoint>,
{
    let (sum, count) = points
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), p| (sum + p.cagr, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
