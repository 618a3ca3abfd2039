//! NAV time series
//!
//! Validation and normalization of raw `(date, value)` observations before any
//! metric is computed:
//! - every value finite and strictly positive
//! - dates non-decreasing (duplicates allowed)
//! - at least `min_observations` points (never fewer than one)

use crate::config::DAYS_PER_YEAR;
use crate::error::{MetricsError, ObservationIssue, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Single NAV observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl NavPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

impl From<(NaiveDate, f64)> for NavPoint {
    fn from((date, value): (NaiveDate, f64)) -> Self {
        Self { date, value }
    }
}

/// Validated, date-ascending NAV series
#[derive(Debug, Clone, PartialEq)]
pub struct NavSeries {
    points: Vec<NavPoint>,
}

impl NavSeries {
    /// Validate observations that must already be in date order
    pub fn new(points: Vec<NavPoint>, min_observations: usize) -> Result<Self> {
        for (index, point) in points.iter().enumerate() {
            let issue = if !point.value.is_finite() {
                Some(ObservationIssue::NonFinite)
            } else if point.value <= 0.0 {
                Some(ObservationIssue::NonPositive)
            } else if index > 0 && point.date < points[index - 1].date {
                Some(ObservationIssue::OutOfOrder)
            } else {
                None
            };

            if let Some(issue) = issue {
                return Err(MetricsError::InvalidObservation {
                    index,
                    date: point.date,
                    issue,
                });
            }
        }

        let required = min_observations.max(1);
        if points.len() < required {
            return Err(MetricsError::InsufficientData {
                required,
                actual: points.len(),
            });
        }

        Ok(Self { points })
    }

    /// Sort by date (stable, so same-day order is kept), then validate
    pub fn from_unsorted(mut points: Vec<NavPoint>, min_observations: usize) -> Result<Self> {
        points.sort_by_key(|p| p.date);
        Self::new(points, min_observations)
    }

    pub fn points(&self) -> &[NavPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> NavPoint {
        self.points[0]
    }

    pub fn last(&self) -> NavPoint {
        self.points[self.points.len() - 1]
    }

    /// Calendar days between first and last observation
    pub fn span_days(&self) -> i64 {
        (self.last().date - self.first().date).num_days()
    }

    /// Trailing slice whose dates fall within `years * 365` days of the last date
    pub fn trailing(&self, years: u32) -> &[NavPoint] {
        match years_before(self.last().date, years) {
            Some(start) => {
                let from = self.points.partition_point(|p| p.date < start);
                &self.points[from..]
            }
            // Window reaches past the earliest representable date
            None => &self.points,
        }
    }

    /// Latest observation dated on or before `date`
    pub fn latest_at_or_before(&self, date: NaiveDate) -> Option<NavPoint> {
        latest_at_or_before(&self.points, date)
    }
}

/// `date - years * 365 days`, `None` if that falls outside the calendar range
pub fn years_before(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    let days = Duration::try_days(years as i64 * DAYS_PER_YEAR)?;
    date.checked_sub_signed(days)
}

/// Latest point dated on or before `date` in an ascending slice.
/// For duplicate dates the last one wins.
pub fn latest_at_or_before(points: &[NavPoint], date: NaiveDate) -> Option<NavPoint> {
    let idx = points.partition_point(|p| p.date <= date);
    if idx == 0 {
        None
    } else {
        Some(points[idx - 1])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Gap-free daily series starting at `start`
    pub(crate) fn daily_series(start: NaiveDate, values: &[f64]) -> Vec<NavPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| NavPoint::new(start + Duration::days(i as i64), *v))
            .collect()
    }

    #[test]
    fn test_threshold_boundary() {
        let start = date(2018, 1, 1);

        let short = daily_series(start, &vec![10.0; 799]);
        let err = NavSeries::new(short, 800).unwrap_err();
        assert_eq!(err, MetricsError::InsufficientData { required: 800, actual: 799 });

        let enough = daily_series(start, &vec![10.0; 800]);
        let series = NavSeries::new(enough, 800).unwrap();
        assert_eq!(series.len(), 800);
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let err = NavSeries::new(vec![], 0).unwrap_err();
        assert_eq!(err, MetricsError::InsufficientData { required: 1, actual: 0 });
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut points = daily_series(date(2024, 1, 1), &[10.0, 11.0, 12.0]);
        points[1].value = 0.0;
        let err = NavSeries::new(points.clone(), 1).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::InvalidObservation { index: 1, issue: ObservationIssue::NonPositive, .. }
        ));

        points[1].value = f64::INFINITY;
        let err = NavSeries::new(points.clone(), 1).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::InvalidObservation { index: 1, issue: ObservationIssue::NonFinite, .. }
        ));

        points[1].value = f64::NAN;
        assert!(NavSeries::new(points, 1).is_err());
    }

    #[test]
    fn test_bad_value_reported_before_count() {
        let points = vec![NavPoint::new(date(2024, 1, 1), -5.0)];
        let err = NavSeries::new(points, 800).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidObservation { .. }));
    }

    #[test]
    fn test_out_of_order_is_invalid_but_normalizable() {
        let points = vec![
            NavPoint::new(date(2024, 1, 3), 12.0),
            NavPoint::new(date(2024, 1, 1), 10.0),
            NavPoint::new(date(2024, 1, 2), 11.0),
        ];

        let err = NavSeries::new(points.clone(), 1).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::InvalidObservation { index: 1, issue: ObservationIssue::OutOfOrder, .. }
        ));

        let series = NavSeries::from_unsorted(points, 1).unwrap();
        assert_eq!(series.first().date, date(2024, 1, 1));
        assert_eq!(series.last().value, 12.0);
        assert_eq!(series.span_days(), 2);
    }

    #[test]
    fn test_duplicate_dates_allowed() {
        let points = vec![
            NavPoint::new(date(2024, 1, 1), 10.0),
            NavPoint::new(date(2024, 1, 1), 10.5),
            NavPoint::new(date(2024, 1, 2), 11.0),
        ];
        let series = NavSeries::new(points, 1).unwrap();
        let found = series.latest_at_or_before(date(2024, 1, 1)).unwrap();
        assert_eq!(found.value, 10.5);
    }

    #[test]
    fn test_latest_at_or_before() {
        let points = vec![
            NavPoint::new(date(2024, 1, 1), 1000.0),
            NavPoint::new(date(2024, 6, 1), 1100.0),
            NavPoint::new(date(2024, 12, 31), 1200.0),
        ];
        let series = NavSeries::new(points, 1).unwrap();

        assert_eq!(series.latest_at_or_before(date(2024, 6, 1)).unwrap().value, 1100.0);
        assert_eq!(series.latest_at_or_before(date(2024, 5, 15)).unwrap().value, 1000.0);
        assert!(series.latest_at_or_before(date(2023, 12, 31)).is_none());
    }

    #[test]
    fn test_trailing_window() {
        let start = date(2015, 1, 1);
        let series = NavSeries::new(daily_series(start, &vec![10.0; 3000]), 1).unwrap();

        let window = series.trailing(5);
        assert_eq!(window.last().unwrap().date, series.last().date);
        // 5 * 365 days back from the last date, inclusive
        assert_eq!(window.len(), 5 * 365 + 1);
        assert_eq!(
            (series.last().date - window[0].date).num_days(),
            5 * 365
        );

        // Window longer than history returns everything
        assert_eq!(series.trailing(50).len(), 3000);
        assert_eq!(series.trailing(u32::MAX).len(), 3000);
    }

    #[test]
    fn test_years_before() {
        assert_eq!(years_before(date(2024, 1, 1), 2), Some(date(2022, 1, 1)));
        assert_eq!(years_before(date(2024, 1, 1), 1_000_000), None);
        assert_eq!(years_before(date(2024, 1, 1), u32::MAX), None);
    }
}
