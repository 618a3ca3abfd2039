//! Whole-period CAGR

use crate::config::DAYS_PER_YEAR;
use crate::error::{MetricsError, Result};
use crate::series::NavSeries;

/// Annualized growth in percent: `((end / start)^(1 / years) - 1) × 100`
pub fn annualized_growth(start_value: f64, end_value: f64, years: f64) -> f64 {
    ((end_value / start_value).powf(1.0 / years) - 1.0) * 100.0
}

/// CAGR (percent) from the first to the last observation of the series
pub fn calculate_cagr(series: &NavSeries) -> Result<f64> {
    let first = series.first();
    let last = series.last();
    let days = series.span_days();

    if days <= 0 {
        return Err(MetricsError::DegenerateInterval { days });
    }

    let years = days as f64 / DAYS_PER_YEAR as f64;
    let cagr = annualized_growth(first.value, last.value, years);
    if !cagr.is_finite() {
        // Growth too steep to annualize over this span
        return Err(MetricsError::DegenerateInterval { days });
    }

    log::debug!(
        "CAGR {}..{}: {:.4} → {:.4} over {:.3} years = {:.4}%",
        first.date, last.date, first.value, last.value, years, cagr
    );

    Ok(cagr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::{date, daily_series};
    use crate::series::NavPoint;
    use chrono::Duration;

    #[test]
    fn test_cagr_round_trip() {
        // Compound exactly 12% per 365 days for 4 years
        let seed = 100.0;
        let rate: f64 = 0.12;
        let start = date(2019, 1, 1);
        let points: Vec<NavPoint> = (0..=4)
            .map(|y| NavPoint::new(start + Duration::days(y * 365), seed * (1.0 + rate).powi(y as i32)))
            .collect();
        let series = NavSeries::new(points, 1).unwrap();

        let cagr = calculate_cagr(&series).unwrap();
        assert!((cagr - 12.0).abs() < 1e-9, "Expected 12%, got {:.6}%", cagr);
    }

    #[test]
    fn test_cagr_fixed_365_day_year() {
        // 2020 is a leap year: 366 days between the two dates
        let points = vec![
            NavPoint::new(date(2020, 1, 1), 1000.0),
            NavPoint::new(date(2021, 1, 1), 1100.0),
        ];
        let series = NavSeries::new(points, 1).unwrap();

        let expected = ((1100.0_f64 / 1000.0).powf(365.0 / 366.0) - 1.0) * 100.0;
        let cagr = calculate_cagr(&series).unwrap();
        assert!((cagr - expected).abs() < 1e-12);
        assert!(cagr < 10.0);
    }

    #[test]
    fn test_cagr_scale_invariance() {
        let values: Vec<f64> = (0..900).map(|i| 50.0 + (i as f64 * 0.37).sin() * 5.0 + i as f64 * 0.02).collect();
        let scaled: Vec<f64> = values.iter().map(|v| v * 37.5).collect();
        let start = date(2020, 3, 15);

        let a = calculate_cagr(&NavSeries::new(daily_series(start, &values), 1).unwrap()).unwrap();
        let b = calculate_cagr(&NavSeries::new(daily_series(start, &scaled), 1).unwrap()).unwrap();
        assert!((a - b).abs() < 1e-9, "CAGR changed under rescaling: {} vs {}", a, b);
    }

    #[test]
    fn test_cagr_negative_return() {
        let points = vec![
            NavPoint::new(date(2023, 1, 1), 1000.0),
            NavPoint::new(date(2024, 1, 1), 800.0),
        ];
        let series = NavSeries::new(points, 1).unwrap();
        let cagr = calculate_cagr(&series).unwrap();
        assert!((cagr - (-20.0)).abs() < 1e-9, "Expected -20%, got {:.4}%", cagr);
    }

    #[test]
    fn test_cagr_overflow_is_degenerate() {
        let points = vec![
            NavPoint::new(date(2024, 1, 1), 1.0),
            NavPoint::new(date(2024, 1, 2), 1e300),
        ];
        let series = NavSeries::new(points, 1).unwrap();
        assert!(annualized_growth(1.0, 1e300, 1.0 / 365.0).is_infinite());
        assert_eq!(
            calculate_cagr(&series).unwrap_err(),
            MetricsError::DegenerateInterval { days: 1 }
        );
    }

    #[test]
    fn test_cagr_degenerate_interval() {
        let single = NavSeries::new(vec![NavPoint::new(date(2024, 1, 1), 10.0)], 1).unwrap();
        assert_eq!(
            calculate_cagr(&single).unwrap_err(),
            MetricsError::DegenerateInterval { days: 0 }
        );

        let same_day = NavSeries::new(
            vec![
                NavPoint::new(date(2024, 1, 1), 10.0),
                NavPoint::new(date(2024, 1, 1), 11.0),
            ],
            1,
        )
        .unwrap();
        assert!(matches!(
            calculate_cagr(&same_day),
            Err(MetricsError::DegenerateInterval { .. })
        ));
    }
}
