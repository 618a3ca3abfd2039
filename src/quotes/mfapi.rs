//! mfapi.in NAV history provider
//!
//! `GET {base}/{scheme_code}` returns scheme metadata plus the full NAV history,
//! newest first, with dates as `dd-mm-YYYY` and NAVs as decimal strings.

use super::QuoteSourceConfig;
use crate::comparison::FundInput;
use crate::series::NavPoint;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// Full response
#[derive(Debug, Deserialize)]
struct NavHistoryResponse {
    #[serde(default)]
    meta: Option<SchemeMeta>,
    data: Option<Vec<NavRow>>,
}

#[derive(Debug, Default, Deserialize)]
struct SchemeMeta {
    #[serde(default)]
    scheme_code: Option<Value>,
    #[serde(default)]
    scheme_name: Option<String>,
    #[serde(default)]
    scheme_category: Option<String>,
    #[serde(default)]
    aum: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct NavRow {
    date: String,
    nav: Value,
}

/// Parsed NAV history with scheme metadata
#[derive(Debug, Clone, PartialEq)]
pub struct NavHistory {
    pub scheme_code: Option<String>,
    pub scheme_name: Option<String>,
    pub category: Option<String>,
    pub aum: Option<f64>,
    /// Date-ascending
    pub observations: Vec<NavPoint>,
}

impl NavHistory {
    /// Convert into engine input; `fallback_name` is used when the response has no scheme name
    pub fn into_fund_input(self, fallback_name: &str) -> FundInput {
        FundInput {
            name: self.scheme_name.unwrap_or_else(|| fallback_name.to_string()),
            scheme_code: self.scheme_code,
            category: self.category,
            aum: self.aum,
            observations: self.observations,
        }
    }
}

/// Number that may arrive as JSON number or string
fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Parse an mfapi response body
pub fn parse_nav_history(body: &str) -> Result<NavHistory> {
    let response: NavHistoryResponse = serde_json::from_str(body)?;

    let rows = response
        .data
        .ok_or_else(|| anyhow!("mfapi response has no NAV data"))?;
    let meta = response.meta.unwrap_or_default();

    let total = rows.len();
    let mut observations: Vec<NavPoint> = rows
        .into_iter()
        .filter_map(|row| {
            let date = NaiveDate::parse_from_str(row.date.trim(), "%d-%m-%Y").ok();
            let nav = value_as_f64(&row.nav);
            match (date, nav) {
                (Some(date), Some(nav)) => Some(NavPoint::new(date, nav)),
                _ => {
                    log::debug!("mfapi: dropping unparseable row {:?} / {:?}", row.date, row.nav);
                    None
                }
            }
        })
        .collect();
    observations.sort_by_key(|p| p.date);

    if observations.len() < total {
        log::debug!("mfapi: kept {} of {} NAV rows", observations.len(), total);
    }

    Ok(NavHistory {
        scheme_code: meta.scheme_code.as_ref().and_then(value_as_string),
        scheme_name: meta.scheme_name.map(|s| s.trim().to_string()),
        category: meta.scheme_category.map(|s| s.trim().to_string()),
        aum: meta.aum.as_ref().and_then(value_as_f64),
        observations,
    })
}

/// Fetch the NAV history of a scheme
///
/// # Arguments
/// * `scheme_code` - AMFI scheme code (e.g., "119551")
pub async fn fetch_nav_history(config: &QuoteSourceConfig, scheme_code: &str) -> Result<NavHistory> {
    let client = config.client()?;
    let url = format!("{}/{}", config.mfapi_base_url.trim_end_matches('/'), scheme_code);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("mfapi error for scheme {}: {}", scheme_code, response.status()));
    }

    let body = response.text().await?;
    let history = parse_nav_history(&body)?;

    log::info!(
        "mfapi: {} NAV points for scheme {} ({})",
        history.observations.len(),
        scheme_code,
        history.scheme_name.as_deref().unwrap_or("unnamed")
    );

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "meta": {
            "fund_house": "Axis Mutual Fund",
            "scheme_type": "Open Ended Schemes",
            "scheme_category": "Equity Scheme - Large Cap Fund",
            "scheme_code": 120465,
            "scheme_name": "Axis Bluechip Fund - Direct Plan - Growth"
        },
        "data": [
            { "date": "18-10-2024", "nav": "62.14000" },
            { "date": "17-10-2024", "nav": "61.98000" },
            { "date": "bogus", "nav": "61.00000" },
            { "date": "16-10-2024", "nav": "62.50000" }
        ],
        "status": "SUCCESS"
    }"#;

    #[test]
    fn test_parse_nav_history() {
        let history = parse_nav_history(SAMPLE).unwrap();

        assert_eq!(history.scheme_code.as_deref(), Some("120465"));
        assert_eq!(history.category.as_deref(), Some("Equity Scheme - Large Cap Fund"));
        assert_eq!(history.aum, None);
        assert_eq!(history.observations.len(), 3);
        assert_eq!(
            history.observations[0],
            NavPoint::new(NaiveDate::from_ymd_opt(2024, 10, 16).unwrap(), 62.5)
        );
        assert_eq!(history.observations[2].value, 62.14);
    }

    #[test]
    fn test_missing_data_is_error() {
        let body = r#"{ "meta": {}, "status": "ERROR" }"#;
        assert!(parse_nav_history(body).is_err());
        assert!(parse_nav_history("not json").is_err());
    }

    #[test]
    fn test_into_fund_input() {
        let body = r#"{ "meta": { "aum": "1523.7" }, "data": [ { "date": "01-01-2024", "nav": 10.5 } ] }"#;
        let input = parse_nav_history(body).unwrap().into_fund_input("119551");

        assert_eq!(input.name, "119551");
        assert_eq!(input.category, None);
        assert_eq!(input.aum, Some(1523.7));
        assert_eq!(input.observations.len(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires network
    async fn test_fetch_nav_history() {
        let history = fetch_nav_history(&QuoteSourceConfig::default(), "120465").await.unwrap();
        assert!(history.observations.len() > 800);
    }
}
