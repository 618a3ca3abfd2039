//! AMFI scheme list
//!
//! `NAVAll.txt` is a `;`-separated dump of every scheme:
//! `Scheme Code;ISIN Div Payout/ISIN Growth;ISIN Div Reinvestment;Scheme Name;Net Asset Value;Date`
//! interleaved with fund-house headers and blank lines.

use super::QuoteSourceConfig;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Scheme entry from the AMFI list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeInfo {
    pub code: String,
    pub name: String,
}

/// Parse the AMFI list, keeping rows whose first field is a numeric scheme code
pub fn parse_scheme_list(text: &str) -> Vec<SchemeInfo> {
    text.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(';').collect();
            if parts.len() < 5 {
                return None;
            }
            let code = parts[0].trim();
            if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            Some(SchemeInfo {
                code: code.to_string(),
                name: parts[3].trim().to_string(),
            })
        })
        .collect()
}

/// Case-insensitive name search, at most `limit` hits
pub fn search<'a>(schemes: &'a [SchemeInfo], query: &str, limit: usize) -> Vec<&'a SchemeInfo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    schemes
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle) || s.code == needle)
        .take(limit)
        .collect()
}

/// Download and parse the AMFI scheme list
pub async fn fetch_scheme_list(config: &QuoteSourceConfig) -> Result<Vec<SchemeInfo>> {
    let client = config.client()?;

    let response = client.get(&config.amfi_url).send().await?;
    if !response.status().is_success() {
        return Err(anyhow!("AMFI scheme list error: {}", response.status()));
    }

    let text = response.text().await?;
    let schemes = parse_scheme_list(&text);
    log::info!("AMFI: loaded {} schemes", schemes.len());

    Ok(schemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Scheme Code;ISIN Div Payout/ ISIN Growth;ISIN Div Reinvestment;Scheme Name;Net Asset Value;Date

Open Ended Schemes(Debt Scheme - Banking and PSU Fund)

Aditya Birla Sun Life Mutual Fund

119551;INF209KA12Z1;INF209KA13Z9;Aditya Birla Sun Life Banking & PSU Debt Fund  - DIRECT - IDCW;104.7103;18-Oct-2024
120437;INF209K01YY7;-;Axis Bluechip Fund - Direct Plan - Growth;62.1400;18-Oct-2024
bad;row;with;five;fields
";

    #[test]
    fn test_parse_scheme_list() {
        let schemes = parse_scheme_list(SAMPLE);
        assert_eq!(schemes.len(), 2);
        assert_eq!(schemes[0].code, "119551");
        assert_eq!(
            schemes[0].name,
            "Aditya Birla Sun Life Banking & PSU Debt Fund  - DIRECT - IDCW"
        );
        assert_eq!(schemes[1].name, "Axis Bluechip Fund - Direct Plan - Growth");
    }

    #[test]
    fn test_search() {
        let schemes = parse_scheme_list(SAMPLE);
        let hits = search(&schemes, "bluechip", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "120437");

        assert_eq!(search(&schemes, "119551", 10).len(), 1);
        assert_eq!(search(&schemes, "fund", 1).len(), 1);
        assert!(search(&schemes, "   ", 10).is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network
    async fn test_fetch_scheme_list() {
        let schemes = fetch_scheme_list(&QuoteSourceConfig::default()).await.unwrap();
        assert!(!schemes.is_empty());
    }
}
