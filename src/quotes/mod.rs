//! Quote sources for mutual fund NAV data
//!
//! Collaborators that fetch raw data over HTTP and turn it into inputs for the
//! metrics engine. The engine itself never depends on this module.
//! - AMFI (scheme list for search/autocomplete)
//! - mfapi.in (NAV history with scheme metadata)

pub mod amfi;
pub mod mfapi;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_AMFI_URL: &str = "https://www.amfiindia.com/spages/NAVAll.txt";
const DEFAULT_MFAPI_BASE_URL: &str = "https://api.mfapi.in/mf";

/// Endpoints and timeouts for the quote collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSourceConfig {
    pub amfi_url: String,
    pub mfapi_base_url: String,
    pub timeout_secs: u64,
}

impl Default for QuoteSourceConfig {
    fn default() -> Self {
        Self {
            amfi_url: DEFAULT_AMFI_URL.to_string(),
            mfapi_base_url: DEFAULT_MFAPI_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl QuoteSourceConfig {
    /// Parse a (partial) JSON configuration, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn client(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_overrides() {
        let config = QuoteSourceConfig::from_json(
            r#"{ "mfapiBaseUrl": "http://localhost:8080/mf", "timeoutSecs": 5 }"#,
        )
        .unwrap();

        assert_eq!(config.mfapi_base_url, "http://localhost:8080/mf");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.amfi_url, DEFAULT_AMFI_URL);
        assert!(QuoteSourceConfig::from_json(r#"{ "timeoutSecs": "soon" }"#).is_err());
    }
}
