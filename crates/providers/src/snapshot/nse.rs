//! NSE `equity-stockIndices` snapshot client.

use super::IndexSnapshotSource;
use crate::error::{ProviderError, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use market_pulse_core::SnapshotConfig;
use market_pulse_data::IndexConstituent;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawIndexResponse {
    #[serde(default)]
    data: Vec<RawIndexRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndexRow {
    symbol: String,
    #[serde(default)]
    last_price: Value,
    #[serde(default)]
    p_change: Value,
    /// 1 marks the index's own summary row.
    #[serde(default)]
    priority: Option<i64>,
}

/// Accepts `1.5`, `"1.5"` and `"1,234.50"`; anything else is `None`.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

impl RawIndexRow {
    fn is_index_row(&self, index: &str) -> bool {
        self.priority == Some(1) || self.symbol.eq_ignore_ascii_case(index)
    }

    fn into_constituent(self) -> IndexConstituent {
        IndexConstituent::new(
            self.symbol,
            coerce_number(&self.last_price),
            coerce_number(&self.p_change),
        )
    }
}

#[derive(Debug, Clone)]
pub struct NseIndexClient {
    http: HttpClient,
    base_url: String,
}

impl NseIndexClient {
    pub fn new(http: HttpClient, config: &SnapshotConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl IndexSnapshotSource for NseIndexClient {
    fn name(&self) -> &'static str {
        "nse"
    }

    async fn fetch_constituents(&self, index: &str) -> Result<Vec<IndexConstituent>> {
        if index.trim().is_empty() {
            return Err(ProviderError::invalid_request("index name cannot be empty"));
        }

        let url = format!("{}/equity-stockIndices", self.base_url);
        let builder = self
            .http
            .get(&url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .query(&[("index", index)]);

        let raw: RawIndexResponse = self.http.send_json(builder).await?;
        let rows: Vec<IndexConstituent> = raw
            .data
            .into_iter()
            .filter(|row| !row.is_index_row(index))
            .map(RawIndexRow::into_constituent)
            .collect();

        tracing::debug!(index, count = rows.len(), "index snapshot fetched");
        Ok(rows)
    }
}
