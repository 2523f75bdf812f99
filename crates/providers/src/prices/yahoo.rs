//! Yahoo Finance chart API client.
//!
//! `GET /v8/finance/chart/{symbol}?period1=..&period2=..&interval=..` returns
//! column arrays of OHLCV values plus a `meta` block with quote fields.

use super::{validate_symbol, HistoryRequest, PriceHistorySource, QuoteSnapshot};
use crate::error::{ProviderError, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_pulse_core::PriceSourceConfig;
use market_pulse_data::{Bar, PriceSeries};
use serde::Deserialize;

// =============================================================================
// Raw API types
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawChartResponse {
    chart: RawChart,
}

#[derive(Debug, Deserialize)]
struct RawChart {
    #[serde(default)]
    result: Option<Vec<RawChartResult>>,
    #[serde(default)]
    error: Option<RawChartError>,
}

#[derive(Debug, Deserialize)]
struct RawChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChartResult {
    meta: RawMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: RawIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeta {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    previous_close: Option<f64>,
    #[serde(default)]
    chart_previous_close: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawIndicators {
    #[serde(default)]
    quote: Vec<RawQuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct RawQuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl RawChartResult {
    /// Zips the column arrays into bars. Rows missing any price are skipped;
    /// a missing volume is 0.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn bars(&self) -> Vec<Bar> {
        let Some(columns) = self.indicators.quote.first() else {
            return Vec::new();
        };
        fn at(col: &[Option<f64>], i: usize) -> Option<f64> {
            col.get(i).copied().flatten()
        }

        let bars: Vec<Bar> = self
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let timestamp = DateTime::<Utc>::from_timestamp(ts, 0)?;
                let bar = Bar::new(
                    timestamp,
                    at(&columns.open, i)?,
                    at(&columns.high, i)?,
                    at(&columns.low, i)?,
                    at(&columns.close, i)?,
                    at(&columns.volume, i).map_or(0, |v| v.max(0.0).round() as u64),
                );
                Some(bar)
            })
            .collect();

        let inconsistent = bars.iter().filter(|b| !b.is_consistent()).count();
        if inconsistent > 0 {
            tracing::debug!(inconsistent, "chart rows with open/close outside high/low");
        }
        bars
    }

    fn quote(&self, requested: &str) -> QuoteSnapshot {
        QuoteSnapshot {
            symbol: self.meta.symbol.clone().unwrap_or_else(|| requested.to_string()),
            last_price: self.meta.regular_market_price,
            previous_close: self.meta.previous_close.or(self.meta.chart_previous_close),
            currency: self.meta.currency.clone(),
        }
    }
}

// =============================================================================
// YahooChartClient
// =============================================================================

#[derive(Debug, Clone)]
pub struct YahooChartClient {
    http: HttpClient,
    base_url: String,
}

impl YahooChartClient {
    pub fn new(http: HttpClient, config: &PriceSourceConfig) -> Self {
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

    /// Fetches the chart result; `None` when Yahoo does not know the symbol.
    async fn chart(&self, symbol: &str, query: &[(&str, String)]) -> Result<Option<RawChartResult>> {
        let symbol = validate_symbol(symbol)?;
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let Some(raw) = self
            .http
            .send_json_optional::<RawChartResponse>(self.http.get(&url).query(query))
            .await?
        else {
            tracing::debug!(symbol, "chart returned 404");
            return Ok(None);
        };

        if let Some(err) = raw.chart.error {
            if err.code.eq_ignore_ascii_case("Not Found") {
                return Ok(None);
            }
            return Err(ProviderError::decode(format!(
                "chart error {}: {}",
                err.code, err.description
            )));
        }

        Ok(raw.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.swap_remove(0))
            }
        }))
    }
}

#[async_trait]
impl PriceHistorySource for YahooChartClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceSeries> {
        let query = [
            ("period1", request.start.timestamp().to_string()),
            ("period2", request.end.timestamp().to_string()),
            ("interval", request.interval.as_str().to_string()),
            ("includePrePost", "false".to_string()),
        ];

        let Some(result) = self.chart(&request.symbol, &query).await? else {
            return Ok(PriceSeries::empty(&request.symbol, request.interval));
        };

        let bars = result.bars();
        let skipped = result.timestamp.len().saturating_sub(bars.len());
        if skipped > 0 {
            tracing::debug!(symbol = %request.symbol, skipped, "skipped incomplete chart rows");
        }

        Ok(PriceSeries::new(&request.symbol, request.interval, bars))
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Option<QuoteSnapshot>> {
        // With a one-day range `chartPreviousClose` is the prior session's close.
        let query = [
            ("range", "1d".to_string()),
            ("interval", "1d".to_string()),
        ];
        Ok(self
            .chart(symbol, &query)
            .await?
            .map(|result| result.quote(symbol)))
    }
}
