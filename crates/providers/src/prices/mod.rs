//! Price history sources.

pub mod yahoo;

pub use yahoo::YahooChartClient;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_pulse_data::{LookbackPeriod, PriceSeries, SamplingInterval};
use serde::{Deserialize, Serialize};

/// A bounded history request for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval: SamplingInterval,
}

impl HistoryRequest {
    pub fn new(
        symbol: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: SamplingInterval,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
            interval,
        }
    }

    /// Request covering `period` back from `now`.
    pub fn for_period(
        symbol: impl Into<String>,
        period: LookbackPeriod,
        interval: SamplingInterval,
        now: DateTime<Utc>,
    ) -> Self {
        let (start, end) = period.range_ending(now);
        Self::new(symbol, start, end, interval)
    }
}

/// Latest price figures for a symbol, independent of any history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub last_price: Option<f64>,
    /// Close of the previous trading session.
    pub previous_close: Option<f64>,
    pub currency: Option<String>,
}

#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Fetches bars in `[start, end]`. An unknown symbol is an empty series, not an error.
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceSeries>;

    /// Fetches the current quote, `None` for an unknown symbol.
    async fn fetch_quote(&self, symbol: &str) -> Result<Option<QuoteSnapshot>>;
}

/// Validates a ticker symbol before it is placed in a URL path.
///
/// Accepts the characters exchange symbols use, e.g. "^NSEI", "M&M.NS", "BAJAJ-AUTO.NS".
pub(crate) fn validate_symbol(symbol: &str) -> Result<&str> {
    use crate::error::ProviderError;

    if symbol.is_empty() {
        return Err(ProviderError::invalid_request("symbol cannot be empty"));
    }
    if symbol.contains("..") {
        return Err(ProviderError::invalid_request(format!(
            "invalid symbol: contains forbidden characters: {symbol}"
        )));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '^' | '.' | '-' | '_' | '=' | '&'))
    {
        return Err(ProviderError::invalid_request(format!(
            "invalid symbol: unexpected characters: {symbol}"
        )));
    }
    if symbol.len() > 32 {
        return Err(ProviderError::invalid_request(format!(
            "invalid symbol: exceeds maximum length of 32: {}",
            symbol.len()
        )));
    }
    Ok(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_symbol() {
        assert!(validate_symbol("^NSEI").is_ok());
        assert!(validate_symbol("M&M.NS").is_ok());
        assert!(validate_symbol("BAJAJ-AUTO.NS").is_ok());
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("../etc").is_err());
        assert!(validate_symbol("TCS NS").is_err());
        assert!(validate_symbol("A/B").is_err());
    }

    #[test]
    fn test_request_for_period() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let request =
            HistoryRequest::for_period("TCS.NS", LookbackPeriod::ThreeMonths, SamplingInterval::OneDay, now);

        assert_eq!(request.end, now);
        assert_eq!(request.start, Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap());
    }
}
