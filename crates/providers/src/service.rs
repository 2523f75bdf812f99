//! Cached fetch wrapper over all upstream sources.
//!
//! Every public operation consults a TTL cache keyed by operation name and
//! parameters before calling its source. Source errors are logged and
//! returned as [`FetchOutcome::Failed`]; they are never cached, so the next
//! call retries. Confirmed-empty answers are cached like data.

use crate::error::Result;
use crate::http::HttpClient;
use crate::news::{FallbackNewsSource, GNewsClient, NewsApiClient, NewsRequest};
use crate::outcome::FetchOutcome;
use crate::prices::{HistoryRequest, PriceHistorySource, QuoteSnapshot, YahooChartClient};
use crate::snapshot::{IndexSnapshotSource, NseIndexClient};
use chrono::Utc;
use market_pulse_core::{AppConfig, CacheConfig, CacheKey, TtlCache};
use market_pulse_data::{IndexConstituent, LookbackPeriod, NewsItem, PriceSeries, SamplingInterval};
use std::future::Future;
use std::sync::Arc;

pub struct MarketDataService {
    prices: Arc<dyn PriceHistorySource>,
    news: FallbackNewsSource,
    snapshots: Arc<dyn IndexSnapshotSource>,
    history_cache: TtlCache<FetchOutcome<PriceSeries>>,
    quote_cache: TtlCache<FetchOutcome<QuoteSnapshot>>,
    news_cache: TtlCache<FetchOutcome<Vec<NewsItem>>>,
    snapshot_cache: TtlCache<FetchOutcome<Vec<IndexConstituent>>>,
}

impl std::fmt::Debug for MarketDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataService")
            .field("prices", &self.prices.name())
            .field("news", &self.news)
            .field("snapshots", &self.snapshots.name())
            .finish_non_exhaustive()
    }
}

impl MarketDataService {
    pub fn new(
        prices: Arc<dyn PriceHistorySource>,
        news: FallbackNewsSource,
        snapshots: Arc<dyn IndexSnapshotSource>,
        cache: &CacheConfig,
    ) -> Self {
        Self {
            prices,
            news,
            snapshots,
            history_cache: TtlCache::new(cache.price_ttl()),
            quote_cache: TtlCache::new(cache.price_ttl()),
            news_cache: TtlCache::new(cache.news_ttl()),
            snapshot_cache: TtlCache::new(cache.snapshot_ttl()),
        }
    }

    /// Wires the production sources from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = HttpClient::new(&config.http)?;

        let prices = Arc::new(YahooChartClient::new(http.clone(), &config.prices));
        let news = FallbackNewsSource::with_fallback(
            NewsApiClient::new(http.clone(), &config.news.primary),
            GNewsClient::new(http.clone(), &config.news.fallback),
        );
        let snapshots = Arc::new(NseIndexClient::new(http, &config.snapshot));

        tracing::info!(
            news = ?news,
            price_ttl_secs = config.cache.price_ttl_secs,
            news_ttl_secs = config.cache.news_ttl_secs,
            "market data service ready"
        );
        Ok(Self::new(prices, news, snapshots, &config.cache))
    }

    /// History for `symbol` covering `period` back from now.
    ///
    /// Session-counted periods such as `5d` keep only the last N trading dates.
    pub async fn price_history(
        &self,
        symbol: &str,
        period: LookbackPeriod,
        interval: SamplingInterval,
    ) -> FetchOutcome<PriceSeries> {
        let key = CacheKey::new("price_history", &[symbol, period.as_str(), interval.as_str()]);
        let request = HistoryRequest::for_period(symbol, period, interval, Utc::now());
        cached(&self.history_cache, key, || async {
            let outcome = self.fetch_history(request).await;
            match period.trading_sessions() {
                Some(sessions) => outcome.map(|series| series.last_sessions(sessions)),
                None => outcome,
            }
        })
        .await
    }

    /// History for an explicit date range.
    pub async fn price_range(&self, request: &HistoryRequest) -> FetchOutcome<PriceSeries> {
        let start = request.start.timestamp().to_string();
        let end = request.end.timestamp().to_string();
        let key = CacheKey::new(
            "price_range",
            &[request.symbol.as_str(), &start, &end, request.interval.as_str()],
        );
        cached(&self.history_cache, key, || self.fetch_history(request.clone())).await
    }

    pub async fn quote(&self, symbol: &str) -> FetchOutcome<QuoteSnapshot> {
        let key = CacheKey::new("quote", &[symbol]);
        cached(&self.quote_cache, key, || async {
            match self.prices.fetch_quote(symbol).await {
                Ok(Some(quote)) => FetchOutcome::Data(quote),
                Ok(None) => FetchOutcome::Empty,
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "quote fetch failed");
                    FetchOutcome::failed(self.prices.name(), e.to_string())
                }
            }
        })
        .await
    }

    pub async fn headlines(&self, request: &NewsRequest) -> FetchOutcome<Vec<NewsItem>> {
        let max = request.max_articles.to_string();
        let key = CacheKey::new("headlines", &[request.category.as_str(), request.country.as_str(), &max]);
        cached(&self.news_cache, key, || self.news.fetch(request)).await
    }

    pub async fn index_snapshot(&self, index: &str) -> FetchOutcome<Vec<IndexConstituent>> {
        let key = CacheKey::new("index_snapshot", &[index]);
        cached(&self.snapshot_cache, key, || async {
            match self.snapshots.fetch_constituents(index).await {
                Ok(rows) if rows.is_empty() => FetchOutcome::Empty,
                Ok(rows) => FetchOutcome::Data(rows),
                Err(e) => {
                    tracing::warn!(index, error = %e, "index snapshot fetch failed");
                    FetchOutcome::failed(self.snapshots.name(), e.to_string())
                }
            }
        })
        .await
    }

    /// Drops every cached response.
    pub fn clear_caches(&self) {
        self.history_cache.clear();
        self.quote_cache.clear();
        self.news_cache.clear();
        self.snapshot_cache.clear();
    }

    async fn fetch_history(&self, request: HistoryRequest) -> FetchOutcome<PriceSeries> {
        match self.prices.fetch_history(&request).await {
            Ok(series) if series.is_empty() => FetchOutcome::Empty,
            Ok(series) => FetchOutcome::Data(series),
            Err(e) => {
                tracing::warn!(symbol = %request.symbol, error = %e, "price history fetch failed");
                FetchOutcome::failed(self.prices.name(), e.to_string())
            }
        }
    }
}

async fn cached<T, F, Fut>(
    cache: &TtlCache<FetchOutcome<T>>,
    key: CacheKey,
    fetch: F,
) -> FetchOutcome<T>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = FetchOutcome<T>>,
{
    if let Some(hit) = cache.get(&key) {
        return hit;
    }
    tracing::debug!(%key, "cache miss");

    let outcome = fetch().await;
    if !outcome.is_failed() {
        cache.insert(key, outcome.clone());
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use market_pulse_data::Bar;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves queued responses and counts calls.
    #[derive(Default)]
    struct StubPrices {
        responses: Mutex<Vec<crate::error::Result<PriceSeries>>>,
        calls: AtomicUsize,
    }

    impl StubPrices {
        fn push(&self, response: crate::error::Result<PriceSeries>) {
            self.responses.lock().unwrap().insert(0, response);
        }
    }

    #[async_trait]
    impl PriceHistorySource for StubPrices {
        fn name(&self) -> &'static str {
            "stub-prices"
        }

        async fn fetch_history(&self, request: &HistoryRequest) -> crate::error::Result<PriceSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(PriceSeries::empty(&request.symbol, request.interval)))
        }

        async fn fetch_quote(&self, symbol: &str) -> crate::error::Result<Option<QuoteSnapshot>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(QuoteSnapshot {
                symbol: symbol.to_string(),
                last_price: Some(101.0),
                previous_close: Some(100.0),
                currency: Some("INR".to_string()),
            }))
        }
    }

    struct StubSnapshots;

    #[async_trait]
    impl IndexSnapshotSource for StubSnapshots {
        fn name(&self) -> &'static str {
            "stub-snapshots"
        }

        async fn fetch_constituents(&self, _index: &str) -> crate::error::Result<Vec<IndexConstituent>> {
            Err(ProviderError::Timeout("snapshot timed out".to_string()))
        }
    }

    fn series(symbol: &str) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = (0..3)
            .map(|i| Bar::new(start + Duration::days(i), 10.0, 10.0, 10.0, 10.0, 1))
            .collect();
        PriceSeries::new(symbol, SamplingInterval::OneDay, bars)
    }

    fn service(prices: Arc<StubPrices>) -> MarketDataService {
        MarketDataService::new(
            prices,
            FallbackNewsSource::new(Vec::new()),
            Arc::new(StubSnapshots),
            &CacheConfig::default(),
        )
    }

    // ========== Cache Behaviour Tests ==========

    #[tokio::test]
    async fn test_data_is_cached() {
        let prices = Arc::new(StubPrices::default());
        prices.push(Ok(series("TCS.NS")));
        let service = service(prices.clone());

        let first = service
            .price_history("TCS.NS", LookbackPeriod::OneMonth, SamplingInterval::OneDay)
            .await;
        let second = service
            .price_history("TCS.NS", LookbackPeriod::OneMonth, SamplingInterval::OneDay)
            .await;

        assert!(first.is_data());
        assert_eq!(first, second);
        assert_eq!(prices.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_params_are_separate_entries() {
        let prices = Arc::new(StubPrices::default());
        prices.push(Ok(series("TCS.NS")));
        prices.push(Ok(series("TCS.NS")));
        let service = service(prices.clone());

        service
            .price_history("TCS.NS", LookbackPeriod::OneMonth, SamplingInterval::OneDay)
            .await;
        service
            .price_history("TCS.NS", LookbackPeriod::OneYear, SamplingInterval::OneDay)
            .await;

        assert_eq!(prices.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let prices = Arc::new(StubPrices::default());
        prices.push(Err(ProviderError::api(503, "unavailable")));
        prices.push(Ok(series("INFY.NS")));
        let service = service(prices.clone());

        let first = service
            .price_history("INFY.NS", LookbackPeriod::FiveDays, SamplingInterval::OneDay)
            .await;
        let second = service
            .price_history("INFY.NS", LookbackPeriod::FiveDays, SamplingInterval::OneDay)
            .await;

        assert_eq!(first.failure().map(|f| f.source), Some("stub-prices"));
        assert!(second.is_data());
        assert_eq!(prices.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_is_cached() {
        let prices = Arc::new(StubPrices::default());
        let service = service(prices.clone());

        let first = service
            .price_history("NOPE.NS", LookbackPeriod::OneMonth, SamplingInterval::OneDay)
            .await;
        let second = service
            .price_history("NOPE.NS", LookbackPeriod::OneMonth, SamplingInterval::OneDay)
            .await;

        assert!(first.is_empty());
        assert!(second.is_empty());
        assert_eq!(prices.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_caches_forces_refetch() {
        let prices = Arc::new(StubPrices::default());
        let service = service(prices.clone());

        service.quote("TCS.NS").await;
        service.clear_caches();
        let quote = service.quote("TCS.NS").await;

        assert_eq!(quote.data().and_then(|q| q.previous_close), Some(100.0));
        assert_eq!(prices.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_five_day_period_keeps_five_sessions() {
        // Two trading weeks with the weekend in between.
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 3, 45, 0).unwrap();
        let bars = [0, 1, 2, 3, 4, 7, 8, 9, 10, 11]
            .iter()
            .map(|&d| {
                let close = 100.0 + d as f64;
                Bar::new(start + Duration::days(d), close, close, close, close, 10)
            })
            .collect();
        let prices = Arc::new(StubPrices::default());
        prices.push(Ok(PriceSeries::new("TCS.NS", SamplingInterval::OneDay, bars)));
        let service = service(prices);

        let series = service
            .price_history("TCS.NS", LookbackPeriod::FiveDays, SamplingInterval::OneDay)
            .await
            .into_data()
            .unwrap();

        assert_eq!(series.closes(), vec![107.0, 108.0, 109.0, 110.0, 111.0]);
    }

    #[tokio::test]
    async fn test_price_range_is_cached_by_bounds() {
        let prices = Arc::new(StubPrices::default());
        prices.push(Ok(series("TCS.NS")));
        prices.push(Ok(series("TCS.NS")));
        let service = service(prices.clone());
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let request = HistoryRequest::new("TCS.NS", start, start + Duration::days(10), SamplingInterval::OneDay);
        let wider = HistoryRequest::new("TCS.NS", start, start + Duration::days(20), SamplingInterval::OneDay);

        assert!(service.price_range(&request).await.is_data());
        assert!(service.price_range(&request).await.is_data());
        assert!(service.price_range(&wider).await.is_data());
        assert_eq!(prices.calls.load(Ordering::SeqCst), 2);
    }

    // ========== Failure Mapping Tests ==========

    #[tokio::test]
    async fn test_snapshot_error_becomes_failed_outcome() {
        let service = service(Arc::new(StubPrices::default()));

        let outcome = service.index_snapshot("NIFTY 500").await;

        let failure = outcome.failure().unwrap();
        assert_eq!(failure.source, "stub-snapshots");
        assert!(failure.reason.contains("timed out"));
    }

    #[tokio::test]
    async fn test_news_without_providers_is_failed() {
        let service = service(Arc::new(StubPrices::default()));

        let outcome = service
            .headlines(&NewsRequest::new("business", "in", 5))
            .await;

        assert!(outcome.is_failed());
    }
}
