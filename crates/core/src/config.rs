use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level application configuration.
///
/// Every section falls back to its `Default`, so a partial `Config.toml`
/// (or none at all) is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub prices: PriceSourceConfig,
    pub news: NewsConfig,
    pub snapshot: SnapshotConfig,
    pub dashboard: DashboardConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout. Upstream calls fail fast into an empty outcome.
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            requests_per_minute: 60,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Time-to-live for each cached upstream response family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub price_ttl_secs: u64,
    pub news_ttl_secs: u64,
    pub snapshot_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            price_ttl_secs: 1800,
            news_ttl_secs: 300,
            snapshot_ttl_secs: 1800,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn price_ttl(&self) -> Duration {
        Duration::from_secs(self.price_ttl_secs)
    }

    #[must_use]
    pub fn news_ttl(&self) -> Duration {
        Duration::from_secs(self.news_ttl_secs)
    }

    #[must_use]
    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.snapshot_ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSourceConfig {
    pub base_url: String,
}

impl Default for PriceSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub country: String,
    pub category: String,
    pub max_articles: usize,
    pub primary: NewsProviderConfig,
    pub fallback: NewsProviderConfig,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            country: "in".to_string(),
            category: "business".to_string(),
            max_articles: 8,
            primary: NewsProviderConfig::new("https://newsapi.org/v2"),
            fallback: NewsProviderConfig::new("https://gnews.io/api/v4"),
        }
    }
}

/// Endpoint and credentials for one headline provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct NewsProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl NewsProviderConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl std::fmt::Debug for NewsProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub base_url: String,
    pub index: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nseindia.com/api".to_string(),
            index: "NIFTY 500".to_string(),
        }
    }
}

/// A headline index shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTicker {
    pub name: String,
    pub symbol: String,
}

impl IndexTicker {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub indices: Vec<IndexTicker>,
    /// Lookback period code for the index panels (e.g. "1mo").
    pub period: String,
    /// Number of constituent rows shown in the snapshot table.
    pub snapshot_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            indices: vec![
                IndexTicker::new("NIFTY 50", "^NSEI"),
                IndexTicker::new("SENSEX", "^BSESN"),
            ],
            period: "1mo".to_string(),
            snapshot_rows: 30,
        }
    }
}

/// Polarity backend used for headline sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentAnalyzerKind {
    #[default]
    Vader,
    Lexicon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Overrides the interval-derived annualization factor when set.
    pub periods_per_year: Option<u32>,
    pub sma_window: usize,
    pub ema_window: usize,
    pub sentiment_analyzer: SentimentAnalyzerKind,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: None,
            sma_window: 20,
            ema_window: 20,
            sentiment_analyzer: SentimentAnalyzerKind::Vader,
        }
    }
}
