pub mod cache;
pub mod config;
pub mod config_loader;
pub mod session;

pub use cache::{CacheKey, TtlCache};
pub use config::{
    AnalyticsConfig, AppConfig, CacheConfig, DashboardConfig, HttpConfig, IndexTicker,
    NewsConfig, NewsProviderConfig, PriceSourceConfig, SentimentAnalyzerKind, SnapshotConfig,
};
pub use config_loader::ConfigLoader;
pub use session::{
    AlertCondition, PriceAlert, SessionError, SessionId, SessionState, SessionStore, TradeEntry,
    TradeSide,
};
