//! Upstream market data sources and the cached fetch service.
//!
//! # Sources
//!
//! - [`YahooChartClient`]: OHLCV history and quote snapshots
//! - [`NewsApiClient`] with [`GNewsClient`] as fallback: business headlines
//! - [`NseIndexClient`]: index constituent snapshots
//!
//! Each source is rate limited through a shared [`HttpClient`]. Callers
//! normally go through [`MarketDataService`], which caches responses and
//! turns every source error into a [`FetchOutcome::Failed`].
//!
//! # Example
//!
//! ```no_run
//! use market_pulse_core::ConfigLoader;
//! use market_pulse_data::{LookbackPeriod, SamplingInterval};
//! use market_pulse_providers::MarketDataService;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ConfigLoader::load()?;
//! let service = MarketDataService::from_config(&config)?;
//!
//! let history = service
//!     .price_history("^NSEI", LookbackPeriod::OneMonth, SamplingInterval::OneDay)
//!     .await;
//! if let Some(series) = history.data() {
//!     println!("{} bars", series.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod news;
pub mod outcome;
pub mod prices;
pub mod service;
pub mod snapshot;

pub use error::{ProviderError, Result};
pub use http::HttpClient;
pub use news::{FallbackNewsSource, GNewsClient, NewsApiClient, NewsProvider, NewsRequest};
pub use outcome::{FetchFailure, FetchOutcome};
pub use prices::{HistoryRequest, PriceHistorySource, QuoteSnapshot, YahooChartClient};
pub use service::MarketDataService;
pub use snapshot::{IndexSnapshotSource, NseIndexClient};
