//! Pure analytics over fetched market data.
//!
//! - [`indicators`]: moving averages, period return, volatility, volume, price change
//! - [`metrics`]: the summary figures shown beside a chart
//! - [`sentiment`]: headline polarity and labels
//! - [`movers`]: top gainers and losers of an index snapshot

pub mod indicators;
pub mod metrics;
pub mod movers;
pub mod sentiment;

pub use indicators::{
    annualized_volatility, average_volume, change_from_previous_bar, change_from_reference, ema,
    moving_average, period_return, sma, IndicatorError, MovingAverageKind, PriceChange,
};
pub use metrics::{ChangeReference, SummaryMetrics};
pub use movers::{rank_movers, Movers};
pub use sentiment::{
    LexiconPolarity, PolarityAnalyzer, ScoredHeadline, SentimentError, SentimentLabel,
    SentimentResult, SentimentScorer, SentimentSummary, VaderPolarity,
};
