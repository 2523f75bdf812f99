//! CLI commands for the market dashboard.

pub mod dashboard;
pub mod movers;
pub mod news;
pub mod stock;
pub mod watch;

pub use dashboard::{run_dashboard, DashboardArgs};
pub use movers::{run_movers, MoversArgs};
pub use news::{run_news, run_sentiment, NewsArgs, SentimentArgs};
pub use stock::{run_export, run_stock, ExportArgs, StockArgs};
pub use watch::{run_watch, WatchArgs};

use market_pulse_analytics::{LexiconPolarity, PolarityAnalyzer, SentimentScorer, VaderPolarity};
use market_pulse_core::{AnalyticsConfig, SentimentAnalyzerKind};
use market_pulse_data::{LookbackPeriod, SamplingInterval};
use std::num::NonZeroU32;

/// Volatility scaling: the configured override, else the interval's default.
pub(crate) fn periods_per_year(config: &AnalyticsConfig, interval: SamplingInterval) -> NonZeroU32 {
    config
        .periods_per_year
        .and_then(NonZeroU32::new)
        .unwrap_or_else(|| interval.periods_per_year())
}

/// Headline scorer backed by the configured polarity analyzer.
pub(crate) fn sentiment_scorer(config: &AnalyticsConfig) -> SentimentScorer<Box<dyn PolarityAnalyzer>> {
    let analyzer: Box<dyn PolarityAnalyzer> = match config.sentiment_analyzer {
        SentimentAnalyzerKind::Vader => Box::new(VaderPolarity::new()),
        SentimentAnalyzerKind::Lexicon => Box::new(LexiconPolarity::new()),
    };
    SentimentScorer::new(analyzer)
}

/// Parses a `--period` flag, falling back to the configured default.
pub(crate) fn lookback(flag: Option<&str>, default: &str) -> anyhow::Result<LookbackPeriod> {
    Ok(flag.unwrap_or(default).parse()?)
}
