//! Dashboard command.
//!
//! Prints three panels: index summaries, the constituent snapshot and the
//! latest headlines with sentiment. A panel whose source is empty or down
//! prints one notice line; the other panels still render.

use super::{lookback, periods_per_year, sentiment_scorer};
use crate::render;
use anyhow::Result;
use clap::Args;
use market_pulse_analytics::{ChangeReference, SentimentSummary, SummaryMetrics};
use market_pulse_core::{AppConfig, IndexTicker};
use market_pulse_data::{LookbackPeriod, SamplingInterval};
use market_pulse_providers::{FetchOutcome, MarketDataService, NewsRequest};

#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Lookback for the index panel (5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, ytd, max)
    #[arg(long)]
    pub period: Option<String>,

    /// Constituent rows to show (defaults to dashboard.snapshot_rows)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Skip the headlines panel
    #[arg(long)]
    pub no_news: bool,
}

pub async fn run_dashboard(
    service: &MarketDataService,
    config: &AppConfig,
    args: DashboardArgs,
) -> Result<()> {
    let period = lookback(args.period.as_deref(), &config.dashboard.period)?;
    tracing::info!(period = %period, indices = config.dashboard.indices.len(), "rendering dashboard");

    render::banner(&format!("MARKET PULSE ({period})"));

    render::section("INDICES");
    println!(
        "{:<12} {:>12} {:>20} {:>12} {:>12}",
        "Index", "Last", "Change", "Return", "Volatility"
    );
    for ticker in &config.dashboard.indices {
        index_row(service, config, ticker, period).await;
    }

    let rows = args.rows.unwrap_or(config.dashboard.snapshot_rows);
    snapshot_panel(service, &config.snapshot.index, rows).await;

    if !args.no_news {
        news_panel(service, config, &NewsRequest::from(&config.news)).await;
    }
    println!();
    Ok(())
}

async fn index_row(
    service: &MarketDataService,
    config: &AppConfig,
    ticker: &IndexTicker,
    period: LookbackPeriod,
) {
    let interval = SamplingInterval::OneDay;
    let history = service.price_history(&ticker.symbol, period, interval).await;
    let FetchOutcome::Data(series) = &history else {
        if let Some(line) = render::notice(&ticker.name, &history) {
            println!("{line}");
        }
        return;
    };

    // Prefer the quote's previous session close; fall back to the prior bar.
    let reference = service
        .quote(&ticker.symbol)
        .await
        .data()
        .and_then(|q| q.previous_close)
        .map_or(ChangeReference::PreviousBar, ChangeReference::PriorClose);

    let metrics = SummaryMetrics::compute(
        series,
        periods_per_year(&config.analytics, interval),
        reference,
    );
    println!(
        "{:<12} {:>12} {:>20} {:>12} {:>12}",
        ticker.name,
        render::price(metrics.last_close),
        render::change(metrics.last_change),
        render::pct(metrics.period_return_pct),
        render::pct(metrics.annualized_volatility_pct),
    );
}

async fn snapshot_panel(service: &MarketDataService, index: &str, rows: usize) {
    render::section(&format!("{index} SNAPSHOT"));
    let outcome = service.index_snapshot(index).await;
    let FetchOutcome::Data(constituents) = &outcome else {
        if let Some(line) = render::notice("Snapshot", &outcome) {
            println!("{line}");
        }
        return;
    };

    println!("{:<16} {:>12} {:>10}", "Symbol", "Last", "Change");
    for row in constituents.iter().take(rows) {
        println!(
            "{:<16} {:>12} {:>10}",
            row.symbol,
            render::price(row.last_price),
            render::pct(row.pct_change)
        );
    }
    if constituents.len() > rows {
        println!("  ... {} more", constituents.len() - rows);
    }
}

async fn news_panel(service: &MarketDataService, config: &AppConfig, request: &NewsRequest) {
    render::section("HEADLINES");
    let outcome = service.headlines(request).await;
    let FetchOutcome::Data(items) = &outcome else {
        if let Some(line) = render::notice("News", &outcome) {
            println!("{line}");
        }
        return;
    };

    let scorer = sentiment_scorer(&config.analytics);
    let scored = scorer.score_headlines(items);
    for headline in &scored {
        println!(
            "{:<9} {}",
            headline.sentiment.label.as_str(),
            render::truncate(&headline.item.title, render::WIDTH - 10)
        );
    }

    let summary = SentimentSummary::from_scores(scored.iter().map(|h| &h.sentiment));
    if let Some(overall) = summary.overall() {
        println!(
            "\nOverall: {overall} ({} positive, {} neutral, {} negative)",
            summary.positive, summary.neutral, summary.negative
        );
    }
}
