//! Headlines and sentiment commands.

use super::sentiment_scorer;
use crate::render;
use anyhow::Result;
use clap::Args;
use market_pulse_analytics::SentimentSummary;
use market_pulse_core::AppConfig;
use market_pulse_providers::{FetchOutcome, MarketDataService, NewsRequest};

#[derive(Args, Debug, Clone)]
pub struct NewsArgs {
    /// Number of headlines (defaults to news.max_articles)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Headline category (defaults to news.category)
    #[arg(long)]
    pub category: Option<String>,

    /// Two-letter country code (defaults to news.country)
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SentimentArgs {
    /// Text to score; the latest headlines are scored when omitted
    #[arg(trailing_var_arg = true)]
    pub text: Vec<String>,

    /// Number of headlines to score
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
}

fn request(config: &AppConfig, count: Option<usize>) -> NewsRequest {
    let mut request = NewsRequest::from(&config.news);
    if let Some(count) = count {
        request.max_articles = count;
    }
    request
}

pub async fn run_news(service: &MarketDataService, config: &AppConfig, args: NewsArgs) -> Result<()> {
    let mut request = request(config, args.count);
    if let Some(category) = args.category {
        request.category = category;
    }
    if let Some(country) = args.country {
        request.country = country;
    }

    let outcome = service.headlines(&request).await;
    let FetchOutcome::Data(items) = &outcome else {
        if let Some(line) = render::notice("News", &outcome) {
            println!("{line}");
        }
        return Ok(());
    };

    render::banner(&format!(
        "{} HEADLINES ({})",
        request.category.to_uppercase(),
        request.country.to_uppercase()
    ));
    for item in items {
        println!();
        println!("{}", item.title);
        let published = item.published_display().unwrap_or_else(|| "-".to_string());
        println!("  {} | {}", item.source_name, published);
        if let Some(description) = &item.description {
            println!("  {}", render::truncate(description, render::WIDTH - 2));
        }
        println!("  {}", item.url);
    }
    println!();
    Ok(())
}

pub async fn run_sentiment(
    service: &MarketDataService,
    config: &AppConfig,
    args: SentimentArgs,
) -> Result<()> {
    let scorer = sentiment_scorer(&config.analytics);

    if !args.text.is_empty() {
        let text = args.text.join(" ");
        let result = scorer.score_text(&text);
        println!("{} ({:+.3})", result.label, result.score);
        return Ok(());
    }

    let outcome = service.headlines(&request(config, args.count)).await;
    let FetchOutcome::Data(items) = &outcome else {
        if let Some(line) = render::notice("Sentiment", &outcome) {
            println!("{line}");
        }
        return Ok(());
    };

    let scored = scorer.score_headlines(items);
    render::banner("HEADLINE SENTIMENT");
    println!("{:<9} {:>7}  Headline", "Label", "Score");
    for headline in &scored {
        println!(
            "{:<9} {:>+7.3}  {}",
            headline.sentiment.label.as_str(),
            headline.sentiment.score,
            render::truncate(&headline.item.title, render::WIDTH - 19)
        );
    }

    let summary = SentimentSummary::from_scores(scored.iter().map(|h| &h.sentiment));
    render::section("SUMMARY");
    println!(
        "Positive: {}  Neutral: {}  Negative: {}",
        summary.positive, summary.neutral, summary.negative
    );
    if let (Some(mean), Some(overall)) = (summary.mean_score, summary.overall()) {
        println!("Mean score: {mean:+.3} ({overall})");
    }
    Ok(())
}
