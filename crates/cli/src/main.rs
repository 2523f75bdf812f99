use clap::{Parser, Subcommand};
use market_pulse_core::ConfigLoader;
use market_pulse_providers::MarketDataService;

mod commands;
mod render;

use commands::{
    DashboardArgs, ExportArgs, MoversArgs, NewsArgs, SentimentArgs, StockArgs, WatchArgs,
};

#[derive(Parser)]
#[command(name = "market-pulse")]
#[command(about = "Indian market dashboard: indices, stocks, top movers and business news", long_about = None)]
struct Cli {
    /// Config profile layered over config/Config.toml (reads config/Config.<profile>.toml)
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index summaries, constituent snapshot and latest headlines
    Dashboard(DashboardArgs),
    /// Price history, indicators and summary metrics for one symbol
    Stock(StockArgs),
    /// Write a symbol's price history and indicator columns to CSV
    Export(ExportArgs),
    /// Top gainers and losers of an index
    Movers(MoversArgs),
    /// Latest business headlines
    News(NewsArgs),
    /// Score free text, or the latest headlines when no text is given
    Sentiment(SentimentArgs),
    /// Interactive watchlist, price alerts and trade log for this session
    Watch(WatchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.profile.as_deref() {
        Some(profile) => ConfigLoader::load_with_profile(profile)?,
        None => ConfigLoader::load()?,
    };
    let service = MarketDataService::from_config(&config)?;

    match cli.command {
        Commands::Dashboard(args) => commands::run_dashboard(&service, &config, args).await?,
        Commands::Stock(args) => commands::run_stock(&service, &config, args).await?,
        Commands::Export(args) => commands::run_export(&service, &config, args).await?,
        Commands::Movers(args) => commands::run_movers(&service, &config, args).await?,
        Commands::News(args) => commands::run_news(&service, &config, args).await?,
        Commands::Sentiment(args) => commands::run_sentiment(&service, &config, args).await?,
        Commands::Watch(args) => commands::run_watch(&service, args).await?,
    }

    Ok(())
}
