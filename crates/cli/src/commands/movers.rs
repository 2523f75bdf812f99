use crate::render;
use anyhow::Result;
use clap::Args;
use market_pulse_analytics::rank_movers;
use market_pulse_core::AppConfig;
use market_pulse_data::IndexConstituent;
use market_pulse_providers::{FetchOutcome, MarketDataService};

#[derive(Args, Debug, Clone)]
pub struct MoversArgs {
    /// Index to rank (defaults to snapshot.index)
    #[arg(long)]
    pub index: Option<String>,

    /// Rows per list
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

pub async fn run_movers(service: &MarketDataService, config: &AppConfig, args: MoversArgs) -> Result<()> {
    let index = args.index.as_deref().unwrap_or(&config.snapshot.index);
    let outcome = service.index_snapshot(index).await;
    let FetchOutcome::Data(constituents) = &outcome else {
        if let Some(line) = render::notice("Top movers", &outcome) {
            println!("{line}");
        }
        return Ok(());
    };

    let movers = rank_movers(constituents, args.limit);
    render::banner(&format!("TOP MOVERS: {index}"));
    print_table("TOP GAINERS", &movers.gainers);
    print_table("TOP LOSERS", &movers.losers);
    println!();
    Ok(())
}

fn print_table(title: &str, rows: &[IndexConstituent]) {
    render::section(title);
    println!("{:>3}  {:<16} {:>12} {:>10}", "#", "Symbol", "Last", "Change");
    for (rank, row) in rows.iter().enumerate() {
        println!(
            "{:>3}  {:<16} {:>12} {:>10}",
            rank + 1,
            row.symbol,
            render::price(row.last_price),
            render::pct(row.pct_change)
        );
    }
}
