//! Single-symbol history: metrics, moving averages and CSV export.

use super::{lookback, periods_per_year};
use crate::render;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Args;
use market_pulse_analytics::{moving_average, ChangeReference, MovingAverageKind, SummaryMetrics};
use market_pulse_core::AppConfig;
use market_pulse_data::{
    CsvExporter, IndicatorColumn, IndicatorSeries, LookbackPeriod, PriceSeries, SamplingInterval,
};
use market_pulse_providers::{FetchOutcome, HistoryRequest, MarketDataService};
use std::path::{Path, PathBuf};

/// Which bars to fetch: a lookback period or an explicit date range.
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Lookback (5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, ytd, max)
    #[arg(long, conflicts_with = "start")]
    pub period: Option<String>,

    /// First date of an explicit range (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last date of the range, inclusive (defaults to now)
    #[arg(long, requires = "start")]
    pub end: Option<NaiveDate>,

    /// Bar interval (1m, 5m, 15m, 1h, 1d, 1wk, 1mo, ...)
    #[arg(long, default_value = "1d")]
    pub interval: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    Period(LookbackPeriod),
    Range { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl WindowArgs {
    fn resolve(&self, default_period: &str, now: DateTime<Utc>) -> Result<Window> {
        let Some(start) = self.start else {
            return Ok(Window::Period(lookback(self.period.as_deref(), default_period)?));
        };

        let start = start.and_time(NaiveTime::MIN).and_utc();
        let end = match self.end {
            Some(end) => end
                .succ_opt()
                .context("--end is out of range")?
                .and_time(NaiveTime::MIN)
                .and_utc(),
            None => now,
        };
        if end <= start {
            bail!("--end must not be before --start");
        }
        Ok(Window::Range { start, end })
    }
}

#[derive(Args, Debug, Clone)]
pub struct StockArgs {
    /// Yahoo symbol, e.g. RELIANCE.NS or ^NSEI
    pub symbol: String,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Simple moving average window (defaults to analytics.sma_window)
    #[arg(long)]
    pub sma: Option<usize>,

    /// Exponential moving average window (defaults to analytics.ema_window)
    #[arg(long)]
    pub ema: Option<usize>,

    /// Recent bars to print
    #[arg(long, default_value = "10")]
    pub rows: usize,

    /// Also write the series and both averages to this CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Yahoo symbol, e.g. RELIANCE.NS or ^NSEI
    pub symbol: String,

    /// Output CSV file path
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub window: WindowArgs,

    /// SMA windows to add as columns (repeatable)
    #[arg(long = "sma")]
    pub sma: Vec<usize>,

    /// EMA windows to add as columns (repeatable)
    #[arg(long = "ema")]
    pub ema: Vec<usize>,
}

/// A labelled moving average over a series' closes.
struct Average {
    label: String,
    values: IndicatorSeries,
}

fn averages(series: &PriceSeries, specs: &[(MovingAverageKind, usize)]) -> Result<Vec<Average>> {
    let closes = series.closes();
    specs
        .iter()
        .map(|&(kind, window)| {
            let values = moving_average(&closes, window, kind)
                .with_context(|| format!("invalid {} window", kind.label(window)))?;
            Ok(Average {
                label: kind.label(window),
                values,
            })
        })
        .collect()
}

fn export(path: &Path, series: &PriceSeries, averages: &[Average]) -> Result<()> {
    let columns: Vec<IndicatorColumn<'_>> = averages
        .iter()
        .map(|a| IndicatorColumn::new(&a.label, &a.values))
        .collect();
    CsvExporter::write_to_path(path, series, &columns)
        .with_context(|| format!("failed to export {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = series.len(), "exported CSV");
    Ok(())
}

/// Fetches history, printing a notice and returning `None` when there is none.
async fn history(
    service: &MarketDataService,
    symbol: &str,
    window: &WindowArgs,
    config: &AppConfig,
) -> Result<Option<(PriceSeries, SamplingInterval)>> {
    let interval: SamplingInterval = window.interval.parse()?;

    let outcome = match window.resolve(&config.dashboard.period, Utc::now())? {
        Window::Period(period) => service.price_history(symbol, period, interval).await,
        Window::Range { start, end } => {
            let request = HistoryRequest::new(symbol, start, end, interval);
            service.price_range(&request).await
        }
    };
    if let Some(line) = render::notice(symbol, &outcome) {
        println!("{line}");
    }
    Ok(outcome.into_data().map(|series| (series, interval)))
}

#[allow(clippy::cast_precision_loss)]
pub async fn run_stock(service: &MarketDataService, config: &AppConfig, args: StockArgs) -> Result<()> {
    let Some((series, interval)) = history(service, &args.symbol, &args.window, config).await? else {
        return Ok(());
    };

    let sma_window = args.sma.unwrap_or(config.analytics.sma_window);
    let ema_window = args.ema.unwrap_or(config.analytics.ema_window);
    let averages = averages(
        &series,
        &[
            (MovingAverageKind::Simple, sma_window),
            (MovingAverageKind::Exponential, ema_window),
        ],
    )?;

    let reference = match service.quote(&args.symbol).await {
        FetchOutcome::Data(quote) => quote
            .previous_close
            .map_or(ChangeReference::PreviousBar, ChangeReference::PriorClose),
        _ => ChangeReference::PreviousBar,
    };
    let metrics = SummaryMetrics::compute(
        &series,
        periods_per_year(&config.analytics, interval),
        reference,
    );

    render::banner(&format!("{} ({} bars, {interval})", series.symbol(), series.len()));
    let lines = [
        ("Last close", render::price(metrics.last_close)),
        ("Change", render::change(metrics.last_change)),
        ("Period return", render::pct(metrics.period_return_pct)),
        ("Volatility (ann.)", render::pct(metrics.annualized_volatility_pct)),
        ("Avg volume", render::volume(metrics.average_volume)),
    ];
    for (label, value) in lines {
        println!("{label:<18} {value}");
    }

    render::section("RECENT BARS");
    print!("{:<17} {:>10} {:>10} {:>10} {:>10} {:>9}", "Time", "Open", "High", "Low", "Close", "Volume");
    for average in &averages {
        print!(" {:>10}", average.label);
    }
    println!();

    let skip = series.len().saturating_sub(args.rows);
    for (i, bar) in series.bars().iter().enumerate().skip(skip) {
        print!(
            "{:<17} {:>10} {:>10} {:>10} {:>10} {:>9}",
            bar.timestamp.format("%Y-%m-%d %H:%M"),
            render::price(Some(bar.open)),
            render::price(Some(bar.high)),
            render::price(Some(bar.low)),
            render::price(Some(bar.close)),
            render::volume(Some(bar.volume as f64)),
        );
        for average in &averages {
            print!(" {:>10}", render::price(average.values.values()[i]));
        }
        println!();
    }

    if let Some(path) = &args.export {
        export(path, &series, &averages)?;
        println!("\nWrote {}", path.display());
    }
    Ok(())
}

pub async fn run_export(service: &MarketDataService, config: &AppConfig, args: ExportArgs) -> Result<()> {
    let Some((series, _)) = history(service, &args.symbol, &args.window, config).await? else {
        return Ok(());
    };

    let specs: Vec<(MovingAverageKind, usize)> = args
        .sma
        .iter()
        .map(|&w| (MovingAverageKind::Simple, w))
        .chain(args.ema.iter().map(|&w| (MovingAverageKind::Exponential, w)))
        .collect();
    let averages = averages(&series, &specs)?;

    export(&args.output, &series, &averages)?;
    println!("Wrote {} rows to {}", series.len(), args.output.display());
    Ok(())
}
