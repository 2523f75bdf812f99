//! Interactive watch session.
//!
//! Opens one `SessionStore` session and reads commands from stdin until
//! `quit` or end of input. Watchlist, alerts and trades are discarded when
//! the session closes.

use crate::render;
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use market_pulse_analytics::change_from_reference;
use market_pulse_core::{AlertCondition, SessionError, SessionId, SessionStore, TradeSide};
use market_pulse_providers::{FetchOutcome, MarketDataService};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Symbols to start the watchlist with
    pub symbols: Vec<String>,
}

/// One line of input inside the session.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct WatchLine {
    #[command(subcommand)]
    command: WatchCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum WatchCommand {
    /// Add symbols to the watchlist
    Add {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Remove a symbol from the watchlist
    Remove { symbol: String },
    /// Show the watchlist
    List,
    /// Register a price alert, e.g. `alert TCS.NS above 4000`
    Alert {
        symbol: String,
        condition: ConditionArg,
        target: f64,
    },
    /// Show registered alerts
    Alerts,
    /// Log a buy, e.g. `buy INFY.NS 10 1500.5`
    Buy {
        symbol: String,
        quantity: u32,
        price: f64,
    },
    /// Log a sell
    Sell {
        symbol: String,
        quantity: u32,
        price: f64,
    },
    /// Show the trade log
    Trades,
    /// Fetch quotes for the watchlist and report triggered alerts
    Check,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ConditionArg {
    Above,
    Below,
}

impl From<ConditionArg> for AlertCondition {
    fn from(arg: ConditionArg) -> Self {
        match arg {
            ConditionArg::Above => Self::Above,
            ConditionArg::Below => Self::Below,
        }
    }
}

fn parse_line(line: &str) -> Result<WatchCommand, clap::Error> {
    WatchLine::try_parse_from(line.split_whitespace()).map(|l| l.command)
}

/// Runs every command that only touches the session store. Returns the
/// lines to print, or `None` for commands that need the network.
fn apply(
    store: &SessionStore,
    session: SessionId,
    command: &WatchCommand,
) -> Result<Option<Vec<String>>, SessionError> {
    let lines = match command {
        WatchCommand::Add { symbols } => {
            let mut lines = Vec::with_capacity(symbols.len());
            for symbol in symbols {
                if store.add_to_watchlist(session, symbol)? {
                    lines.push(format!("added {}", symbol.to_uppercase()));
                } else {
                    lines.push(format!("{} already on watchlist", symbol.to_uppercase()));
                }
            }
            lines
        }
        WatchCommand::Remove { symbol } => {
            if store.remove_from_watchlist(session, symbol)? {
                vec![format!("removed {}", symbol.to_uppercase())]
            } else {
                vec![format!("{} not on watchlist", symbol.to_uppercase())]
            }
        }
        WatchCommand::List => {
            let symbols = store.watchlist(session)?;
            if symbols.is_empty() {
                vec!["watchlist is empty".to_string()]
            } else {
                symbols
            }
        }
        WatchCommand::Alert {
            symbol,
            condition,
            target,
        } => {
            let alert = store.add_alert(session, symbol, *target, (*condition).into())?;
            vec![format!(
                "alert set: {} {} {}",
                alert.symbol,
                alert.condition,
                render::price(Some(alert.target))
            )]
        }
        WatchCommand::Alerts => store
            .alerts(session)?
            .iter()
            .map(|a| {
                format!(
                    "{:<16} {:<6} {:>12}",
                    a.symbol,
                    a.condition.to_string(),
                    render::price(Some(a.target))
                )
            })
            .collect(),
        WatchCommand::Buy {
            symbol,
            quantity,
            price,
        } => record(store, session, symbol, TradeSide::Buy, *quantity, *price)?,
        WatchCommand::Sell {
            symbol,
            quantity,
            price,
        } => record(store, session, symbol, TradeSide::Sell, *quantity, *price)?,
        WatchCommand::Trades => store
            .trades(session)?
            .iter()
            .map(|t| {
                format!(
                    "{} {:<4} {:<16} {:>6} @ {:>10} = {:>12}",
                    t.recorded_at.format("%H:%M:%S"),
                    t.side.to_string(),
                    t.symbol,
                    t.quantity,
                    render::price(Some(t.price)),
                    render::price(Some(t.notional()))
                )
            })
            .collect(),
        WatchCommand::Check | WatchCommand::Quit => return Ok(None),
    };
    Ok(Some(lines))
}

fn record(
    store: &SessionStore,
    session: SessionId,
    symbol: &str,
    side: TradeSide,
    quantity: u32,
    price: f64,
) -> Result<Vec<String>, SessionError> {
    let entry = store.record_trade(session, symbol, side, quantity, price)?;
    Ok(vec![format!(
        "logged {} {} x{} @ {}",
        entry.side,
        entry.symbol,
        entry.quantity,
        render::price(Some(entry.price))
    )])
}

/// Adds the starting symbols. A rejected symbol is reported and skipped.
fn seed_watchlist(store: &SessionStore, session: SessionId, symbols: &[String]) -> Vec<String> {
    symbols
        .iter()
        .filter_map(|symbol| match store.add_to_watchlist(session, symbol) {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "skipping watchlist symbol");
                Some(format!("[warn] {symbol}: {e}"))
            }
        })
        .collect()
}

async fn check(service: &MarketDataService, store: &SessionStore, session: SessionId) -> Result<()> {
    let symbols = store.watchlist(session)?;
    if symbols.is_empty() {
        println!("watchlist is empty");
        return Ok(());
    }

    for symbol in symbols {
        let outcome = service.quote(&symbol).await;
        let FetchOutcome::Data(quote) = &outcome else {
            if let Some(line) = render::notice(&symbol, &outcome) {
                println!("{line}");
            }
            continue;
        };
        let Some(last) = quote.last_price else {
            println!("[info] {symbol}: no last price");
            continue;
        };

        let change = quote
            .previous_close
            .and_then(|prev| change_from_reference(&[last], prev));
        println!("{:<16} {:>12} {:>20}", symbol, render::price(Some(last)), render::change(change));

        for alert in store.triggered_alerts(session, &symbol, last)? {
            println!(
                "  ALERT {} is {} {}",
                alert.symbol,
                alert.condition,
                render::price(Some(alert.target))
            );
        }
    }
    Ok(())
}

pub async fn run_watch(service: &MarketDataService, args: WatchArgs) -> Result<()> {
    let store = SessionStore::new();
    let session = store.open();
    tracing::info!(%session, "watch session opened");

    for line in seed_watchlist(&store, session, &args.symbols) {
        println!("{line}");
    }

    println!("Commands: add, remove, list, alert, alerts, buy, sell, trades, check, quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("watch> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.render());
                continue;
            }
        };

        match apply(&store, session, &command) {
            Ok(Some(output)) => output.iter().for_each(|l| println!("{l}")),
            Ok(None) if command == WatchCommand::Quit => break,
            Ok(None) => check(service, &store, session).await?,
            Err(e) => println!("error: {e}"),
        }
    }

    let state = store.close(session)?;
    tracing::info!(
        %session,
        watchlist = state.watchlist.len(),
        alerts = state.alerts.len(),
        trades = state.trades.len(),
        "watch session closed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (SessionStore, SessionId) {
        let store = SessionStore::new();
        let id = store.open();
        (store, id)
    }

    fn run(store: &SessionStore, id: SessionId, line: &str) -> Vec<String> {
        let command = parse_line(line).unwrap();
        apply(store, id, &command).unwrap().unwrap()
    }

    // ========== Parsing Tests ==========

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("add tcs.ns infy.ns").unwrap(),
            WatchCommand::Add {
                symbols: vec!["tcs.ns".to_string(), "infy.ns".to_string()]
            }
        );
        assert_eq!(
            parse_line("alert TCS.NS below 3500.5").unwrap(),
            WatchCommand::Alert {
                symbol: "TCS.NS".to_string(),
                condition: ConditionArg::Below,
                target: 3500.5
            }
        );
        assert_eq!(parse_line("exit").unwrap(), WatchCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_line("add").is_err());
        assert!(parse_line("alert TCS.NS sideways 10").is_err());
        assert!(parse_line("buy TCS.NS -1 10").is_err());
        assert!(parse_line("launch").is_err());
    }

    // ========== Session Command Tests ==========

    #[test]
    fn test_watchlist_commands() {
        let (store, id) = session();

        assert_eq!(run(&store, id, "list"), vec!["watchlist is empty"]);
        assert_eq!(run(&store, id, "add tcs.ns"), vec!["added TCS.NS"]);
        assert_eq!(run(&store, id, "add TCS.NS"), vec!["TCS.NS already on watchlist"]);
        assert_eq!(run(&store, id, "list"), vec!["TCS.NS"]);
        assert_eq!(run(&store, id, "remove tcs.ns"), vec!["removed TCS.NS"]);
        assert_eq!(run(&store, id, "remove tcs.ns"), vec!["TCS.NS not on watchlist"]);
    }

    #[test]
    fn test_alert_and_trade_commands() {
        let (store, id) = session();

        assert_eq!(
            run(&store, id, "alert reliance.ns above 3000"),
            vec!["alert set: RELIANCE.NS above 3000.00"]
        );
        assert_eq!(run(&store, id, "alerts").len(), 1);

        assert_eq!(run(&store, id, "buy infy.ns 10 1500"), vec!["logged BUY INFY.NS x10 @ 1500.00"]);
        run(&store, id, "sell infy.ns 5 1550");
        let trades = run(&store, id, "trades");
        assert_eq!(trades.len(), 2);
        assert!(trades[1].contains("SELL"));
        assert!(trades[1].ends_with("7750.00"));
    }

    #[test]
    fn test_invalid_entries_are_errors() {
        let (store, id) = session();

        let zero_qty = parse_line("buy infy.ns 0 1500").unwrap();
        assert!(matches!(apply(&store, id, &zero_qty), Err(SessionError::InvalidEntry(_))));

        let bad_target = parse_line("alert tcs.ns above 0").unwrap();
        assert!(apply(&store, id, &bad_target).is_err());
    }

    #[test]
    fn test_bad_starting_symbol_is_skipped() {
        let (store, id) = session();
        let symbols = vec!["tcs.ns".to_string(), "TCS NS".to_string(), "infy.ns".to_string()];

        let warnings = seed_watchlist(&store, id, &symbols);

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("[warn] TCS NS"));
        assert_eq!(store.watchlist(id).unwrap(), vec!["TCS.NS", "INFY.NS"]);
    }

    #[test]
    fn test_network_commands_are_deferred() {
        let (store, id) = session();
        assert_eq!(apply(&store, id, &WatchCommand::Check).unwrap(), None);
        assert_eq!(apply(&store, id, &WatchCommand::Quit).unwrap(), None);
    }
}
