//! # Verdant Back Office CLI
//!
//! ## Usage
//! ```bash
//! verdant status
//! verdant register open --float 500
//! verdant register close --count 542.50 --notes "one torn $5 bill"
//! verdant register summary
//! verdant register history --limit 5
//! verdant stats
//! ```
//!
//! Amounts are dollars with at most two decimals. `--json` prints the raw
//! command response instead of the formatted view.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use verdant_backoffice::commands::{register, stats};
use verdant_backoffice::config::AppConfig;
use verdant_backoffice::error::ApiError;
use verdant_backoffice::{bootstrap, init_tracing, AppContext};
use verdant_core::{CashRegisterSession, SessionSummary};

#[derive(Debug, Parser)]
#[command(name = "verdant", version, about = "Verdant dispensary back office")]
struct Cli {
    /// Config file (defaults to backoffice.toml in the platform config dir).
    #[arg(long, global = true, env = "VERDANT_CONFIG")]
    config: Option<PathBuf>,

    /// Print responses as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store, database and register overview.
    Status,

    /// Cash register operations.
    Register {
        #[command(subcommand)]
        action: RegisterAction,
    },

    /// This month against last month, plus best sellers.
    Stats {
        /// Number of best sellers to list.
        #[arg(long, default_value_t = stats::DEFAULT_TOP_PRODUCTS)]
        top: usize,
    },
}

#[derive(Debug, Subcommand)]
enum RegisterAction {
    /// Open a session with a starting float.
    Open {
        #[arg(long, value_parser = parse_amount)]
        float: i64,
    },

    /// Close the open session with the counted drawer amount.
    Close {
        #[arg(long, value_parser = parse_amount)]
        count: i64,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Takings of a session (open one, else the last closed one).
    Summary {
        #[arg(long)]
        id: Option<String>,
    },

    /// Closed sessions, newest first.
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

/// Parses "500", "500.5" or "500.50" into cents.
fn parse_amount(raw: &str) -> Result<i64, String> {
    let raw = raw.trim().trim_start_matches('$');
    let invalid = || format!("'{raw}' is not an amount like 500 or 42.50");

    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || frac.len() > 2 || !digits(whole) || !digits(frac) {
        return Err(invalid());
    }

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => frac.parse().map_err(|_| invalid())?,
    };

    whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(frac))
        .ok_or_else(|| "amount is too large".to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.clone());
    info!(store = %config.store_name, "Starting Verdant back office");

    let app = match bootstrap(config).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {}", e.message);
            return ExitCode::FAILURE;
        }
    };

    let result = run(&app, cli.command, cli.json).await;
    app.store.flush().await;
    app.db.inner().close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message);
            ExitCode::FAILURE
        }
    }
}

async fn run(app: &AppContext, command: Command, json: bool) -> Result<(), ApiError> {
    let config = &app.config;
    let money = |cents: i64| config.format_currency(cents);

    match command {
        Command::Status => {
            let status = register::register_status(&app.store).await?;
            if json {
                return print_json(&status);
            }
            let healthy = app.db.inner().health_check().await;
            let (products, customers, sales) = app
                .store
                .with_store(|s| (s.products().len(), s.customers().len(), s.sales().len()));

            println!("{}", config.store_name);
            println!("  Database:   {}", if healthy { "ok" } else { "unreachable" });
            println!("  Products:   {products}");
            println!("  Customers:  {customers}");
            println!("  Sales:      {sales}");
            match (&status.session, status.live_expected_cents) {
                (Some(session), Some(expected)) => println!(
                    "  Register:   open since {} by {}, drawer should hold {}",
                    session.opened_at.format("%Y-%m-%d %H:%M"),
                    session.operator.name,
                    money(expected)
                ),
                _ => println!("  Register:   closed"),
            }
        }

        Command::Register { action } => match action {
            RegisterAction::Open { float } => {
                let session = register::open_register(&app.store, config, float, None).await?;
                if json {
                    return print_json(&session);
                }
                println!(
                    "Register opened ({}) with a float of {}",
                    session.id,
                    money(session.opening_float_cents)
                );
            }
            RegisterAction::Close { count, notes } => {
                let closed = register::close_register(&app.store, count, notes).await?;
                if json {
                    return print_json(&closed);
                }
                print_session(&closed.session, &money);
                print_summary(&closed.summary, &money);
            }
            RegisterAction::Summary { id } => {
                let summary = register::session_summary(&app.store, id).await?;
                if json {
                    return print_json(&summary);
                }
                print_summary(&summary, &money);
            }
            RegisterAction::History { limit } => {
                let history = register::register_history(&app.store, Some(limit)).await?;
                if json {
                    return print_json(&history);
                }
                if history.is_empty() {
                    println!("No closed sessions");
                }
                for session in &history {
                    print_session(session, &money);
                }
            }
        },

        Command::Stats { top } => {
            let dashboard = stats::dashboard(&app.store, None).await?;
            let best = stats::top_products(&app.store, Some(top)).await?;
            if json {
                return print_json(&serde_json::json!({ "dashboard": dashboard, "topProducts": best }));
            }
            let current = &dashboard.current_month;
            println!("{}-{:02}", current.year, current.month);
            println!(
                "  Revenue:       {} ({:+.1}%)",
                money(dashboard.revenue.current),
                dashboard.revenue.percent_change
            );
            println!(
                "  Transactions:  {} ({:+.1}%)",
                dashboard.transactions.current, dashboard.transactions.percent_change
            );
            println!(
                "  Customers:     {} ({:+.1}%)",
                dashboard.customers.current, dashboard.customers.percent_change
            );
            println!(
                "  Net profit:    {} ({:+.1}%)",
                money(dashboard.net_profit.current),
                dashboard.net_profit.percent_change
            );
            println!(
                "  Inventory:     {} products, {} low, {} out of stock",
                dashboard.total_products, dashboard.low_stock_count, dashboard.out_of_stock_count
            );
            println!("Top products");
            for (rank, product) in best.iter().enumerate() {
                println!(
                    "  {}. {} ({} sold, {})",
                    rank + 1,
                    product.product_name,
                    product.units_sold,
                    money(product.revenue_cents)
                );
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))?;
    println!("{out}");
    Ok(())
}

fn print_session(session: &CashRegisterSession, money: &impl Fn(i64) -> String) {
    println!("Session {}", session.id);
    println!("  Opened:    {}", session.opened_at.format("%Y-%m-%d %H:%M"));
    if let Some(closed_at) = session.closed_at {
        println!("  Closed:    {}", closed_at.format("%Y-%m-%d %H:%M"));
    }
    println!("  Float:     {}", money(session.opening_float_cents));
    if let (Some(counted), Some(expected), Some(variance)) = (
        session.closing_float_cents,
        session.expected_cents,
        session.variance_cents,
    ) {
        println!("  Counted:   {}", money(counted));
        println!("  Expected:  {}", money(expected));
        println!("  Variance:  {}", money(variance));
    }
    if let Some(notes) = &session.notes {
        println!("  Notes:     {notes}");
    }
}

fn print_summary(summary: &SessionSummary, money: &impl Fn(i64) -> String) {
    println!("Takings ({} transactions)", summary.transaction_count);
    println!("  Cash:      {}", money(summary.cash_cents));
    println!("  Card:      {}", money(summary.card_cents));
    println!("  Transfer:  {}", money(summary.transfer_cents));
    println!("  Total:     {}", money(summary.total_cents));
    println!("  Expected in drawer: {}", money(summary.expected_cents));
}
