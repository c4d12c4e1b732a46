//! # Seed Data Writer
//!
//! Writes the fixed example records into a back-office database.
//!
//! ## Usage
//! ```bash
//! # Seed ./verdant_dev.db (skipped when it already has records)
//! cargo run -p verdant-db --bin seed
//!
//! # Specify database path
//! cargo run -p verdant-db --bin seed -- --db ./data/verdant.db
//!
//! # Overwrite whatever is there
//! cargo run -p verdant-db --bin seed -- --force
//! ```
//!
//! ## Generated Records
//! - Six products across flower, pre-rolls, concentrates and edibles
//! - Three customers with different membership tiers and balances
//! - Five completed sales spread over the last six weeks
//! - Two expenses

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use verdant_core::seed::example_snapshot;
use verdant_db::{load_snapshot, save_snapshot, Database, DbConfig};

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Verdant back-office seed data writer")]
struct Args {
    /// Database file path.
    #[arg(short, long, default_value = "./verdant_dev.db")]
    db: PathBuf,

    /// Replace existing records instead of skipping.
    #[arg(short, long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    println!("🌱 Verdant Back Office Seed Data Writer");
    println!("=======================================");
    println!("Database: {}", args.db.display());
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !args.force {
        if let Some(existing) = load_snapshot(&db).await? {
            println!(
                "⚠ Database already has {} products and {} sales",
                existing.products.len(),
                existing.sales.len()
            );
            println!("  Skipping seed to avoid duplicates.");
            println!("  Re-run with --force to overwrite.");
            return Ok(());
        }
    }

    let start = std::time::Instant::now();
    let snapshot = example_snapshot(Utc::now())?;
    save_snapshot(&db, &snapshot).await?;

    println!();
    println!("✓ Wrote {} products", snapshot.products.len());
    println!("✓ Wrote {} customers", snapshot.customers.len());
    println!("✓ Wrote {} sales", snapshot.sales.len());
    println!("✓ Wrote {} expenses", snapshot.expenses.len());
    println!("  Done in {:?}", start.elapsed());

    db.close().await;
    Ok(())
}
