//! # Verdant Back Office Library
//!
//! Startup and the command surface of the dispensary back office. The CLI
//! binary (`main.rs`) and any UI shell both go through this crate.
//!
//! ## Module Organization
//! ```text
//! verdant_backoffice/
//! ├── lib.rs          ◄─── You are here (startup)
//! ├── config.rs       ◄─── AppConfig: defaults → TOML → env
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── store.rs    ◄─── Arc<Mutex<Store>> + change draining
//! │   └── persist.rs  ◄─── Background writer task
//! ├── commands/
//! │   ├── product.rs  ◄─── Catalog CRUD
//! │   ├── customer.rs ◄─── Customer CRUD, balance adjustments
//! │   ├── sale.rs     ◄─── Checkout, revise, remove, audit log
//! │   ├── register.rs ◄─── Open/close/reconcile the cash drawer
//! │   ├── expense.rs  ◄─── Expense CRUD
//! │   └── stats.rs    ◄─── Dashboard, top products
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use verdant_core::seed::example_snapshot;
use verdant_core::{Clock, Store, SystemClock};
use verdant_db::{load_snapshot, save_snapshot, Database, DbConfig};

use config::AppConfig;
use error::ApiError;
use state::{DbState, PersistHandle, StoreState};

/// Everything a command can ask for.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub db: DbState,
    pub store: StoreState,
}

/// Opens the configured database and restores the store.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Determine Database Path ──────────────────────────────────────────► │
/// │     • VERDANT_DB_PATH / config file / platform data dir                 │
/// │                                                                         │
/// │  2. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  3. Restore the Store ────────────────────────────────────────────────► │
/// │     • Stored records → Store::from_snapshot                             │
/// │     • Empty database → example records (when seed_on_empty)             │
/// │                                                                         │
/// │  4. Start the persistence writer ─────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn bootstrap(config: AppConfig) -> Result<AppContext, ApiError> {
    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    bootstrap_with(config, db, Arc::new(SystemClock)).await
}

/// Restores the store from an already-open database.
pub async fn bootstrap_with(
    config: AppConfig,
    db: Database,
    clock: Arc<dyn Clock>,
) -> Result<AppContext, ApiError> {
    let store = match load_snapshot(&db).await? {
        Some(snapshot) => Store::from_snapshot(snapshot, clock),
        None if config.seed_on_empty => {
            let snapshot = example_snapshot(clock.now())?;
            save_snapshot(&db, &snapshot).await?;
            info!(
                products = snapshot.products.len(),
                customers = snapshot.customers.len(),
                "Empty database seeded with example records"
            );
            Store::from_snapshot(snapshot, clock)
        }
        None => Store::new(clock),
    };

    let persist = PersistHandle::start(db.clone());

    info!(store = %config.store_name, "State initialized");
    Ok(AppContext {
        config,
        db: DbState::new(db),
        store: StoreState::new(store, persist),
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=verdant=trace` - Show trace for verdant crates only
/// - Default: `info,verdant=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,verdant=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{TimeZone, Utc};
    use verdant_core::ManualClock;

    /// Empty store over an in-memory database, clock at 2026-04-02 08:00 UTC.
    pub(crate) async fn test_app() -> (AppContext, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap());
        let config = AppConfig {
            seed_on_empty: false,
            ..AppConfig::default()
        };
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let app = bootstrap_with(config, db, Arc::new(clock.clone()))
            .await
            .unwrap();
        (app, clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use verdant_core::ManualClock;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_empty_database_is_seeded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let app = bootstrap_with(AppConfig::default(), db.clone(), clock())
            .await
            .unwrap();

        let products = app.store.with_store(|s| s.products().len());
        assert_eq!(products, 6);
        assert_eq!(db.products().count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_seeding_can_be_disabled() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = AppConfig {
            seed_on_empty: false,
            ..AppConfig::default()
        };

        let app = bootstrap_with(config, db, clock()).await.unwrap();

        assert!(app.store.with_store(|s| s.products().is_empty()));
    }

    #[tokio::test]
    async fn test_stored_records_are_restored_not_reseeded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let first = bootstrap_with(AppConfig::default(), db.clone(), clock())
            .await
            .unwrap();
        let removed = first.store.with_store_mut(|s| {
            let id = s.expenses()[0].id.clone();
            s.delete_expense(&id)
        });
        assert!(removed);
        first.store.flush().await;

        let second = bootstrap_with(AppConfig::default(), db, clock())
            .await
            .unwrap();

        assert_eq!(second.store.with_store(|s| s.expenses().len()), 1);
    }
}
