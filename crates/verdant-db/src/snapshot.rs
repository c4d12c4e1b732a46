//! # Store Snapshots
//!
//! Moves whole collections between the in-memory store and SQLite.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  startup:   load_snapshot(db)                                           │
//! │               ├── Some(snapshot) → Store::from_snapshot                 │
//! │               └── None (all tables empty) → example records             │
//! │                                                                         │
//! │  mutation:  store.drain_changes() → [Sales, SaleLogs, ...]              │
//! │               └── save_collection(db, &snapshot, collection)  each      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use verdant_core::{Collection, StoreSnapshot};

use crate::error::DbResult;
use crate::pool::Database;

/// Reads every collection. `None` when the database holds no records at all.
pub async fn load_snapshot(db: &Database) -> DbResult<Option<StoreSnapshot>> {
    let snapshot = StoreSnapshot {
        products: db.products().list().await?,
        customers: db.customers().list().await?,
        sales: db.sales().list().await?,
        sale_logs: db.sale_logs().list().await?,
        register_sessions: db.register_sessions().list().await?,
        expenses: db.expenses().list().await?,
    };

    if snapshot.is_empty() {
        debug!("Database is empty, no snapshot to load");
        return Ok(None);
    }

    info!(
        products = snapshot.products.len(),
        customers = snapshot.customers.len(),
        sales = snapshot.sales.len(),
        sessions = snapshot.register_sessions.len(),
        "Snapshot loaded"
    );
    Ok(Some(snapshot))
}

/// Rewrites one collection's table from the snapshot.
pub async fn save_collection(
    db: &Database,
    snapshot: &StoreSnapshot,
    collection: Collection,
) -> DbResult<()> {
    match collection {
        Collection::Products => db.products().replace_all(&snapshot.products).await?,
        Collection::Customers => db.customers().replace_all(&snapshot.customers).await?,
        Collection::Sales => db.sales().replace_all(&snapshot.sales).await?,
        Collection::SaleLogs => db.sale_logs().replace_all(&snapshot.sale_logs).await?,
        Collection::RegisterSessions => {
            db.register_sessions()
                .replace_all(&snapshot.register_sessions)
                .await?
        }
        Collection::Expenses => db.expenses().replace_all(&snapshot.expenses).await?,
    }

    debug!(collection = collection.as_str(), "Collection saved");
    Ok(())
}

/// Writes every collection.
pub async fn save_snapshot(db: &Database, snapshot: &StoreSnapshot) -> DbResult<()> {
    for collection in Collection::ALL {
        save_collection(db, snapshot, collection).await?;
    }
    info!("Snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use chrono::{TimeZone, Utc};
    use verdant_core::seed::example_snapshot;

    #[tokio::test]
    async fn test_empty_database_has_no_snapshot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(load_snapshot(&db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_survives_a_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap();
        let snapshot = example_snapshot(now).unwrap();

        save_snapshot(&db, &snapshot).await.unwrap();
        let loaded = load_snapshot(&db).await.unwrap().unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_save_collection_touches_only_that_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap();
        let snapshot = example_snapshot(now).unwrap();

        save_collection(&db, &snapshot, Collection::Sales).await.unwrap();

        assert_eq!(db.sales().count().await.unwrap(), snapshot.sales.len() as i64);
        assert_eq!(db.products().count().await.unwrap(), 0);
    }
}
