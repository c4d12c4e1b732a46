//! # Store
//!
//! The explicit service object that owns every collection of the back office.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store                                                                  │
//! │  ├── products          Vec<Product>                                    │
//! │  ├── customers         Vec<Customer>                                   │
//! │  ├── sales             Vec<Sale>                                       │
//! │  ├── sale_logs         Vec<SaleLog>           (append-only)            │
//! │  ├── sessions          Vec<CashRegisterSession>                        │
//! │  ├── expenses          Vec<Expense>                                    │
//! │  ├── clock             Arc<dyn Clock>                                  │
//! │  └── dirty             BTreeSet<Collection>                            │
//! │                                                                         │
//! │  mutation ──► marks touched collections dirty                           │
//! │  app      ──► drain_changes() ──► persists exactly those collections    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger operations live in their own modules (`catalog`, `customers`,
//! `sales`, `register`, `expenses`) as additional `impl Store` blocks.
//!
//! ## Concurrency
//! The store is plain data with `&mut self` mutations. Callers that share it
//! wrap it in a mutex, so one operation always runs to completion before the
//! next one reads.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::types::{CashRegisterSession, Customer, Expense, Product, Sale, SaleLog};

// =============================================================================
// Collection
// =============================================================================

/// One logical collection of the store; the unit of persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Products,
    Customers,
    Sales,
    SaleLogs,
    RegisterSessions,
    Expenses,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Products,
        Collection::Customers,
        Collection::Sales,
        Collection::SaleLogs,
        Collection::RegisterSessions,
        Collection::Expenses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Customers => "customers",
            Collection::Sales => "sales",
            Collection::SaleLogs => "sale_logs",
            Collection::RegisterSessions => "register_sessions",
            Collection::Expenses => "expenses",
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Serializable copy of every collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub sale_logs: Vec<SaleLog>,
    #[serde(default)]
    pub register_sessions: Vec<CashRegisterSession>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl StoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
            && self.customers.is_empty()
            && self.sales.is_empty()
            && self.sale_logs.is_empty()
            && self.register_sessions.is_empty()
            && self.expenses.is_empty()
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug)]
pub struct Store {
    pub(crate) products: Vec<Product>,
    pub(crate) customers: Vec<Customer>,
    pub(crate) sales: Vec<Sale>,
    pub(crate) sale_logs: Vec<SaleLog>,
    pub(crate) sessions: Vec<CashRegisterSession>,
    pub(crate) expenses: Vec<Expense>,
    clock: Arc<dyn Clock>,
    dirty: BTreeSet<Collection>,
}

impl Store {
    /// Creates an empty store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Store {
            products: Vec::new(),
            customers: Vec::new(),
            sales: Vec::new(),
            sale_logs: Vec::new(),
            sessions: Vec::new(),
            expenses: Vec::new(),
            clock,
            dirty: BTreeSet::new(),
        }
    }

    /// Rebuilds a store from durable state.
    ///
    /// Customer statistics are recomputed on load, so a snapshot written by
    /// an older build can never carry stale aggregates. The recompute does
    /// not count as a pending change.
    pub fn from_snapshot(snapshot: StoreSnapshot, clock: Arc<dyn Clock>) -> Self {
        let mut store = Store {
            products: snapshot.products,
            customers: snapshot.customers,
            sales: snapshot.sales,
            sale_logs: snapshot.sale_logs,
            sessions: snapshot.register_sessions,
            expenses: snapshot.expenses,
            clock,
            dirty: BTreeSet::new(),
        };
        store.recompute_statistics();
        store.dirty.clear();

        debug!(
            products = store.products.len(),
            customers = store.customers.len(),
            sales = store.sales.len(),
            sessions = store.sessions.len(),
            "Store loaded from snapshot"
        );

        store
    }

    /// Copies every collection into a serializable snapshot.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            products: self.products.clone(),
            customers: self.customers.clone(),
            sales: self.sales.clone(),
            sale_logs: self.sale_logs.clone(),
            register_sessions: self.sessions.clone(),
            expenses: self.expenses.clone(),
        }
    }

    /// Returns and clears the set of collections changed since the last drain.
    pub fn drain_changes(&mut self) -> Vec<Collection> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    /// True when there are changes nobody has drained yet.
    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Current instant according to the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn mark(&mut self, collection: Collection) {
        self.dirty.insert(collection);
    }
}

/// Generates a new record id.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::{NewProduct, StockUnit};
    use chrono::TimeZone;

    /// A store driven by a manual clock starting at 2026-04-02 08:00 UTC.
    pub(crate) fn test_store() -> (Store, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap());
        (Store::new(Arc::new(clock.clone())), clock)
    }

    pub(crate) fn new_product(name: &str, price_cents: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: "flower".to_string(),
            description: None,
            price_cents,
            cost_cents: price_cents / 2,
            stock_quantity: stock,
            stock_unit: StockUnit::Gram,
        }
    }

    #[test]
    fn test_drain_changes_clears_dirty_set() {
        let (mut store, _clock) = test_store();
        store.create_product(new_product("OG Kush", 1500, 12)).unwrap();

        assert!(store.has_changes());
        assert_eq!(store.drain_changes(), vec![Collection::Products]);
        assert!(!store.has_changes());
        assert!(store.drain_changes().is_empty());
    }

    #[test]
    fn test_snapshot_restores_collections_without_pending_changes() {
        let (mut store, clock) = test_store();
        store.create_product(new_product("Blue Dream", 1200, 40)).unwrap();
        let snapshot = store.snapshot();

        let restored = Store::from_snapshot(snapshot.clone(), Arc::new(clock));

        assert_eq!(restored.snapshot(), snapshot);
        assert!(!restored.has_changes());
    }

    #[test]
    fn test_collection_names() {
        let names: Vec<&str> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "products",
                "customers",
                "sales",
                "sale_logs",
                "register_sessions",
                "expenses"
            ]
        );
    }
}
