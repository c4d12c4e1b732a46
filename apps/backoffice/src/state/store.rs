//! # Store State
//!
//! The single in-memory [`Store`] shared by every command.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command A (checkout)        Command B (close_register)                 │
//! │       │                            │                                    │
//! │       ▼                            ▼                                    │
//! │  store.lock() ◄─── acquired   store.lock() ◄─── waits...                │
//! │       │                            │                                    │
//! │  checkout(&mut store, ...)         │                                    │
//! │  drain_changes → persist.save      │                                    │
//! │       │                            │                                    │
//! │  unlock ──────────────────────►   acquired                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A ledger operation and its statistics recompute run under one lock, so no
//! reader ever sees a sale without its customer totals.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use verdant_core::Store;

use super::persist::PersistHandle;

/// Thread-safe wrapper around the store.
#[derive(Debug, Clone)]
pub struct StoreState {
    store: Arc<Mutex<Store>>,
    persist: PersistHandle,
}

impl StoreState {
    pub fn new(store: Store, persist: PersistHandle) -> Self {
        StoreState {
            store: Arc::new(Mutex::new(store)),
            persist,
        }
    }

    /// A panic inside a previous closure leaves the store as it was after
    /// that closure's last completed operation, which is still consistent.
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let open = store_state.with_store(|store| store.active_session().cloned());
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Store) -> R,
    {
        let store = self.lock();
        f(&store)
    }

    /// Executes a function with write access to the store, then queues
    /// whatever collections it changed for saving.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// store_state.with_store_mut(|store| store.open_register(float, &operator))?;
    /// ```
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Store) -> R,
    {
        let mut store = self.lock();
        let result = f(&mut store);

        let changes = store.drain_changes();
        if !changes.is_empty() {
            self.persist.save(store.snapshot(), changes);
        }

        result
    }

    /// Waits for every queued save to be written.
    pub async fn flush(&self) {
        self.persist.flush().await;
    }
}
