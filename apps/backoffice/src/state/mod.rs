//! # State Module
//!
//! Shared state handed to commands. Each command takes only the pieces it
//! needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │   StoreState     │  │   AppConfig      │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  Arc<Mutex<      │  │  store_name      │          │
//! │  │  (SQLite     │  │    Store         │  │  operator        │          │
//! │  │   pool)      │  │  >>              │  │  currency        │          │
//! │  └──────┬───────┘  └────────┬─────────┘  └──────────────────┘          │
//! │         │                   │ drain_changes                             │
//! │         │                   ▼                                           │
//! │         │          ┌──────────────────┐                                 │
//! │         └─────────►│  PersistHandle   │  background writer task         │
//! │                    └──────────────────┘                                 │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • StoreState: Protected by Arc<Mutex<T>> for exclusive access         │
//! │  • AppConfig: Read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod db;
mod persist;
mod store;

pub use db::DbState;
pub use persist::PersistHandle;
pub use store::StoreState;
