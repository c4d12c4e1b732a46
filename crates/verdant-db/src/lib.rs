//! # verdant-db: Database Layer for the Verdant Back Office
//!
//! Durable storage for the in-memory [`verdant_core::Store`]. SQLite via sqlx,
//! one JSON document table per store collection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Back Office Data Flow                              │
//! │                                                                         │
//! │  Command (checkout) → Store mutation → drain_changes()                 │
//! │       │                                                                 │
//! │       ▼  background writer task                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    verdant-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐   ┌────────────┐ │   │
//! │  │   │   Database    │    │ DocumentRepository │   │ Migrations │ │   │
//! │  │   │   (pool.rs)   │◄───│   <Product>        │   │ (embedded) │ │   │
//! │  │   │               │    │   <Sale> ...       │   │ 001_init   │ │   │
//! │  │   └───────────────┘    └────────────────────┘   └────────────┘ │   │
//! │  │            ▲                                                    │   │
//! │  │            └── snapshot.rs: load_snapshot / save_collection     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir, backoffice.db)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Generic document repository
//! - [`snapshot`] - Whole-store load and per-collection save
//!
//! ## Usage
//!
//! ```rust,ignore
//! use verdant_db::{load_snapshot, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./verdant.db")).await?;
//! let snapshot = load_snapshot(&db).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod snapshot;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{Document, DocumentRepository};
pub use snapshot::{load_snapshot, save_collection, save_snapshot};
