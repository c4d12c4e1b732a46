//! # Repository Module
//!
//! Database repository implementations for the back office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Persistence task / seed binary                                        │
//! │       │                                                                 │
//! │       │  db.sales().replace_all(&snapshot.sales)                       │
//! │       ▼                                                                 │
//! │  DocumentRepository<Sale>                                              │
//! │  ├── list(&self)                                                       │
//! │  ├── get(&self, id)                                                    │
//! │  ├── upsert(&self, doc)                                                │
//! │  ├── delete(&self, id)                                                 │
//! │  ├── replace_all(&self, docs)   (one transaction)                      │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL over `sales (id, position, payload, updated_at)`           │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`DocumentRepository`] - Generic CRUD over one document table
//! - [`Document`] - Maps a domain type to its table

pub mod document;

pub use document::{Document, DocumentRepository};
