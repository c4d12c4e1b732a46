//! # Commands Module
//!
//! Every operation the UI layer and the CLI can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Catalog CRUD
//! ├── customer.rs  ◄─── Customer CRUD, balance adjustments
//! ├── sale.rs      ◄─── Checkout, revise, remove, audit log
//! ├── register.rs  ◄─── Cash register open/close/reconcile
//! ├── expense.rs   ◄─── Expense CRUD
//! └── stats.rs     ◄─── Dashboard, top products
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller                                                                 │
//! │    close_register(&app.store, 52_000, Some("short a fiver"))            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  StoreState::with_store_mut ── Store::close_register ── CoreResult      │
//! │         │                                                     │         │
//! │         │ drain_changes → persistence writer                  │         │
//! │         ▼                                                     ▼         │
//! │  Ok(CashRegisterSession)                          Err(ApiError)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command declares only the state it needs. Commands that write the
//! audit trail take an optional operator and fall back to the configured one.

pub mod customer;
pub mod expense;
pub mod product;
pub mod register;
pub mod sale;
pub mod stats;

use verdant_core::Operator;

use crate::config::AppConfig;

fn resolve_operator(operator: Option<Operator>, config: &AppConfig) -> Operator {
    operator.unwrap_or_else(|| config.operator())
}
