//! # verdant-core: Pure Business Logic for the Verdant Back Office
//!
//! This crate holds every ledger rule of the dispensary back office. It does
//! no I/O: persistence and presentation live in other crates and talk to the
//! core through the [`Store`] service object.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Verdant Back Office Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                UI layer / CLI (verdant-backoffice)              │   │
//! │  │   checkout, revise_sale, open_register, close_register, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ in-process calls                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ verdant-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │ customers │  │   sales   │  │ register  │  │   │
//! │  │   │  Product  │◄─┤  balance  │◄─┤  SaleLog  │─►│  session  │  │   │
//! │  │   │   stock   │  │   stats   │  │ checkout  │  │ variance  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Store owns all collections + Clock + dirty-collection set     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ drain_changes() / snapshot()           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 verdant-db (SQLite document tables)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, CashRegisterSession, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input and patch validation
//! - [`clock`] - Injected time source
//! - [`store`] - The in-memory store and change tracking
//! - [`catalog`], [`customers`], [`sales`], [`expenses`] - Ledger operations
//! - [`checkout`] - Balance-preference rule on top of `record_sale`
//! - [`register`] - Cash register open/close and reconciliation
//! - [`stats`] - Month-over-month statistics
//! - [`seed`] - Fixed example records for an empty database
//!
//! ## Design Principles
//!
//! 1. **Sales are the source of truth**: stock, customer statistics and
//!    register expectations are derived from the sales ledger
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64)
//! 4. **All or nothing**: a rejected operation leaves the store untouched
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use verdant_core::clock::ManualClock;
//! use verdant_core::{Money, NewSale, Operator, PaymentMethod, SaleItemInput, SaleStatus, Store};
//!
//! let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap());
//! let mut store = Store::new(Arc::new(clock));
//! let operator = Operator::new("op-1", "Sam");
//!
//! store.open_register(Money::from_dollars(500), &operator).unwrap();
//! store
//!     .record_sale(
//!         NewSale {
//!             date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
//!             customer_id: None,
//!             payment_method: PaymentMethod::Cash,
//!             status: SaleStatus::Completed,
//!             items: vec![SaleItemInput::new("any-product", 3, 1500)],
//!             notes: None,
//!         },
//!         &operator,
//!     )
//!     .unwrap();
//!
//! assert_eq!(store.live_expected(), Some(Money::from_dollars(545)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod customers;
pub mod error;
pub mod expenses;
pub mod inventory;
pub mod money;
pub mod register;
pub mod sales;
pub mod seed;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use verdant_core::Money` instead of
// `use verdant_core::money::Money`

pub use checkout::{checkout, CheckoutReceipt};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use register::SessionSummary;
pub use store::{Collection, Store, StoreSnapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which a product is reported as low stock.
///
/// ## Business Reason
/// Ten units (or grams) is roughly one busy afternoon for a popular strain;
/// below that the buyer needs to reorder.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum number of line items on one sale.
///
/// ## Business Reason
/// Prevents runaway tickets and keeps every sale total well inside `i64`.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum unit price of a line item or catalog product ($100,000.00).
///
/// Together with [`MAX_ITEM_QUANTITY`] and [`MAX_SALE_LINES`] this bounds a
/// sale total at about $10 billion, so line and sale arithmetic never
/// overflows.
pub const MAX_UNIT_PRICE_CENTS: i64 = 10_000_000;
