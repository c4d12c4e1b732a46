//! # Domain Types
//!
//! Core domain types used throughout the back office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price_cents    │   │  items[]        │   │  balance_cents  │       │
//! │  │  stock_quantity │   │  total_cents    │   │  total_spent    │       │
//! │  │  status         │   │  status         │   │  visits         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌────────────────┐   │
//! │  │    SaleLog      │   │ CashRegisterSession  │   │    Expense     │   │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ────────────  │   │
//! │  │  action         │   │  opening_float       │   │  category      │   │
//! │  │  details        │   │  expected / variance │   │  amount_cents  │   │
//! │  │  (append-only)  │   │  (immutable closed)  │   │                │   │
//! │  └─────────────────┘   └──────────────────────┘   └────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Patches
//! Partial updates go through one typed patch per entity. A field left as
//! `None` is untouched; nullable fields use `Option<Option<_>>` so the UI can
//! distinguish "leave as is" from "clear".

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

/// Deserializes a present field (including `null`) as `Some(_)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// =============================================================================
// Operator
// =============================================================================

/// The person operating the back office, supplied by the auth collaborator.
///
/// The core treats it as opaque and only copies it into audit records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Operator {
    pub id: String,
    pub name: String,
}

impl Operator {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Operator {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// How stock is counted for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockUnit {
    /// Sold by weight (flower, concentrates).
    Gram,
    /// Sold by count (pre-rolls, edibles, accessories).
    Unit,
}

/// Derived availability of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Derives the status from a stock level.
    ///
    /// ```text
    ///   0        → OutOfStock
    ///   1 ..= 9  → LowStock
    ///   10 ..    → InStock
    /// ```
    pub fn for_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

/// A sellable item in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the sale line.
    pub name: String,

    /// Catalog category (flower, edibles, ...).
    pub category: String,

    pub description: Option<String>,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Unit cost in cents (for profit statistics).
    pub cost_cents: i64,

    /// Current stock level, never negative.
    pub stock_quantity: i64,

    pub stock_unit: StockUnit,

    /// Derived from `stock_quantity`; recomputed on every stock change.
    pub status: StockStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the cost as a Money type.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub stock_quantity: i64,
    pub stock_unit: StockUnit,
}

/// Mutable product fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    pub cost_cents: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub stock_unit: Option<StockUnit>,
}

// =============================================================================
// Customer
// =============================================================================

/// Membership tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MembershipType {
    #[default]
    Regular,
    Premium,
    Vip,
}

/// A customer with prepaid store credit and purchase statistics.
///
/// `total_spent_cents`, `visits` and `last_visit` are a derived view over the
/// sales ledger; they are only ever written by `recompute_statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub membership: MembershipType,

    /// Prepaid store credit in cents. Never negative.
    pub balance_cents: i64,

    pub total_spent_cents: i64,
    pub visits: u32,
    #[ts(as = "Option<String>")]
    pub last_visit: Option<NaiveDate>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the prepaid balance as Money.
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }

    /// Returns lifetime completed spend as Money.
    #[inline]
    pub fn total_spent(&self) -> Money {
        Money::from_cents(self.total_spent_cents)
    }
}

/// Fields for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub membership: MembershipType,
    #[serde(default)]
    pub balance_cents: i64,
}

/// Mutable customer fields. Statistics are deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerPatch {
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Option<String>>,
    pub membership: Option<MembershipType>,
    pub balance_cents: Option<i64>,
}

/// Direction of a balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BalanceDirection {
    Credit,
    Debit,
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale transaction.
///
/// Only `Completed` sales deduct stock, count toward customer statistics and
/// enter register reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Completed,
    Pending,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Completed => "completed",
            SaleStatus::Pending => "pending",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash into the register drawer.
    Cash,
    /// Card on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
    /// Customer's prepaid store credit.
    Balance,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Balance => "balance",
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A line item in a sale.
///
/// `product_name` is frozen at the time of sale so history survives catalog
/// edits and deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// Always `quantity × unit_price_cents`; recomputed on every write.
    pub line_total_cents: i64,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// A recorded sale transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "Option<String>")]
    pub time: Option<NaiveTime>,
    pub customer_id: Option<String>,
    /// Customer name at the time the sale was written.
    pub customer_name: String,
    pub items: Vec<SaleItem>,
    /// Always the sum of `items[*].line_total_cents`.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the transaction total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == SaleStatus::Completed
    }

    /// The instant the sale happened: date + time-of-day, or the creation
    /// timestamp when no time-of-day was recorded.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self.time {
            Some(time) => self.date.and_time(time).and_utc(),
            None => self.created_at,
        }
    }

    /// Total units across all line items.
    pub fn units(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// A requested line item. Any client-side totals are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItemInput {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl SaleItemInput {
    pub fn new(product_id: impl Into<String>, quantity: i64, unit_price_cents: i64) -> Self {
        SaleItemInput {
            product_id: product_id.into(),
            quantity,
            unit_price_cents,
        }
    }
}

/// Fields for recording a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub items: Vec<SaleItemInput>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Mutable sale fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalePatch {
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<Option<String>>")]
    pub time: Option<Option<NaiveTime>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_id: Option<Option<String>>,
    pub items: Option<Vec<SaleItemInput>>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<SaleStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

// =============================================================================
// Sale Log
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleLogAction {
    Create,
    Update,
    Delete,
}

/// Append-only audit entry. One per mutating sale operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLog {
    pub id: String,
    pub action: SaleLogAction,
    pub sale_id: String,
    /// Human-readable description of what changed.
    pub details: String,
    pub operator: Operator,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Cash Register Session
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    Open,
    Closed,
}

/// One opening-to-closing cycle of the physical cash drawer.
///
/// The closing fields are `None` while open and fixed forever once closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashRegisterSession {
    pub id: String,
    pub opening_float_cents: i64,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    pub operator: Operator,
    pub status: RegisterStatus,
    pub closing_float_cents: Option<i64>,
    pub expected_cents: Option<i64>,
    /// closing − expected; positive = surplus, negative = shortfall.
    pub variance_cents: Option<i64>,
    pub notes: Option<String>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl CashRegisterSession {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == RegisterStatus::Open
    }

    #[inline]
    pub fn opening_float(&self) -> Money {
        Money::from_cents(self.opening_float_cents)
    }

    #[inline]
    pub fn variance(&self) -> Option<Money> {
        self.variance_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Expense
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Rent,
    Payroll,
    Inventory,
    Utilities,
    Marketing,
    Other,
}

/// An operating expense, counted against net profit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Expense {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Fields for recording an expense.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewExpense {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount_cents: i64,
}

/// Mutable expense fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpensePatch {
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::for_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::for_quantity(1), StockStatus::LowStock);
        assert_eq!(StockStatus::for_quantity(9), StockStatus::LowStock);
        assert_eq!(StockStatus::for_quantity(10), StockStatus::InStock);
        assert_eq!(StockStatus::for_quantity(250), StockStatus::InStock);
    }

    #[test]
    fn test_sale_timestamp_combines_date_and_time() {
        let created = DateTime::parse_from_rfc3339("2026-03-14T23:59:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap();
        let mut sale = Sale {
            id: "s1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0),
            customer_id: None,
            customer_name: String::new(),
            items: Vec::new(),
            total_cents: 0,
            payment_method: PaymentMethod::Cash,
            status: SaleStatus::Completed,
            notes: None,
            created_at: created,
            updated_at: created,
        };
        assert_eq!(sale.timestamp().to_rfc3339(), "2026-03-14T09:30:00+00:00");

        sale.time = None;
        assert_eq!(sale.timestamp(), created);
    }

    #[test]
    fn test_patch_distinguishes_absent_from_null() {
        let patch: CustomerPatch = serde_json::from_str(r#"{ "email": null }"#).unwrap();
        assert_eq!(patch.email, Some(None));
        assert_eq!(patch.phone, None);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&StockStatus::OutOfStock).unwrap(),
            "\"out_of_stock\""
        );
        assert_eq!(PaymentMethod::Transfer.as_str(), "transfer");
        assert_eq!(SaleStatus::Cancelled.as_str(), "cancelled");
    }
}
