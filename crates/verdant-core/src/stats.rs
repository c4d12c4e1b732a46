//! # Statistics
//!
//! Read-only aggregates over the sales ledger. Every figure filters to
//! completed sales first.
//!
//! ## Month-over-Month Convention
//! ```text
//! previous = 0, current = 0   →    0%
//! previous = 0, current ≠ 0   → +100%
//! otherwise                   → (current - previous) / |previous| × 100
//! ```

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::store::Store;
use crate::types::{Sale, StockStatus};

// =============================================================================
// Types
// =============================================================================

/// Completed-sales figures for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub revenue_cents: i64,
    pub transactions: u32,
    pub unique_customers: u32,
    pub units_sold: i64,
    /// Σ (unit price − current product cost) × quantity.
    pub gross_profit_cents: i64,
    pub expenses_cents: i64,
    /// gross profit − expenses.
    pub net_profit_cents: i64,
}

/// One metric compared against the previous month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricChange {
    pub current: i64,
    pub previous: i64,
    pub percent_change: f64,
}

impl MetricChange {
    fn new(current: i64, previous: i64) -> Self {
        MetricChange {
            current,
            previous,
            percent_change: percent_change(current, previous),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dashboard {
    pub current_month: MonthlySummary,
    pub previous_month: MonthlySummary,
    pub revenue: MetricChange,
    pub transactions: MetricChange,
    pub customers: MetricChange,
    pub net_profit: MetricChange,
    pub total_products: u32,
    pub low_stock_count: u32,
    pub out_of_stock_count: u32,
    pub total_customers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopProduct {
    pub product_id: String,
    pub product_name: String,
    pub units_sold: i64,
    pub revenue_cents: i64,
}

// =============================================================================
// Functions
// =============================================================================

/// Percentage change between two amounts.
///
/// ## Example
/// ```rust
/// use verdant_core::stats::percent_change;
///
/// assert_eq!(percent_change(150, 100), 50.0);
/// assert_eq!(percent_change(500, 0), 100.0);
/// assert_eq!(percent_change(0, 0), 0.0);
/// ```
pub fn percent_change(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return if current == 0 { 0.0 } else { 100.0 };
    }
    (current - previous) as f64 / previous.abs() as f64 * 100.0
}

/// The calendar month before `(year, month)`.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

fn completed_in_month(store: &Store, year: i32, month: u32) -> impl Iterator<Item = &Sale> + '_ {
    store
        .sales()
        .iter()
        .filter(move |s| s.is_completed() && in_month(s.date, year, month))
}

pub fn monthly_summary(store: &Store, year: i32, month: u32) -> MonthlySummary {
    let mut revenue = Money::zero();
    let mut transactions = 0u32;
    let mut customers = HashSet::new();
    let mut units = 0i64;
    let mut gross_profit = Money::zero();

    for sale in completed_in_month(store, year, month) {
        revenue += sale.total();
        transactions += 1;
        units += sale.units();
        if let Some(id) = sale.customer_id.as_deref() {
            customers.insert(id);
        }
        for item in &sale.items {
            let cost = store
                .product(&item.product_id)
                .map(|p| p.cost())
                .unwrap_or_default();
            gross_profit += (item.unit_price() - cost) * item.quantity;
        }
    }

    let expenses: Money = store
        .expenses()
        .iter()
        .filter(|e| in_month(e.date, year, month))
        .map(|e| e.amount())
        .sum();

    MonthlySummary {
        year,
        month,
        revenue_cents: revenue.cents(),
        transactions,
        unique_customers: customers.len() as u32,
        units_sold: units,
        gross_profit_cents: gross_profit.cents(),
        expenses_cents: expenses.cents(),
        net_profit_cents: (gross_profit - expenses).cents(),
    }
}

/// Current vs previous calendar month, plus inventory counters.
pub fn dashboard(store: &Store, today: NaiveDate) -> Dashboard {
    let (year, month) = (today.year(), today.month());
    let (prev_year, prev_month) = previous_month(year, month);

    let current = monthly_summary(store, year, month);
    let previous = monthly_summary(store, prev_year, prev_month);

    let count_status = |status: StockStatus| {
        store
            .products()
            .iter()
            .filter(|p| p.status == status)
            .count() as u32
    };

    Dashboard {
        revenue: MetricChange::new(current.revenue_cents, previous.revenue_cents),
        transactions: MetricChange::new(
            i64::from(current.transactions),
            i64::from(previous.transactions),
        ),
        customers: MetricChange::new(
            i64::from(current.unique_customers),
            i64::from(previous.unique_customers),
        ),
        net_profit: MetricChange::new(current.net_profit_cents, previous.net_profit_cents),
        total_products: store.products().len() as u32,
        low_stock_count: count_status(StockStatus::LowStock),
        out_of_stock_count: count_status(StockStatus::OutOfStock),
        total_customers: store.customers().len() as u32,
        current_month: current,
        previous_month: previous,
    }
}

/// Best sellers by completed revenue, all time.
pub fn top_products(store: &Store, limit: usize) -> Vec<TopProduct> {
    let mut by_product: HashMap<&str, TopProduct> = HashMap::new();

    for sale in store.sales().iter().filter(|s| s.is_completed()) {
        for item in &sale.items {
            let entry = by_product
                .entry(item.product_id.as_str())
                .or_insert_with(|| TopProduct {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    units_sold: 0,
                    revenue_cents: 0,
                });
            entry.units_sold += item.quantity;
            entry.revenue_cents += item.line_total_cents;
        }
    }

    let mut ranked: Vec<TopProduct> = by_product.into_values().collect();
    ranked.sort_by(|a, b| {
        b.revenue_cents
            .cmp(&a.revenue_cents)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    ranked.truncate(limit);
    ranked
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{new_product, test_store};
    use crate::types::{
        ExpenseCategory, NewExpense, NewSale, Operator, PaymentMethod, SaleItemInput, SaleStatus,
    };

    fn sale_on(date: NaiveDate, items: Vec<SaleItemInput>, status: SaleStatus) -> NewSale {
        NewSale {
            date,
            customer_id: None,
            payment_method: PaymentMethod::Card,
            status,
            items,
            notes: None,
        }
    }

    fn day(month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, d).unwrap()
    }

    #[test]
    fn test_percent_change_conventions() {
        assert_eq!(percent_change(0, 0), 0.0);
        assert_eq!(percent_change(1, 0), 100.0);
        assert_eq!(percent_change(50, 100), -50.0);
        assert_eq!(percent_change(0, 100), -100.0);
        assert_eq!(percent_change(-50, -100), 50.0);
    }

    #[test]
    fn test_previous_month_wraps_year() {
        assert_eq!(previous_month(2026, 1), (2025, 12));
        assert_eq!(previous_month(2026, 7), (2026, 6));
    }

    #[test]
    fn test_monthly_summary_profit_and_expenses() {
        let (mut store, _clock) = test_store();
        let op = Operator::new("op", "Sam");
        // new_product sets cost to half the price.
        let og = store.create_product(new_product("OG Kush", 1500, 100)).unwrap();

        store
            .record_sale(
                sale_on(day(4, 1), vec![SaleItemInput::new(&og.id, 4, 1500)], SaleStatus::Completed),
                &op,
            )
            .unwrap();
        store
            .record_sale(
                sale_on(day(4, 2), vec![SaleItemInput::new("gone", 1, 1000)], SaleStatus::Completed),
                &op,
            )
            .unwrap();
        store
            .record_sale(
                sale_on(day(4, 3), vec![SaleItemInput::new(&og.id, 9, 1500)], SaleStatus::Pending),
                &op,
            )
            .unwrap();
        store
            .record_expense(NewExpense {
                date: day(4, 15),
                category: ExpenseCategory::Utilities,
                description: "Power bill".to_string(),
                amount_cents: 2000,
            })
            .unwrap();

        let april = monthly_summary(&store, 2026, 4);

        assert_eq!(april.revenue_cents, 7000);
        assert_eq!(april.transactions, 2);
        assert_eq!(april.units_sold, 5);
        // (1500 - 750) × 4 + (1000 - 0) × 1
        assert_eq!(april.gross_profit_cents, 4000);
        assert_eq!(april.expenses_cents, 2000);
        assert_eq!(april.net_profit_cents, 2000);
    }

    #[test]
    fn test_dashboard_compares_with_previous_month() {
        let (mut store, _clock) = test_store();
        let op = Operator::new("op", "Sam");
        store.create_product(new_product("Gelato", 1800, 3)).unwrap();
        store.create_product(new_product("Sour Diesel", 1400, 0)).unwrap();

        store
            .record_sale(
                sale_on(day(3, 10), vec![SaleItemInput::new("x", 1, 10_000)], SaleStatus::Completed),
                &op,
            )
            .unwrap();
        store
            .record_sale(
                sale_on(day(4, 10), vec![SaleItemInput::new("x", 1, 15_000)], SaleStatus::Completed),
                &op,
            )
            .unwrap();

        let dash = dashboard(&store, day(4, 20));

        assert_eq!(dash.revenue.current, 15_000);
        assert_eq!(dash.revenue.previous, 10_000);
        assert_eq!(dash.revenue.percent_change, 50.0);
        assert_eq!(dash.transactions.percent_change, 0.0);
        assert_eq!(dash.low_stock_count, 1);
        assert_eq!(dash.out_of_stock_count, 1);
        assert_eq!(dash.total_products, 2);
    }

    #[test]
    fn test_top_products_by_revenue() {
        let (mut store, _clock) = test_store();
        let op = Operator::new("op", "Sam");
        store
            .record_sale(
                sale_on(
                    day(4, 1),
                    vec![SaleItemInput::new("a", 1, 500), SaleItemInput::new("b", 2, 1000)],
                    SaleStatus::Completed,
                ),
                &op,
            )
            .unwrap();
        store
            .record_sale(
                sale_on(day(4, 2), vec![SaleItemInput::new("a", 10, 500)], SaleStatus::Cancelled),
                &op,
            )
            .unwrap();

        let top = top_products(&store, 1);

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product_id, "b");
        assert_eq!(top[0].units_sold, 2);
        assert_eq!(top[0].revenue_cents, 2000);
    }
}
