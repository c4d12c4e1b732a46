//! # Example Records
//!
//! The fixed data set a fresh install starts with when the database is
//! empty. It is built through the regular store operations, so stock,
//! totals and customer statistics are consistent by construction.

use std::sync::Arc;

use chrono::{DateTime, Days, Utc};

use crate::clock::ManualClock;
use crate::error::CoreResult;
use crate::store::{Store, StoreSnapshot};
use crate::types::{
    ExpenseCategory, MembershipType, NewCustomer, NewExpense, NewProduct, NewSale, Operator,
    PaymentMethod, SaleItemInput, SaleStatus, StockUnit,
};

/// Operator recorded on the example sales' audit entries.
pub fn seed_operator() -> Operator {
    Operator::new("seed", "Example Data")
}

/// Builds the example data set, dated relative to `now`.
pub fn example_snapshot(now: DateTime<Utc>) -> CoreResult<StoreSnapshot> {
    let mut store = Store::new(Arc::new(ManualClock::new(now)));
    let operator = seed_operator();

    let catalog = [
        ("OG Kush", "flower", 1500, 700, 120, StockUnit::Gram),
        ("Blue Dream", "flower", 1200, 550, 85, StockUnit::Gram),
        ("Gelato", "flower", 1800, 900, 8, StockUnit::Gram),
        ("Sour Diesel Pre-Roll", "pre-rolls", 900, 350, 40, StockUnit::Unit),
        ("Live Resin Cart", "concentrates", 4500, 2200, 15, StockUnit::Unit),
        ("Mango Gummies 10pk", "edibles", 2500, 1000, 0, StockUnit::Unit),
    ];

    let mut product_ids = Vec::with_capacity(catalog.len());
    for (name, category, price, cost, stock, unit) in catalog {
        let product = store.create_product(NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            description: None,
            price_cents: price,
            cost_cents: cost,
            stock_quantity: stock,
            stock_unit: unit,
        })?;
        product_ids.push((product.id, price));
    }

    let people = [
        ("Maria Lopez", "maria@example.com", MembershipType::Vip, 15_000),
        ("Devon Price", "devon@example.com", MembershipType::Premium, 2_500),
        ("Alex Chen", "alex@example.com", MembershipType::Regular, 0),
    ];

    let mut customer_ids = Vec::with_capacity(people.len());
    for (name, email, membership, balance) in people {
        let customer = store.create_customer(NewCustomer {
            name: name.to_string(),
            email: Some(email.to_string()),
            phone: None,
            membership,
            balance_cents: balance,
        })?;
        customer_ids.push(customer.id);
    }

    let today = now.date_naive();
    let days_ago = |n: u64| today.checked_sub_days(Days::new(n)).unwrap_or(today);
    let line = |index: usize, quantity: i64| {
        let (id, price) = &product_ids[index];
        SaleItemInput::new(id.clone(), quantity, *price)
    };

    let sales = [
        (40, Some(0), PaymentMethod::Card, vec![line(0, 7), line(3, 2)]),
        (33, Some(1), PaymentMethod::Cash, vec![line(1, 3)]),
        (12, Some(0), PaymentMethod::Transfer, vec![line(4, 1)]),
        (5, None, PaymentMethod::Cash, vec![line(0, 3)]),
        (2, Some(2), PaymentMethod::Card, vec![line(2, 2), line(3, 1)]),
    ];

    for (age, customer, method, items) in sales {
        store.record_sale(
            NewSale {
                date: days_ago(age),
                customer_id: customer.map(|i: usize| customer_ids[i].clone()),
                payment_method: method,
                status: SaleStatus::Completed,
                items,
                notes: None,
            },
            &operator,
        )?;
    }

    store.record_expense(NewExpense {
        date: days_ago(30),
        category: ExpenseCategory::Rent,
        description: "Store rent".to_string(),
        amount_cents: 180_000,
    })?;
    store.record_expense(NewExpense {
        date: days_ago(3),
        category: ExpenseCategory::Inventory,
        description: "Flower restock".to_string(),
        amount_cents: 95_000,
    })?;

    Ok(store.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_example_snapshot_is_consistent() {
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap();
        let snapshot = example_snapshot(now).unwrap();

        assert_eq!(snapshot.products.len(), 6);
        assert_eq!(snapshot.customers.len(), 3);
        assert_eq!(snapshot.sales.len(), 5);
        assert_eq!(snapshot.sale_logs.len(), 5);
        assert!(snapshot.register_sessions.is_empty());

        let og = snapshot
            .products
            .iter()
            .find(|p| p.name == "OG Kush")
            .unwrap();
        assert_eq!(og.stock_quantity, 110);

        let maria = &snapshot.customers[0];
        assert_eq!(maria.visits, 2);
        assert_eq!(maria.total_spent_cents, 7 * 1500 + 2 * 900 + 4500);

        for sale in &snapshot.sales {
            let sum: i64 = sale.items.iter().map(|i| i.line_total_cents).sum();
            assert_eq!(sale.total_cents, sum);
        }
    }
}
