//! # Stock Deduction
//!
//! Applied once per sale-completion transition:
//!
//! ```text
//! for each line item:
//!     product missing?  ──► warn, skip (earlier lines stay deducted)
//!     stock = max(stock - quantity, 0)
//!     status = for_quantity(stock)   0 → out, 1..9 → low, ≥10 → in
//! ```
//!
//! Calling it twice for the same sale deducts twice; the sales ledger owns
//! the at-most-once guarantee. Deduction is never reversed.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::types::{Product, SaleItem, StockStatus};

/// Stock left after selling `quantity`, floored at zero.
///
/// ## Example
/// ```rust
/// use verdant_core::inventory::remaining_stock;
///
/// assert_eq!(remaining_stock(12, 5), 7);
/// assert_eq!(remaining_stock(2, 3), 0);
/// ```
pub fn remaining_stock(current: i64, quantity: i64) -> i64 {
    (current - quantity).max(0)
}

/// Deducts every line item from the catalog, best effort.
///
/// Returns the number of products that were updated.
pub(crate) fn deduct_stock(
    products: &mut [Product],
    items: &[SaleItem],
    now: DateTime<Utc>,
) -> usize {
    let mut updated = 0;

    for item in items {
        let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) else {
            warn!(
                product_id = %item.product_id,
                quantity = item.quantity,
                "Product not found during stock deduction, skipping line"
            );
            continue;
        };

        let before = product.stock_quantity;
        product.stock_quantity = remaining_stock(before, item.quantity);
        product.status = StockStatus::for_quantity(product.stock_quantity);
        product.updated_at = now;
        updated += 1;

        debug!(
            product_id = %product.id,
            before,
            after = product.stock_quantity,
            status = ?product.status,
            "Stock deducted"
        );
    }

    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StockUnit;

    fn product(id: &str, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: id.to_string(),
            category: "flower".to_string(),
            description: None,
            price_cents: 1000,
            cost_cents: 400,
            stock_quantity: stock,
            stock_unit: StockUnit::Gram,
            status: StockStatus::for_quantity(stock),
            created_at: now,
            updated_at: now,
        }
    }

    fn line(product_id: &str, quantity: i64) -> SaleItem {
        SaleItem {
            product_id: product_id.to_string(),
            product_name: product_id.to_string(),
            quantity,
            unit_price_cents: 1000,
            line_total_cents: quantity * 1000,
        }
    }

    #[test]
    fn test_deduction_skips_missing_products_and_keeps_the_rest() {
        let mut products = vec![product("a", 20), product("b", 4)];
        let items = vec![line("a", 5), line("ghost", 1), line("b", 9)];

        let updated = deduct_stock(&mut products, &items, Utc::now());

        assert_eq!(updated, 2);
        assert_eq!(products[0].stock_quantity, 15);
        assert_eq!(products[0].status, StockStatus::InStock);
        assert_eq!(products[1].stock_quantity, 0);
        assert_eq!(products[1].status, StockStatus::OutOfStock);
    }

    #[test]
    fn test_remaining_stock_never_negative() {
        assert_eq!(remaining_stock(0, 1), 0);
        assert_eq!(remaining_stock(10, 10), 0);
        assert_eq!(remaining_stock(10, 1), 9);
    }
}
