//! # Sales Ledger
//!
//! The source of truth of the back office. Every other aggregate (stock,
//! customer statistics, register expectations) is derived from it.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale / revise_sale / remove_sale                                │
//! │       │                                                                 │
//! │       ├── 1. precondition + validation   (reject → store untouched)     │
//! │       ├── 2. recompute line totals and transaction total                │
//! │       ├── 3. stock deduction             (only on → completed)          │
//! │       ├── 4. write the sale                                             │
//! │       ├── 5. append exactly one SaleLog                                 │
//! │       └── 6. recompute_statistics()      (synchronous cascade)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Asymmetry
//! Stock is deducted when a sale becomes completed and is never put back,
//! not on cancellation and not on deletion.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::inventory::deduct_stock;
use crate::money::Money;
use crate::store::{new_id, Collection, Store};
use crate::types::{
    NewSale, Operator, Sale, SaleItem, SaleItemInput, SaleLog, SaleLogAction, SalePatch,
};
use crate::validation::validate_sale_items;

/// Name snapshot for a line whose product no longer exists.
const UNKNOWN_PRODUCT: &str = "Unknown product";

impl Store {
    // =========================================================================
    // Queries
    // =========================================================================

    /// All sales in the order they were recorded.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    /// Sales ordered by [`Sale::timestamp`], newest first.
    pub fn sales_by_recency(&self) -> Vec<&Sale> {
        let mut sales: Vec<&Sale> = self.sales.iter().collect();
        sales.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        sales
    }

    /// The audit trail, newest first.
    pub fn sale_logs(&self) -> Vec<&SaleLog> {
        self.sale_logs.iter().rev().collect()
    }

    /// Audit entries for one sale, oldest first.
    pub fn logs_for_sale(&self, sale_id: &str) -> Vec<&SaleLog> {
        self.sale_logs
            .iter()
            .filter(|log| log.sale_id == sale_id)
            .collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Records a new sale.
    ///
    /// Client-side totals do not exist on the input: every line total is
    /// `quantity × unit_price` and the sale total is their sum. The server
    /// assigns id and timestamps.
    ///
    /// Time-of-day is the server's UTC time, recorded only when `date` is the
    /// server's current UTC day. A date in another frame (a local calendar day
    /// east or west of UTC) gets no time-of-day, so [`Sale::timestamp`] falls
    /// back to the creation instant and register windows stay correct.
    pub fn record_sale(&mut self, input: NewSale, operator: &Operator) -> CoreResult<Sale> {
        if input.items.is_empty() {
            return Err(CoreError::EmptySale);
        }
        validate_sale_items(&input.items)?;

        let now = self.now();
        let time = (input.date == now.date_naive()).then(|| now.time());
        let items = self.build_items(&input.items, &[]);
        let total_cents = items.iter().map(|i| i.line_total_cents).sum();
        let customer_name = self.customer_name_for(input.customer_id.as_deref());

        let sale = Sale {
            id: new_id(),
            date: input.date,
            time,
            customer_id: input.customer_id,
            customer_name,
            items,
            total_cents,
            payment_method: input.payment_method,
            status: input.status,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        if sale.is_completed() {
            deduct_stock(&mut self.products, &sale.items, now);
            self.mark(Collection::Products);
        }

        let details = format!(
            "Sale created for {}: {} via {} ({})",
            display_customer(&sale.customer_name),
            sale.total(),
            sale.payment_method.as_str(),
            sale.status.as_str(),
        );

        info!(
            sale_id = %sale.id,
            total = %sale.total(),
            payment = sale.payment_method.as_str(),
            status = sale.status.as_str(),
            items = sale.items.len(),
            "Sale recorded"
        );

        self.sales.push(sale.clone());
        self.mark(Collection::Sales);
        self.append_log(SaleLogAction::Create, &sale.id, details, operator, now);
        self.recompute_statistics();

        Ok(sale)
    }

    /// Merges a patch over an existing sale.
    ///
    /// A transition from any other status to completed deducts stock for the
    /// (possibly changed) line items. Leaving completed reverses nothing.
    pub fn revise_sale(
        &mut self,
        id: &str,
        patch: SalePatch,
        operator: &Operator,
    ) -> CoreResult<Sale> {
        let index = self
            .sales
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

        if let Some(items) = &patch.items {
            if items.is_empty() {
                return Err(CoreError::EmptySale);
            }
            validate_sale_items(items)?;
        }

        let now = self.now();
        let before = self.sales[index].clone();
        let mut sale = before.clone();

        if let Some(date) = patch.date {
            sale.date = date;
        }
        if let Some(time) = patch.time {
            sale.time = time;
        }
        if let Some(customer_id) = patch.customer_id {
            sale.customer_name = self.customer_name_for(customer_id.as_deref());
            sale.customer_id = customer_id;
        }
        if let Some(items) = &patch.items {
            sale.items = self.build_items(items, &before.items);
        }
        if let Some(method) = patch.payment_method {
            sale.payment_method = method;
        }
        if let Some(status) = patch.status {
            sale.status = status;
        }
        if let Some(notes) = patch.notes {
            sale.notes = notes;
        }

        for item in &mut sale.items {
            item.line_total_cents = item.quantity * item.unit_price_cents;
        }
        sale.total_cents = sale.items.iter().map(|i| i.line_total_cents).sum();
        sale.updated_at = now;

        if !before.is_completed() && sale.is_completed() {
            deduct_stock(&mut self.products, &sale.items, now);
            self.mark(Collection::Products);
            debug!(sale_id = %id, "Sale completed on revision, stock deducted");
        }

        let details = describe_revision(&before, &sale);

        info!(
            sale_id = %id,
            total = %sale.total(),
            status = sale.status.as_str(),
            "Sale revised"
        );

        self.sales[index] = sale.clone();
        self.mark(Collection::Sales);
        self.append_log(SaleLogAction::Update, id, details, operator, now);
        self.recompute_statistics();

        Ok(sale)
    }

    /// Deletes a sale. Unknown ids are a no-op and write no audit entry.
    pub fn remove_sale(&mut self, id: &str, operator: &Operator) -> Option<Sale> {
        let Some(index) = self.sales.iter().position(|s| s.id == id) else {
            debug!(sale_id = %id, "Removal of unknown sale ignored");
            return None;
        };

        let now = self.now();
        let removed = self.sales.remove(index);
        let details = format!(
            "Sale deleted: customer {}, total {}, date {}, status {}",
            display_customer(&removed.customer_name),
            removed.total(),
            removed.date,
            removed.status.as_str(),
        );

        info!(sale_id = %id, total = %removed.total(), "Sale removed");

        self.mark(Collection::Sales);
        self.append_log(SaleLogAction::Delete, id, details, operator, now);
        self.recompute_statistics();

        Some(removed)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Turns requested lines into sale items with a product name snapshot.
    ///
    /// When a product has been deleted, the name from `previous` lines for
    /// the same product is kept.
    fn build_items(&self, inputs: &[SaleItemInput], previous: &[SaleItem]) -> Vec<SaleItem> {
        inputs
            .iter()
            .map(|input| {
                let product_name = self
                    .product(&input.product_id)
                    .map(|p| p.name.clone())
                    .or_else(|| {
                        previous
                            .iter()
                            .find(|item| item.product_id == input.product_id)
                            .map(|item| item.product_name.clone())
                    })
                    .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());

                SaleItem {
                    product_id: input.product_id.clone(),
                    product_name,
                    quantity: input.quantity,
                    unit_price_cents: input.unit_price_cents,
                    line_total_cents: input.quantity * input.unit_price_cents,
                }
            })
            .collect()
    }

    /// Name snapshot for a linked customer; empty for walk-ins and unknown ids.
    pub(crate) fn customer_name_for(&self, customer_id: Option<&str>) -> String {
        customer_id
            .and_then(|id| self.customer(id))
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn append_log(
        &mut self,
        action: SaleLogAction,
        sale_id: &str,
        details: String,
        operator: &Operator,
        timestamp: DateTime<Utc>,
    ) {
        self.sale_logs.push(SaleLog {
            id: new_id(),
            action,
            sale_id: sale_id.to_string(),
            details,
            operator: operator.clone(),
            timestamp,
        });
        self.mark(Collection::SaleLogs);
    }
}

fn display_customer(name: &str) -> &str {
    if name.is_empty() {
        "walk-in"
    } else {
        name
    }
}

/// Human-readable summary of the tracked fields that changed.
fn describe_revision(before: &Sale, after: &Sale) -> String {
    let mut changes = Vec::new();

    if before.customer_id != after.customer_id {
        changes.push(format!(
            "customer {} → {}",
            display_customer(&before.customer_name),
            display_customer(&after.customer_name)
        ));
    }
    if before.total_cents != after.total_cents {
        changes.push(format!(
            "total {} → {}",
            Money::from_cents(before.total_cents),
            Money::from_cents(after.total_cents)
        ));
    }
    if before.status != after.status {
        changes.push(format!(
            "status {} → {}",
            before.status.as_str(),
            after.status.as_str()
        ));
    }
    if before.payment_method != after.payment_method {
        changes.push(format!(
            "payment {} → {}",
            before.payment_method.as_str(),
            after.payment_method.as_str()
        ));
    }

    if changes.is_empty() {
        "Sale updated: no tracked field changed".to_string()
    } else {
        format!("Sale updated: {}", changes.join("; "))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
