//! # Sale Commands
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  checkout(NewSale { customer: Jane, payment: cash, total: $45.00 })     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Jane's balance $20.00 ──► split: $20.00 balance + $25.00 cash          │
//! │       │                    (payment stays cash; a balance that covers   │
//! │       │                     the total would switch it to balance)       │
//! │       ▼                                                                 │
//! │  record_sale ── stock deducted, "Create" log, customer stats            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  adjust_balance(Jane, $20.00, debit)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutReceipt ──► Sales, SaleLogs, Products, Customers queued        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use verdant_core::{CheckoutReceipt, NewSale, Operator, Sale, SaleLog, SalePatch, SaleStatus};

use super::resolve_operator;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::StoreState;

/// Filters for [`list_sales`]. Every field is optional; dates are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleQuery {
    #[ts(as = "Option<String>")]
    pub from: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub to: Option<NaiveDate>,
    pub customer_id: Option<String>,
    pub status: Option<SaleStatus>,
}

impl SaleQuery {
    fn matches(&self, sale: &Sale) -> bool {
        self.from.map_or(true, |from| sale.date >= from)
            && self.to.map_or(true, |to| sale.date <= to)
            && self
                .customer_id
                .as_deref()
                .map_or(true, |id| sale.customer_id.as_deref() == Some(id))
            && self.status.map_or(true, |status| sale.status == status)
    }
}

/// Records a sale, drawing on the customer's balance first for cash sales.
pub async fn checkout(
    store: &StoreState,
    config: &AppConfig,
    input: NewSale,
    operator: Option<Operator>,
) -> Result<CheckoutReceipt, ApiError> {
    let operator = resolve_operator(operator, config);
    debug!(
        items = input.items.len(),
        customer_id = ?input.customer_id,
        operator = %operator.id,
        "checkout"
    );

    Ok(store.with_store_mut(|s| verdant_core::checkout(s, input, &operator))?)
}

pub async fn revise_sale(
    store: &StoreState,
    config: &AppConfig,
    id: String,
    patch: SalePatch,
    operator: Option<Operator>,
) -> Result<Sale, ApiError> {
    let operator = resolve_operator(operator, config);
    debug!(sale_id = %id, operator = %operator.id, "revise_sale");
    Ok(store.with_store_mut(|s| s.revise_sale(&id, patch, &operator))?)
}

/// Removes a sale. `None` when there was nothing to remove.
pub async fn remove_sale(
    store: &StoreState,
    config: &AppConfig,
    id: String,
    operator: Option<Operator>,
) -> Result<Option<Sale>, ApiError> {
    let operator = resolve_operator(operator, config);
    debug!(sale_id = %id, operator = %operator.id, "remove_sale");
    Ok(store.with_store_mut(|s| s.remove_sale(&id, &operator)))
}

/// Sales matching `query`, most recent first.
pub async fn list_sales(store: &StoreState, query: SaleQuery) -> Result<Vec<Sale>, ApiError> {
    let sales: Vec<Sale> = store.with_store(|s| {
        s.sales_by_recency()
            .into_iter()
            .filter(|sale| query.matches(sale))
            .cloned()
            .collect()
    });
    debug!(?query, results = sales.len(), "list_sales");
    Ok(sales)
}

/// The audit trail: one sale's history oldest first, or every entry newest
/// first.
pub async fn sale_logs(
    store: &StoreState,
    sale_id: Option<String>,
) -> Result<Vec<SaleLog>, ApiError> {
    let logs: Vec<SaleLog> = store.with_store(|s| match &sale_id {
        Some(id) => s.logs_for_sale(id).into_iter().cloned().collect(),
        None => s.sale_logs().into_iter().cloned().collect(),
    });
    debug!(sale_id = ?sale_id, count = logs.len(), "sale_logs");
    Ok(logs)
}
