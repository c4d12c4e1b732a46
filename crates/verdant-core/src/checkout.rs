//! # Checkout
//!
//! Records a sale after applying the balance-preference rule.
//!
//! ## Balance Preference (cash sales with a known customer only)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  balance B, total T, method = cash                                      │
//! │                                                                         │
//! │  B ≥ T      ──► method = balance, B -= T, note "paid from balance"     │
//! │  0 < B < T  ──► method stays cash, B = 0, note "split payment"         │
//! │  B = 0      ──► nothing changes                                         │
//! │                                                                         │
//! │  card / transfer / no customer ──► rule does not fire                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sale is recorded first and the balance debited after it, so a
//! rejected sale never touches the customer's balance.

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::store::Store;
use crate::types::{BalanceDirection, NewSale, Operator, PaymentMethod, Sale};
use crate::validation::validate_sale_items;

/// Outcome of a checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutReceipt {
    pub sale: Sale,
    /// How much of the total came out of the customer's balance.
    pub balance_applied_cents: i64,
    /// The note added to the sale when the balance was used.
    pub note: Option<String>,
}

impl CheckoutReceipt {
    pub fn balance_applied(&self) -> Money {
        Money::from_cents(self.balance_applied_cents)
    }
}

/// Records `input` as a sale, preferring the customer's prepaid balance over
/// cash when one is available.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use verdant_core::{checkout, NewCustomer, NewSale, Operator, PaymentMethod};
/// use verdant_core::{SaleItemInput, SaleStatus, Store, SystemClock};
///
/// let mut store = Store::new(Arc::new(SystemClock));
/// let operator = Operator::new("op-1", "Sam");
/// let jane = store
///     .create_customer(NewCustomer {
///         name: "Jane".into(),
///         email: None,
///         phone: None,
///         membership: Default::default(),
///         balance_cents: 10_000,
///     })
///     .unwrap();
///
/// let receipt = checkout(
///     &mut store,
///     NewSale {
///         date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
///         customer_id: Some(jane.id.clone()),
///         payment_method: PaymentMethod::Cash,
///         status: SaleStatus::Completed,
///         items: vec![SaleItemInput::new("p1", 2, 2000)],
///         notes: None,
///     },
///     &operator,
/// )
/// .unwrap();
///
/// assert_eq!(receipt.sale.payment_method, PaymentMethod::Balance);
/// assert_eq!(store.customer(&jane.id).unwrap().balance_cents, 6_000);
/// ```
pub fn checkout(store: &mut Store, mut input: NewSale, operator: &Operator) -> CoreResult<CheckoutReceipt> {
    // Bounded lines first; the total below relies on it.
    validate_sale_items(&input.items)?;

    let total: Money = input
        .items
        .iter()
        .map(|item| Money::from_cents(item.unit_price_cents).multiply_quantity(item.quantity))
        .sum();

    let balance = match (&input.customer_id, input.payment_method) {
        (Some(customer_id), PaymentMethod::Cash) => store
            .customer(customer_id)
            .map(|c| (c.id.clone(), c.balance())),
        _ => None,
    };

    let mut debit = None;
    let mut note = None;

    if let Some((customer_id, balance)) = balance {
        if balance.is_positive() && total.is_positive() {
            if balance >= total {
                input.payment_method = PaymentMethod::Balance;
                note = Some(format!("Paid in full from customer balance ({total})"));
                debit = Some((customer_id, total));
            } else {
                let cash = total - balance;
                note = Some(format!(
                    "Split payment: {balance} from customer balance, {cash} in cash"
                ));
                debit = Some((customer_id, balance));
            }
        }
    }

    if let Some(note) = &note {
        input.notes = Some(match input.notes.take() {
            Some(existing) if !existing.trim().is_empty() => format!("{existing}\n{note}"),
            _ => note.clone(),
        });
    }

    let sale = store.record_sale(input, operator)?;

    let mut applied = Money::zero();
    if let Some((customer_id, amount)) = debit {
        store.adjust_balance(&customer_id, amount, BalanceDirection::Debit)?;
        applied = amount;
        info!(
            sale_id = %sale.id,
            customer_id = %customer_id,
            applied = %amount,
            "Customer balance applied at checkout"
        );
    }

    Ok(CheckoutReceipt {
        sale,
        balance_applied_cents: applied.cents(),
        note,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
