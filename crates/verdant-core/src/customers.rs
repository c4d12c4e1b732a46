//! # Customer Ledger
//!
//! Customer records, prepaid balances and purchase statistics.
//!
//! ## Derived Statistics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  recompute_statistics()  (full recompute, never incremental)            │
//! │                                                                         │
//! │  every customer:  total_spent = 0, visits = 0, last_visit kept          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  every COMPLETED sale with customer_id = customer.id:                   │
//! │        total_spent += sale.total                                        │
//! │        visits      += 1                                                 │
//! │        last_visit   = sale.date   if strictly more recent               │
//! │                                                                         │
//! │  Run after every sales ledger change. Idempotent.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Balance
//! Credits add unconditionally. Debits clamp at zero: a debit larger than
//! the balance clears it instead of failing.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::store::{new_id, Collection, Store};
use crate::types::{BalanceDirection, Customer, CustomerPatch, NewCustomer};
use crate::validation::{validate_customer_patch, validate_new_customer, validate_positive_cents};

impl Store {
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn create_customer(&mut self, input: NewCustomer) -> CoreResult<Customer> {
        validate_new_customer(&input)?;

        let now = self.now();
        let customer = Customer {
            id: new_id(),
            name: input.name.trim().to_string(),
            email: input.email,
            phone: input.phone,
            membership: input.membership,
            balance_cents: input.balance_cents,
            total_spent_cents: 0,
            visits: 0,
            last_visit: None,
            created_at: now,
            updated_at: now,
        };
        let id = customer.id.clone();

        info!(customer_id = %id, name = %customer.name, "Customer created");

        self.customers.push(customer);
        self.mark(Collection::Customers);
        self.recompute_statistics();

        self.customer(&id)
            .cloned()
            .ok_or(CoreError::CustomerNotFound(id))
    }

    /// Applies a patch. Returns `Ok(None)` when the customer does not exist.
    pub fn update_customer(
        &mut self,
        id: &str,
        patch: CustomerPatch,
    ) -> CoreResult<Option<Customer>> {
        validate_customer_patch(&patch)?;

        let now = self.now();
        let Some(customer) = self.customers.iter_mut().find(|c| c.id == id) else {
            debug!(customer_id = %id, "Update of unknown customer ignored");
            return Ok(None);
        };

        if let Some(name) = patch.name {
            customer.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            customer.email = email;
        }
        if let Some(phone) = patch.phone {
            customer.phone = phone;
        }
        if let Some(membership) = patch.membership {
            customer.membership = membership;
        }
        if let Some(balance) = patch.balance_cents {
            customer.balance_cents = balance;
        }
        customer.updated_at = now;

        info!(customer_id = %id, "Customer updated");

        self.mark(Collection::Customers);
        self.recompute_statistics();
        Ok(self.customer(id).cloned())
    }

    /// Deletes a customer. Their sales keep the name snapshot.
    pub fn delete_customer(&mut self, id: &str) -> bool {
        let before = self.customers.len();
        self.customers.retain(|c| c.id != id);

        let removed = self.customers.len() != before;
        if removed {
            info!(customer_id = %id, "Customer deleted");
            self.mark(Collection::Customers);
            self.recompute_statistics();
        }
        removed
    }

    /// Credits or debits a customer's prepaid balance.
    ///
    /// ## Rules
    /// - `amount` must be positive
    /// - A debit larger than the balance clamps the balance to zero
    ///
    /// ## Example
    /// ```text
    /// balance $20.00, debit $35.00  →  balance $0.00
    /// balance $20.00, credit $5.00  →  balance $25.00
    /// ```
    pub fn adjust_balance(
        &mut self,
        customer_id: &str,
        amount: Money,
        direction: BalanceDirection,
    ) -> CoreResult<Customer> {
        validate_positive_cents("amount", amount.cents())?;

        let now = self.now();
        let customer = self
            .customers
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?;

        let before = customer.balance();
        let after = match direction {
            BalanceDirection::Credit => before + amount,
            BalanceDirection::Debit => (before - amount).clamp_non_negative(),
        };
        customer.balance_cents = after.cents();
        customer.updated_at = now;

        let updated = customer.clone();
        info!(
            customer_id = %customer_id,
            direction = ?direction,
            amount = %amount,
            before = %before,
            after = %after,
            "Customer balance adjusted"
        );

        self.mark(Collection::Customers);
        Ok(updated)
    }

    /// Rebuilds every customer's statistics from the sales ledger.
    pub fn recompute_statistics(&mut self) {
        let mut totals: HashMap<&str, (i64, u32, Option<NaiveDate>)> = HashMap::new();

        for sale in self.sales.iter().filter(|s| s.is_completed()) {
            let Some(customer_id) = sale.customer_id.as_deref() else {
                continue;
            };
            let entry = totals.entry(customer_id).or_insert((0, 0, None));
            entry.0 += sale.total_cents;
            entry.1 += 1;
            if entry.2.map_or(true, |latest| sale.date > latest) {
                entry.2 = Some(sale.date);
            }
        }

        let mut changed = false;
        for customer in &mut self.customers {
            let (spent, visits, latest) = totals
                .get(customer.id.as_str())
                .copied()
                .unwrap_or((0, 0, None));

            let last_visit = match (customer.last_visit, latest) {
                (Some(current), Some(latest)) if latest > current => Some(latest),
                (None, Some(latest)) => Some(latest),
                (current, _) => current,
            };

            if customer.total_spent_cents != spent
                || customer.visits != visits
                || customer.last_visit != last_visit
            {
                customer.total_spent_cents = spent;
                customer.visits = visits;
                customer.last_visit = last_visit;
                changed = true;
            }
        }

        if changed {
            self.mark(Collection::Customers);
        }
        debug!(customers = self.customers.len(), changed, "Customer statistics recomputed");
    }
}

#[cfg(test)]
mod tests {
    use crate::money::Money;
    use crate::store::tests::test_store;
    use crate::types::{
        BalanceDirection, CustomerPatch, MembershipType, NewCustomer, NewSale, Operator,
        PaymentMethod, SaleItemInput, SaleStatus,
    };
    use chrono::NaiveDate;

    fn jane() -> NewCustomer {
        NewCustomer {
            name: "Jane Doe".to_string(),
            email: Some("jane@example.com".to_string()),
            phone: None,
            membership: MembershipType::Premium,
            balance_cents: 2000,
        }
    }

    fn sale_for(customer_id: &str, day: u32, cents: i64, status: SaleStatus) -> NewSale {
        NewSale {
            date: NaiveDate::from_ymd_opt(2026, 4, day).unwrap(),
            customer_id: Some(customer_id.to_string()),
            payment_method: PaymentMethod::Card,
            status,
            items: vec![SaleItemInput::new("p1", 1, cents)],
            notes: None,
        }
    }

    #[test]
    fn test_debit_clamps_at_zero() {
        let (mut store, _clock) = test_store();
        let customer = store.create_customer(jane()).unwrap();

        let after = store
            .adjust_balance(&customer.id, Money::from_dollars(35), BalanceDirection::Debit)
            .unwrap();

        assert_eq!(after.balance_cents, 0);
    }

    #[test]
    fn test_credit_adds_unconditionally() {
        let (mut store, _clock) = test_store();
        let customer = store.create_customer(jane()).unwrap();

        let after = store
            .adjust_balance(&customer.id, Money::from_dollars(5), BalanceDirection::Credit)
            .unwrap();

        assert_eq!(after.balance(), Money::from_dollars(25));
    }

    #[test]
    fn test_adjust_balance_rejects_non_positive_amount_and_unknown_customer() {
        let (mut store, _clock) = test_store();
        let customer = store.create_customer(jane()).unwrap();

        assert!(store
            .adjust_balance(&customer.id, Money::zero(), BalanceDirection::Credit)
            .is_err());
        assert!(store
            .adjust_balance("nobody", Money::from_dollars(1), BalanceDirection::Credit)
            .is_err());
        assert_eq!(store.customer(&customer.id).unwrap().balance_cents, 2000);
    }

    #[test]
    fn test_statistics_count_only_completed_sales() {
        let (mut store, _clock) = test_store();
        let operator = Operator::new("op", "Sam");
        let customer = store.create_customer(jane()).unwrap();

        store
            .record_sale(sale_for(&customer.id, 1, 4500, SaleStatus::Completed), &operator)
            .unwrap();
        store
            .record_sale(sale_for(&customer.id, 3, 3000, SaleStatus::Completed), &operator)
            .unwrap();
        store
            .record_sale(sale_for(&customer.id, 9, 9900, SaleStatus::Pending), &operator)
            .unwrap();
        store
            .record_sale(sale_for(&customer.id, 10, 100, SaleStatus::Cancelled), &operator)
            .unwrap();

        let stats = store.customer(&customer.id).unwrap();
        assert_eq!(stats.total_spent_cents, 7500);
        assert_eq!(stats.visits, 2);
        assert_eq!(stats.last_visit, NaiveDate::from_ymd_opt(2026, 4, 3));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let (mut store, _clock) = test_store();
        let operator = Operator::new("op", "Sam");
        let customer = store.create_customer(jane()).unwrap();
        store
            .record_sale(sale_for(&customer.id, 2, 4500, SaleStatus::Completed), &operator)
            .unwrap();

        store.recompute_statistics();
        let first = store.customers().to_vec();
        store.drain_changes();

        store.recompute_statistics();

        assert_eq!(store.customers(), first.as_slice());
        assert!(!store.has_changes());
    }

    #[test]
    fn test_last_visit_survives_sale_removal() {
        let (mut store, _clock) = test_store();
        let operator = Operator::new("op", "Sam");
        let customer = store.create_customer(jane()).unwrap();
        let sale = store
            .record_sale(sale_for(&customer.id, 5, 4500, SaleStatus::Completed), &operator)
            .unwrap();

        store.remove_sale(&sale.id, &operator);

        let stats = store.customer(&customer.id).unwrap();
        assert_eq!(stats.total_spent_cents, 0);
        assert_eq!(stats.visits, 0);
        assert_eq!(stats.last_visit, NaiveDate::from_ymd_opt(2026, 4, 5));
    }

    #[test]
    fn test_patch_cannot_set_negative_balance() {
        let (mut store, _clock) = test_store();
        let customer = store.create_customer(jane()).unwrap();
        let patch = CustomerPatch {
            balance_cents: Some(-100),
            ..Default::default()
        };

        assert!(store.update_customer(&customer.id, patch).is_err());
        assert_eq!(store.customer(&customer.id).unwrap().balance_cents, 2000);
    }

    #[test]
    fn test_update_and_delete_missing_are_noops() {
        let (mut store, _clock) = test_store();

        assert!(store
            .update_customer("missing", CustomerPatch::default())
            .unwrap()
            .is_none());
        assert!(!store.delete_customer("missing"));
    }
}
