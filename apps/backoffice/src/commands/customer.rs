//! # Customer Commands
//!
//! Customer CRUD and manual balance adjustments (top-ups, refunds to
//! store credit, corrections).

use tracing::debug;

use verdant_core::{BalanceDirection, Customer, CustomerPatch, Money, NewCustomer};

use crate::error::ApiError;
use crate::state::StoreState;

/// Lists customers, optionally filtered by a name, email or phone fragment.
pub async fn list_customers(
    store: &StoreState,
    query: Option<String>,
) -> Result<Vec<Customer>, ApiError> {
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let customers: Vec<Customer> = store.with_store(|s| {
        s.customers()
            .iter()
            .filter(|c| match &needle {
                Some(n) => {
                    c.name.to_lowercase().contains(n)
                        || c.email.as_deref().is_some_and(|e| e.to_lowercase().contains(n))
                        || c.phone.as_deref().is_some_and(|p| p.contains(n.as_str()))
                }
                None => true,
            })
            .cloned()
            .collect()
    });

    debug!(query = ?needle, results = customers.len(), "list_customers");
    Ok(customers)
}

pub async fn create_customer(
    store: &StoreState,
    input: NewCustomer,
) -> Result<Customer, ApiError> {
    debug!(name = %input.name, "create_customer");
    Ok(store.with_store_mut(|s| s.create_customer(input))?)
}

/// Applies `patch`. `None` when no customer has that id.
pub async fn update_customer(
    store: &StoreState,
    id: String,
    patch: CustomerPatch,
) -> Result<Option<Customer>, ApiError> {
    debug!(customer_id = %id, "update_customer");
    Ok(store.with_store_mut(|s| s.update_customer(&id, patch))?)
}

pub async fn delete_customer(store: &StoreState, id: String) -> Result<bool, ApiError> {
    debug!(customer_id = %id, "delete_customer");
    Ok(store.with_store_mut(|s| s.delete_customer(&id)))
}

/// Credits or debits a customer's balance. A debit never takes the balance
/// below zero.
pub async fn adjust_balance(
    store: &StoreState,
    customer_id: String,
    amount_cents: i64,
    direction: BalanceDirection,
) -> Result<Customer, ApiError> {
    debug!(customer_id = %customer_id, amount = amount_cents, ?direction, "adjust_balance");
    Ok(store.with_store_mut(|s| {
        s.adjust_balance(&customer_id, Money::from_cents(amount_cents), direction)
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::test_app;
    use verdant_core::MembershipType;

    fn input(name: &str, email: Option<&str>, balance_cents: i64) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: None,
            membership: MembershipType::Regular,
            balance_cents,
        }
    }

    #[tokio::test]
    async fn test_search_by_email() {
        let (app, _) = test_app().await;
        create_customer(&app.store, input("Jane Doe", Some("jane@example.com"), 0))
            .await
            .unwrap();
        create_customer(&app.store, input("Sam Roe", None, 0)).await.unwrap();

        let found = list_customers(&app.store, Some("EXAMPLE".into())).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_adjust_balance_credit_then_clamped_debit() {
        let (app, _) = test_app().await;
        let jane = create_customer(&app.store, input("Jane Doe", None, 2000)).await.unwrap();

        let credited = adjust_balance(&app.store, jane.id.clone(), 500, BalanceDirection::Credit)
            .await
            .unwrap();
        assert_eq!(credited.balance_cents, 2500);

        let debited = adjust_balance(&app.store, jane.id.clone(), 9000, BalanceDirection::Debit)
            .await
            .unwrap();
        assert_eq!(debited.balance_cents, 0);

        app.store.flush().await;
        let stored = app.db.inner().customers().get(&jane.id).await.unwrap().unwrap();
        assert_eq!(stored.balance_cents, 0);
    }

    #[tokio::test]
    async fn test_adjust_balance_rejects_unknown_customer_and_zero_amount() {
        let (app, _) = test_app().await;
        let jane = create_customer(&app.store, input("Jane Doe", None, 100)).await.unwrap();

        let err = adjust_balance(&app.store, "ghost".into(), 100, BalanceDirection::Credit)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = adjust_balance(&app.store, jane.id, 0, BalanceDirection::Credit)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_negative_balance_patch_is_rejected() {
        let (app, _) = test_app().await;
        let jane = create_customer(&app.store, input("Jane Doe", None, 100)).await.unwrap();

        let err = update_customer(
            &app.store,
            jane.id,
            CustomerPatch {
                balance_cents: Some(-1),
                ..CustomerPatch::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
