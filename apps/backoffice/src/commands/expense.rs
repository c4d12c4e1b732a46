//! # Expense Commands
//!
//! Operating costs (rent, payroll, restocking). They only feed net profit
//! on the dashboard.

use tracing::debug;

use verdant_core::{Expense, ExpensePatch, NewExpense};

use crate::error::ApiError;
use crate::state::StoreState;

/// Expenses, newest date first.
pub async fn list_expenses(store: &StoreState) -> Result<Vec<Expense>, ApiError> {
    let expenses: Vec<Expense> =
        store.with_store(|s| s.expenses_by_date().into_iter().cloned().collect());
    debug!(count = expenses.len(), "list_expenses");
    Ok(expenses)
}

pub async fn record_expense(store: &StoreState, input: NewExpense) -> Result<Expense, ApiError> {
    debug!(category = ?input.category, amount = input.amount_cents, "record_expense");
    Ok(store.with_store_mut(|s| s.record_expense(input))?)
}

/// Applies `patch`. `None` when no expense has that id.
pub async fn update_expense(
    store: &StoreState,
    id: String,
    patch: ExpensePatch,
) -> Result<Option<Expense>, ApiError> {
    debug!(expense_id = %id, "update_expense");
    Ok(store.with_store_mut(|s| s.update_expense(&id, patch))?)
}

pub async fn delete_expense(store: &StoreState, id: String) -> Result<bool, ApiError> {
    debug!(expense_id = %id, "delete_expense");
    Ok(store.with_store_mut(|s| s.delete_expense(&id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::test_app;
    use chrono::NaiveDate;
    use verdant_core::ExpenseCategory;

    fn input(day: u32, amount_cents: i64) -> NewExpense {
        NewExpense {
            date: NaiveDate::from_ymd_opt(2026, 4, day).unwrap(),
            category: ExpenseCategory::Utilities,
            description: "Electric bill".to_string(),
            amount_cents,
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (app, _) = test_app().await;
        record_expense(&app.store, input(3, 12_000)).await.unwrap();
        record_expense(&app.store, input(9, 4_000)).await.unwrap();

        let expenses = list_expenses(&app.store).await.unwrap();

        assert_eq!(expenses[0].amount_cents, 4_000);
        assert_eq!(expenses[1].amount_cents, 12_000);
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected() {
        let (app, _) = test_app().await;

        let err = record_expense(&app.store, input(3, 0)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_update_and_delete_persist() {
        let (app, _) = test_app().await;
        let expense = record_expense(&app.store, input(3, 12_000)).await.unwrap();

        let updated = update_expense(
            &app.store,
            expense.id.clone(),
            ExpensePatch {
                amount_cents: Some(13_500),
                ..ExpensePatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.amount_cents, 13_500);

        app.store.flush().await;
        let stored = app.db.inner().expenses().get(&expense.id).await.unwrap().unwrap();
        assert_eq!(stored.amount_cents, 13_500);

        assert!(delete_expense(&app.store, expense.id.clone()).await.unwrap());
        assert!(!delete_expense(&app.store, expense.id).await.unwrap());
        app.store.flush().await;
        assert_eq!(app.db.inner().expenses().count().await.unwrap(), 0);
    }
}
