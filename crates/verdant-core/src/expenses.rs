//! # Expenses
//!
//! Operating costs. They never touch the sales ledger and only feed the
//! net-profit figure in [`crate::stats`].

use tracing::{debug, info};

use crate::error::CoreResult;
use crate::store::{new_id, Collection, Store};
use crate::types::{Expense, ExpensePatch, NewExpense};
use crate::validation::{validate_expense_patch, validate_new_expense};

impl Store {
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Expenses ordered by date, newest first.
    pub fn expenses_by_date(&self) -> Vec<&Expense> {
        let mut expenses: Vec<&Expense> = self.expenses.iter().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        expenses
    }

    pub fn record_expense(&mut self, input: NewExpense) -> CoreResult<Expense> {
        validate_new_expense(&input)?;

        let expense = Expense {
            id: new_id(),
            date: input.date,
            category: input.category,
            description: input.description.trim().to_string(),
            amount_cents: input.amount_cents,
            created_at: self.now(),
        };

        info!(
            expense_id = %expense.id,
            category = ?expense.category,
            amount = %expense.amount(),
            "Expense recorded"
        );

        self.expenses.push(expense.clone());
        self.mark(Collection::Expenses);
        Ok(expense)
    }

    /// Applies a patch. Returns `Ok(None)` when the expense does not exist.
    pub fn update_expense(&mut self, id: &str, patch: ExpensePatch) -> CoreResult<Option<Expense>> {
        validate_expense_patch(&patch)?;

        let Some(expense) = self.expenses.iter_mut().find(|e| e.id == id) else {
            debug!(expense_id = %id, "Update of unknown expense ignored");
            return Ok(None);
        };

        if let Some(date) = patch.date {
            expense.date = date;
        }
        if let Some(category) = patch.category {
            expense.category = category;
        }
        if let Some(description) = patch.description {
            expense.description = description.trim().to_string();
        }
        if let Some(amount) = patch.amount_cents {
            expense.amount_cents = amount;
        }
        let updated = expense.clone();

        info!(expense_id = %id, "Expense updated");
        self.mark(Collection::Expenses);
        Ok(Some(updated))
    }

    pub fn delete_expense(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);

        let removed = self.expenses.len() != before;
        if removed {
            info!(expense_id = %id, "Expense deleted");
            self.mark(Collection::Expenses);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use crate::store::tests::test_store;
    use crate::types::{ExpenseCategory, ExpensePatch, NewExpense};
    use chrono::NaiveDate;

    fn rent(day: u32) -> NewExpense {
        NewExpense {
            date: NaiveDate::from_ymd_opt(2026, 4, day).unwrap(),
            category: ExpenseCategory::Rent,
            description: "April rent".to_string(),
            amount_cents: 250_000,
        }
    }

    #[test]
    fn test_record_update_delete() {
        let (mut store, _clock) = test_store();
        let expense = store.record_expense(rent(1)).unwrap();

        let patch = ExpensePatch {
            amount_cents: Some(260_000),
            ..Default::default()
        };
        let updated = store.update_expense(&expense.id, patch).unwrap().unwrap();
        assert_eq!(updated.amount_cents, 260_000);
        assert_eq!(store.expense(&expense.id), Some(&updated));

        assert!(store.delete_expense(&expense.id));
        assert!(!store.delete_expense(&expense.id));
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let (mut store, _clock) = test_store();
        let mut input = rent(1);
        input.amount_cents = 0;

        assert!(store.record_expense(input).is_err());
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_expenses_by_date_newest_first() {
        let (mut store, _clock) = test_store();
        store.record_expense(rent(1)).unwrap();
        store.record_expense(rent(20)).unwrap();

        let days: Vec<u32> = store
            .expenses_by_date()
            .iter()
            .map(|e| chrono::Datelike::day(&e.date))
            .collect();
        assert_eq!(days, vec![20, 1]);
    }
}
