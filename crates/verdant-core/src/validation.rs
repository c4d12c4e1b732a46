//! # Validation Module
//!
//! Business-rule validation for inputs and patches.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms                                                     │
//! │  ├── Shape checks (required inputs, number fields)                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantities positive, prices and balances non-negative            │
//! │  └── Runs before any mutation → rejected calls change nothing          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Recomputes every derived value (totals, status, statistics)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use verdant_core::validation::{validate_name, validate_quantity};
//!
//! assert!(validate_name("name", "OG Kush").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{
    CustomerPatch, ExpensePatch, NewCustomer, NewExpense, NewProduct, ProductPatch,
    SaleItemInput,
};
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_LINES, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (product, customer, expense description).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an optional email address.
///
/// Only the shape is checked: one `@` with text on both sides.
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email else {
        return Ok(());
    };

    let mut parts = email.trim().split('@');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && domain.contains('.')
    );

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a non-negative cent amount (prices, costs, balances, floats).
///
/// ## Example
/// ```rust
/// use verdant_core::validation::validate_non_negative_cents;
///
/// assert!(validate_non_negative_cents("price", 1099).is_ok());
/// assert!(validate_non_negative_cents("price", 0).is_ok());
/// assert!(validate_non_negative_cents("price", -100).is_err());
/// ```
pub fn validate_non_negative_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price or cost: non-negative and at most
/// [`MAX_UNIT_PRICE_CENTS`].
///
/// ## Example
/// ```rust
/// use verdant_core::validation::validate_price;
/// use verdant_core::MAX_UNIT_PRICE_CENTS;
///
/// assert!(validate_price("price", 1500).is_ok());
/// assert!(validate_price("price", MAX_UNIT_PRICE_CENTS + 1).is_err());
/// ```
pub fn validate_price(field: &str, cents: i64) -> ValidationResult<()> {
    validate_non_negative_cents(field, cents)?;

    if cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a strictly positive cent amount (expenses, balance adjustments).
pub fn validate_positive_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(quantity: i64) -> ValidationResult<()> {
    validate_non_negative_cents("stock quantity", quantity)
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every requested line item of a sale.
///
/// An empty list is a precondition failure (`CoreError::EmptySale`) and is
/// checked by the ledger itself, not here.
pub fn validate_sale_items(items: &[SaleItemInput]) -> ValidationResult<()> {
    if items.len() > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "line items".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    for item in items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product id".to_string(),
            });
        }
        validate_quantity(item.quantity)?;
        validate_price("unit price", item.unit_price_cents)?;
    }

    Ok(())
}

pub fn validate_new_product(input: &NewProduct) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_name("category", &input.category)?;
    validate_price("price", input.price_cents)?;
    validate_price("cost", input.cost_cents)?;
    validate_stock(input.stock_quantity)
}

pub fn validate_product_patch(patch: &ProductPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_name("name", name)?;
    }
    if let Some(category) = &patch.category {
        validate_name("category", category)?;
    }
    if let Some(price) = patch.price_cents {
        validate_price("price", price)?;
    }
    if let Some(cost) = patch.cost_cents {
        validate_price("cost", cost)?;
    }
    if let Some(stock) = patch.stock_quantity {
        validate_stock(stock)?;
    }
    Ok(())
}

pub fn validate_new_customer(input: &NewCustomer) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_email(input.email.as_deref())?;
    validate_non_negative_cents("balance", input.balance_cents)
}

pub fn validate_customer_patch(patch: &CustomerPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_name("name", name)?;
    }
    if let Some(email) = &patch.email {
        validate_email(email.as_deref())?;
    }
    if let Some(balance) = patch.balance_cents {
        validate_non_negative_cents("balance", balance)?;
    }
    Ok(())
}

pub fn validate_new_expense(input: &NewExpense) -> ValidationResult<()> {
    validate_name("description", &input.description)?;
    validate_positive_cents("amount", input.amount_cents)
}

pub fn validate_expense_patch(patch: &ExpensePatch) -> ValidationResult<()> {
    if let Some(description) = &patch.description {
        validate_name("description", description)?;
    }
    if let Some(amount) = patch.amount_cents {
        validate_positive_cents("amount", amount)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Blue Dream").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some("jane@example.com")).is_ok());
        assert!(validate_email(Some("jane.example.com")).is_err());
        assert!(validate_email(Some("@example.com")).is_err());
        assert!(validate_email(Some("a@b@c.com")).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_sale_items() {
        let ok = vec![SaleItemInput::new("p1", 2, 1500)];
        assert!(validate_sale_items(&ok).is_ok());

        let zero_qty = vec![SaleItemInput::new("p1", 0, 1500)];
        assert!(validate_sale_items(&zero_qty).is_err());

        let negative_price = vec![SaleItemInput::new("p1", 1, -5)];
        assert!(validate_sale_items(&negative_price).is_err());

        let missing_product = vec![SaleItemInput::new(" ", 1, 100)];
        assert!(validate_sale_items(&missing_product).is_err());

        let too_expensive = vec![SaleItemInput::new("p1", 1, MAX_UNIT_PRICE_CENTS + 1)];
        assert!(matches!(
            validate_sale_items(&too_expensive),
            Err(ValidationError::OutOfRange { .. })
        ));

        let too_many_lines = vec![SaleItemInput::new("p1", 1, 100); MAX_SALE_LINES + 1];
        assert!(matches!(
            validate_sale_items(&too_many_lines),
            Err(ValidationError::OutOfRange { max: 100, .. })
        ));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", 0).is_ok());
        assert!(validate_price("price", MAX_UNIT_PRICE_CENTS).is_ok());
        assert!(validate_price("price", -1).is_err());
        assert!(validate_price("price", MAX_UNIT_PRICE_CENTS + 1).is_err());
    }

    #[test]
    fn test_customer_patch_rejects_negative_balance() {
        let patch = CustomerPatch {
            balance_cents: Some(-1),
            ..Default::default()
        };
        assert!(validate_customer_patch(&patch).is_err());
    }
}
