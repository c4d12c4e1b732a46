//! # Error Types
//!
//! Domain-specific error types for verdant-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  verdant-core errors (this file)                                       │
//! │  ├── CoreError        - Rejected operations (preconditions)            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  verdant-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Back-office errors (in app)                                           │
//! │  └── ApiError         - What the UI layer sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rejection Policy
//! Every core operation either completes fully or refuses to start. When a
//! `CoreError` is returned the store is exactly as it was before the call.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `open_register` was called while a session is already open.
    ///
    /// ## User Workflow
    /// ```text
    /// Operator clicks "Open Register" (float: $500.00)
    ///      │
    ///      ▼
    /// Session abc-123 already open since 08:00
    ///      │
    ///      ▼
    /// RegisterAlreadyOpen { session_id: "abc-123" }
    ///      │
    ///      ▼
    /// UI shows: "Register is already open"
    /// ```
    #[error("A cash register session is already open ({session_id})")]
    RegisterAlreadyOpen { session_id: String },

    /// `close_register` was called with no open session.
    #[error("No cash register session is open")]
    NoOpenRegister,

    /// A sale must have at least one line item.
    #[error("A sale must contain at least one line item")]
    EmptySale,

    /// Sale cannot be found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Register session cannot be found.
    #[error("Register session not found: {0}")]
    SessionNotFound(String),

    /// Customer cannot be found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any mutation so a rejected call leaves the store untouched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
