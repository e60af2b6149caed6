//! # Error Types
//!
//! Domain-specific error types for lotledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lotledger-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  lotledger-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - What HTTP clients see (status code + message)  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (receipt number, plan ID, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They are rejected BEFORE any write happens - a failed rule never leaves a
/// partial mutation behind.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Vehicle cannot be found.
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    /// Sale cannot be found (by ID or receipt number).
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Floor plan cannot be found.
    #[error("Floor plan not found: {0}")]
    FloorPlanNotFound(String),

    /// Customer cannot be found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Installment posting would exceed the sale's payment schedule.
    ///
    /// ## When This Occurs
    /// - `count(entries for receipt) >= totalNumberOfPayments`
    /// - Rejected before the due date is even computed
    #[error("Payment schedule for {receipt_number} is complete: {paid} of {total} installments already recorded")]
    ScheduleComplete {
        receipt_number: String,
        paid: u32,
        total: u32,
    },

    /// An installment was posted against a cash sale.
    ///
    /// Cash sales carry no payment schedule, so there is nothing to
    /// record installments against.
    #[error("Sale {receipt_number} is a cash sale and has no payment schedule")]
    CashSaleHasNoSchedule { receipt_number: String },

    /// An installment was posted against a financed sale whose payment
    /// details were never added, so no schedule is on record yet.
    #[error("Sale {receipt_number} has no payment schedule recorded")]
    ScheduleMissing { receipt_number: String },

    /// A floor plan with this company name already exists.
    #[error("Floor plan company '{0}' already exists")]
    DuplicateCompanyName(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
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

    /// Invalid format (e.g., invalid date, malformed ID).
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ScheduleComplete {
            receipt_number: "RC-2026-0012".to_string(),
            paid: 12,
            total: 12,
        };
        assert_eq!(
            err.to_string(),
            "Payment schedule for RC-2026-0012 is complete: 12 of 12 installments already recorded"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "receiptNumber".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
