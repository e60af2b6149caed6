//! # Validation Module
//!
//! Input validation utilities for LotLedger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (axum)                                          │
//! │  ├── Shape/type validation (JSON deserialization)                       │
//! │  └── Date strings parse, enums are constrained                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - field-level business rules                      │
//! │  ├── Required fields non-empty                                          │
//! │  ├── Amounts positive, schedule lengths in range                        │
//! │  └── Runs BEFORE any core logic or write                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cross-entity rules (services)                                 │
//! │  ├── Referenced records exist                                           │
//! │  └── Installment cap, cash-sale branch invariant                        │
//! │                                                                         │
//! │  Validation guarantees shape, NOT cross-entity consistency -            │
//! │  soft references may still dangle and consumers must tolerate it.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted human-entered name (company, customer, make/model).
const MAX_NAME_LEN: usize = 200;

/// Upper bound on schedule length. Generous: 10 years of weekly payments.
const MAX_NUMBER_OF_PAYMENTS: i64 = 520;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, non-empty name field.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an ID code used in minted identifiers (vendor category,
/// vehicle type).
///
/// ## Rules
/// - Must not be empty
/// - 1 to 10 characters
/// - Only alphanumeric characters (the `-` separator is reserved for the
///   ID format itself)
pub fn validate_code(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 10 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 10,
        });
    }

    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount in cents.
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a schedule length.
pub fn validate_number_of_payments(count: i64) -> ValidationResult<()> {
    if !(1..=MAX_NUMBER_OF_PAYMENTS).contains(&count) {
        return Err(ValidationError::OutOfRange {
            field: "numberOfPayments".to_string(),
            min: 1,
            max: MAX_NUMBER_OF_PAYMENTS,
        });
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
        assert!(validate_name("companyName", "Heartland Floor Credit").is_ok());
        assert!(validate_name("companyName", "   ").is_err());
        assert!(validate_name("companyName", &"x".repeat(500)).is_err());
    }

    #[test]
    fn test_validate_code() {
        assert!(validate_code("vehicleType", "SUV").is_ok());
        assert!(validate_code("vehicleType", "").is_err());
        assert!(validate_code("vehicleType", "SU V").is_err());
        assert!(validate_code("vehicleType", "SU-V").is_err());
    }

    #[test]
    fn test_validate_amount_cents() {
        assert!(validate_amount_cents("amount", 50_000).is_ok());
        assert!(validate_amount_cents("amount", 0).is_err());
        assert!(validate_amount_cents("amount", -10).is_err());
    }

    #[test]
    fn test_validate_number_of_payments() {
        assert!(validate_number_of_payments(12).is_ok());
        assert!(validate_number_of_payments(0).is_err());
        assert!(validate_number_of_payments(1000).is_err());
    }
}
