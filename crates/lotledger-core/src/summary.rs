//! # Read-Side Aggregation Math
//!
//! Pure computations behind the two read projections:
//! the per-customer sales summary and the paginated accounting listing.
//!
//! Both views are computed on demand from whatever records exist; missing
//! linked documents produce zeros/nulls, never errors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Receipt Status
// =============================================================================

/// Derived settlement status of a receipt in the accounting listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    /// The schedule is known and fully paid.
    Cleared,
    /// Payments outstanding, or no schedule length on record.
    Pending,
}

/// Derives the receipt status from the latest installment entry.
///
/// Cleared requires a known, non-zero schedule length that the recorded
/// installments have reached. An unknown or zero total can never clear.
pub fn receipt_status(total_number_of_payments: u32, installment_count: u32) -> ReceiptStatus {
    if total_number_of_payments > 0 && installment_count >= total_number_of_payments {
        ReceiptStatus::Cleared
    } else {
        ReceiptStatus::Pending
    }
}

// =============================================================================
// Customer Summary
// =============================================================================

/// Per-customer payment summary, joined from the customer's latest sale and
/// the latest installment entry on its receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSummary {
    /// Receipt of the customer's latest sale, if any.
    pub receipt_id: Option<String>,
    /// Number of installments recorded so far.
    pub installment_count: u32,
    /// Schedule length, normalized to at least `installment_count` so an
    /// over-paid or miscounted schedule never reports negative remaining.
    pub total_number_of_payments: u32,
    /// `total - count`, never negative.
    pub remaining_payments: u32,
    /// Due date of the latest recorded installment.
    pub latest_due_date: Option<NaiveDate>,
}

/// Builds a payment summary from the raw stored values.
///
/// ## Arguments
/// * `receipt_id` - receipt of the latest sale (`None` when the customer has
///   no sales)
/// * `stored_total` - `total_number_of_payments` as recorded, which may lag
///   behind the actual entry count
/// * `installment_count` - entries recorded against the receipt
/// * `latest_due_date` - due date on the highest-numbered entry
pub fn payment_summary(
    receipt_id: Option<String>,
    stored_total: u32,
    installment_count: u32,
    latest_due_date: Option<NaiveDate>,
) -> PaymentSummary {
    let total = stored_total.max(installment_count);
    PaymentSummary {
        receipt_id,
        installment_count,
        total_number_of_payments: total,
        remaining_payments: total - installment_count,
        latest_due_date,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_payments_is_never_negative() {
        // Over-counted: more entries than the stored schedule length.
        let summary = payment_summary(Some("RC-2026-0001".into()), 10, 13, None);
        assert_eq!(summary.remaining_payments, 0);
        assert_eq!(summary.total_number_of_payments, 13);
    }

    #[test]
    fn test_normal_remaining_payments() {
        let summary = payment_summary(Some("RC-2026-0002".into()), 12, 5, None);
        assert_eq!(summary.remaining_payments, 7);
        assert_eq!(summary.total_number_of_payments, 12);
    }

    #[test]
    fn test_customer_without_sales_yields_empty_summary() {
        let summary = payment_summary(None, 0, 0, None);
        assert_eq!(summary.receipt_id, None);
        assert_eq!(summary.installment_count, 0);
        assert_eq!(summary.remaining_payments, 0);
    }

    #[test]
    fn test_receipt_status_cleared_requires_known_total() {
        assert_eq!(receipt_status(12, 12), ReceiptStatus::Cleared);
        assert_eq!(receipt_status(12, 13), ReceiptStatus::Cleared);
        assert_eq!(receipt_status(12, 11), ReceiptStatus::Pending);
        // Unknown/zero schedule length can never clear.
        assert_eq!(receipt_status(0, 5), ReceiptStatus::Pending);
    }
}
