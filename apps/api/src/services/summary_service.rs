//! # Summary Service
//!
//! Read-side aggregation views, computed on demand from whatever records
//! exist. Soft references may dangle; every join here degrades to
//! zeros/nulls instead of erroring.
//!
//! ## Views
//! - per-customer payment summary: latest sale joined with the latest
//!   installment entry on its receipt
//! - paginated accounting listing: one row per receipt (its latest entry)
//!   with a derived Cleared/Pending status

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use lotledger_core::summary::{payment_summary, receipt_status, PaymentSummary, ReceiptStatus};
use lotledger_db::Database;

use crate::error::ApiResult;
use crate::services::party_service::PartyService;

// =============================================================================
// View Types
// =============================================================================

/// One row of the paginated accounting listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptListingItem {
    pub receipt_number: String,
    pub installment_number: u32,
    pub total_number_of_payments: u32,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub status: ReceiptStatus,
}

// =============================================================================
// Service
// =============================================================================

/// Read-side aggregation views.
pub struct SummaryService {
    db: Database,
}

impl SummaryService {
    pub fn new(db: Database) -> Self {
        SummaryService { db }
    }

    /// Payment summary for one customer.
    ///
    /// The customer must exist; everything downstream of it (sale, entries)
    /// is optional and degrades to an empty summary.
    pub async fn customer_summary(&self, customer_id: &str) -> ApiResult<PaymentSummary> {
        PartyService::new(self.db.clone())
            .get_customer(customer_id)
            .await?;

        let Some(sale) = self.db.sales().latest_for_customer(customer_id).await? else {
            return Ok(payment_summary(None, 0, 0, None));
        };

        let count = self
            .db
            .accounting()
            .count_by_receipt(&sale.receipt_id)
            .await?;
        let latest_due = self
            .db
            .accounting()
            .latest_by_receipt(&sale.receipt_id)
            .await?
            .map(|entry| entry.due_date);

        Ok(payment_summary(
            Some(sale.receipt_id.clone()),
            sale.total_number_of_payments(),
            count,
            latest_due,
        ))
    }

    /// Paginated accounting listing: latest entry per receipt, newest
    /// first, with the derived settlement status.
    ///
    /// `page` is 1-based; out-of-range inputs are clamped.
    pub async fn accounting_listing(
        &self,
        page: i64,
        per_page: i64,
        max_per_page: i64,
    ) -> ApiResult<Vec<ReceiptListingItem>> {
        let per_page = per_page.clamp(1, max_per_page);
        let offset = (page.max(1) - 1) * per_page;

        let entries = self.db.accounting().latest_per_receipt(per_page, offset).await?;

        Ok(entries
            .into_iter()
            .map(|entry| ReceiptListingItem {
                status: receipt_status(entry.total_number_of_payments, entry.installment_number),
                receipt_number: entry.receipt_number,
                installment_number: entry.installment_number,
                total_number_of_payments: entry.total_number_of_payments,
                amount_cents: entry.amount_cents,
                due_date: entry.due_date,
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
