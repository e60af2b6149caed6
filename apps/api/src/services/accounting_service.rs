//! # Accounting Service
//!
//! Installment recording: the write path that stitches together the
//! due-date projector, the append-only ledger, and the floor-plan
//! reconciler.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. resolve sale by receipt number     (404 if missing)                 │
//! │  2. reject cash sales                  (422, no schedule to pay)        │
//! │  3. cap check: count < total           (422 once complete)              │
//! │  4. installment_number = count + 1                                      │
//! │  5. project due date                   (pure, never fails)              │
//! │  6. INSERT entry                       ◄── the primary write            │
//! │  ───────────────────────────────────────────────────────────────────    │
//! │  7. roll sale.next_payment_due forward        best-effort (warning)     │
//! │  8. reconcile the vehicle's floor plan        best-effort (warning)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 3-4 are a read-then-write pair with no unique constraint behind
//! them; concurrent postings can duplicate a number (accepted, see
//! DESIGN.md). Downstream consumers use counts, not numbers, so they
//! tolerate it.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use lotledger_core::error::CoreError;
use lotledger_core::schedule::{project_due_date, ScheduleAnchors};
use lotledger_core::validation::validate_amount_cents;
use lotledger_core::{InstallmentEntry, Outcome};
use lotledger_db::Database;

use crate::error::ApiResult;
use crate::services::floorplan_service::FloorPlanService;

// =============================================================================
// Payloads
// =============================================================================

/// Request payload for recording an installment payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInstallment {
    pub receipt_number: String,
    pub amount_cents: i64,
    /// Explicit due date override. When absent the projector derives one
    /// from the schedule.
    pub due_date: Option<NaiveDate>,
}

// =============================================================================
// Service
// =============================================================================

/// Installment ledger operations.
pub struct AccountingService {
    db: Database,
}

impl AccountingService {
    pub fn new(db: Database) -> Self {
        AccountingService { db }
    }

    /// Records one installment payment against a financed sale.
    pub async fn record_installment(
        &self,
        req: NewInstallment,
    ) -> ApiResult<Outcome<InstallmentEntry>> {
        validate_amount_cents("amountCents", req.amount_cents)?;

        let receipt = req.receipt_number.trim().to_string();
        let sale = self
            .db
            .sales()
            .get_by_receipt(&receipt)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(receipt.clone()))?;

        if sale.pricing.is_cash_sale {
            return Err(CoreError::CashSaleHasNoSchedule {
                receipt_number: receipt,
            }
            .into());
        }
        let Some(schedule) = sale.pricing.payment_schedule.clone() else {
            // Financed sale whose details were never added.
            return Err(CoreError::ScheduleMissing {
                receipt_number: receipt,
            }
            .into());
        };

        let total = schedule.number_of_payments;
        let count = self.db.accounting().count_by_receipt(&receipt).await?;
        if count >= total {
            return Err(CoreError::ScheduleComplete {
                receipt_number: receipt,
                paid: count,
                total,
            }
            .into());
        }
        let installment_number = count + 1;

        let prev_entry_due = self
            .db
            .accounting()
            .latest_by_receipt(&receipt)
            .await?
            .map(|entry| entry.due_date);

        let due_date = project_due_date(
            installment_number,
            schedule.kind,
            &ScheduleAnchors {
                first: schedule.first_payment_date,
                second: schedule.second_payment_date,
            },
            req.due_date,
            sale.pricing.next_payment_due,
            prev_entry_due,
            Utc::now().date_naive(),
        );

        let entry = InstallmentEntry {
            id: Uuid::new_v4().to_string(),
            receipt_number: receipt.clone(),
            installment_number,
            due_date,
            total_number_of_payments: total,
            amount_cents: req.amount_cents,
            created_at: Utc::now(),
        };
        self.db.accounting().insert(&entry).await?;
        info!(
            receipt = %receipt,
            installment = installment_number,
            %due_date,
            "Installment recorded"
        );

        let mut outcome = Outcome::clean(entry);

        if let Err(e) = self.db.sales().set_next_payment_due(&receipt, due_date).await {
            outcome.warn("sale_due_date_update", e.to_string());
        }

        if let Some(vehicle_id) = &sale.vehicle_id {
            if let Err(e) = FloorPlanService::new(self.db.clone())
                .reconcile_for_vehicle(vehicle_id)
                .await
            {
                outcome.warn("floor_plan_reconcile", e.to_string());
            }
        }

        Ok(outcome)
    }

    /// All entries for one receipt, newest installment first.
    pub async fn list_by_receipt(&self, receipt_number: &str) -> ApiResult<Vec<InstallmentEntry>> {
        Ok(self.db.accounting().list_by_receipt(receipt_number).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
