//! # Domain Types
//!
//! Core domain types used throughout LotLedger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Vehicle      │   │      Sale       │   │ InstallmentEntry│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  stock_id       │   │  receipt_id     │   │  receipt_number │       │
//! │  │  sales_status   │   │  pricing        │   │  installment_no │       │
//! │  │  floor_plan     │   │  schedule       │   │  due_date       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   FloorPlan     │   │   SalesStatus   │   │ FloorPlanStatus │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  company_name   │   │  Available      │   │  Active         │       │
//! │  │  status         │   │  Pending        │   │  Inactive       │       │
//! │  │  is_deleted     │   │  Reserved       │   └─────────────────┘       │
//! │  └─────────────────┘   │  Sold           │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for soft references between records
//! - Business ID: (stock_id, receipt_id, ...) - human-readable, minted from
//!   the atomic counter table
//!
//! ## Soft References
//! There are NO enforced foreign keys. A `Sale.vehicle_id` may point at a
//! vehicle that was deleted; an `InstallmentEntry.receipt_number` may point
//! at a sale that no longer exists. Consumers must treat "referenced record
//! missing" as a normal case, never as a panic.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleKind;

// =============================================================================
// Vehicle
// =============================================================================

/// Sales status of a vehicle on the lot.
///
/// ## Invariant
/// This is a DERIVED field. Clients never set it directly - it only moves
/// through sale lifecycle transitions (see [`crate::status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SalesStatus {
    /// On the lot, no open sale.
    Available,
    /// A sale record exists but pricing details have not been added yet.
    Pending,
    /// Sale details added with `is_reserved = true`.
    Reserved,
    /// Sale details added with `is_reserved = false`.
    Sold,
}

impl Default for SalesStatus {
    fn default() -> Self {
        SalesStatus::Available
    }
}

/// A vehicle's attachment to a floor-plan financing arrangement.
///
/// Both fields travel together: a vehicle can carry a stale `floor_plan_id`
/// with `is_floor_planned = false` after being paid off, and the reconciler
/// only counts vehicles where BOTH the reference matches and the flag is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlanLink {
    /// Soft reference to a [`FloorPlan`] id.
    pub floor_plan_id: Option<String>,
    /// Whether the vehicle currently counts against that plan.
    pub is_floor_planned: bool,
}

/// A vehicle in inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable stock ID: `{vendorCategory}-{vehicleType}-{seq:04}`.
    ///
    /// Minted from the counter table with self-healing against legacy data
    /// (see the sequence repository in lotledger-db).
    pub stock_id: String,

    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub vin: Option<String>,

    /// Derived sales status. Never set directly by a client.
    pub sales_status: SalesStatus,

    /// Soft reference to the open [`Sale`] that moved this vehicle out of
    /// Available. Cleared when that sale is deleted.
    pub sales_id: Option<String>,

    /// Floor-plan attachment.
    pub floor_plan: FloorPlanLink,

    /// Soft reference to the vendor this vehicle was acquired from.
    pub vendor_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// The payment schedule of a financed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    /// Weekly, bi-weekly, semi-monthly, or monthly.
    pub kind: ScheduleKind,
    /// Total number of installments agreed upon.
    pub number_of_payments: u32,
    /// Anchor date of the first installment.
    pub first_payment_date: Option<NaiveDate>,
    /// Second anchor, used only by semi-monthly schedules.
    pub second_payment_date: Option<NaiveDate>,
}

/// Pricing and payment terms of a sale.
///
/// ## Invariant
/// Exactly one branch holds:
/// - cash sale:     `payment_schedule` and `next_payment_due` are `None`
/// - financed sale: `payment_schedule` is `Some`
///
/// Switching `is_cash_sale` on an update unsets the other branch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pricing {
    pub is_cash_sale: bool,
    /// Free-form sale category (retail, wholesale, ...). Not interpreted
    /// by the core logic.
    pub sales_type: Option<String>,
    /// Whether the buyer reserved the vehicle instead of closing the sale.
    pub is_reserved: bool,
    /// Agreed total, in cents.
    pub total_cents: Option<i64>,
    /// Present only for financed sales.
    pub payment_schedule: Option<PaymentSchedule>,
    /// Rolling pointer to the next unpaid installment's due date.
    /// Updated every time an installment is recorded.
    pub next_payment_due: Option<NaiveDate>,
}

/// A sales transaction.
///
/// ## Lifecycle
/// ```text
/// create (stub)          ──► vehicle → Pending
///   │
///   ▼
/// add details            ──► vehicle → Reserved | Sold
///   │                        (cash/financed branch chosen here)
///   ▼
/// [attach trade-in]      ──► trade-in vehicle ingested into inventory
///   │
///   ▼
/// delete                 ──► vehicle → Available, sales_id cleared,
///                            floor-plan reconciler re-run
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable receipt ID: `RC-{year}-{seq:04}`, yearly-namespaced.
    /// Installment entries reference this BY VALUE, not by UUID.
    pub receipt_id: String,

    /// Soft reference to the buying customer.
    pub customer_id: String,

    /// Soft reference to the vehicle being sold, if one is linked.
    pub vehicle_id: Option<String>,

    /// Soft reference to a trade-in vehicle ingested into inventory.
    pub trade_in_vehicle_id: Option<String>,

    pub pricing: Pricing,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Total number of payments on this sale's schedule, or 0 when the sale
    /// is cash / has no schedule recorded.
    pub fn total_number_of_payments(&self) -> u32 {
        self.pricing
            .payment_schedule
            .as_ref()
            .map(|s| s.number_of_payments)
            .unwrap_or(0)
    }
}

// =============================================================================
// Installment Entry (Accounting)
// =============================================================================

/// One recorded installment payment against a financed sale.
///
/// ## Invariants
/// - `installment_number` is 1-based and assigned as
///   `count(entries for receipt) + 1` at insert time
/// - entries are append-only: never updated or deleted
/// - no entry is created once `count >= total_number_of_payments`
///
/// ## Race note
/// The count-then-insert assignment is NOT protected by a unique
/// constraint; concurrent postings for the same receipt can mint the
/// same number. Accepted behavior, see DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The sale's receipt ID, stored by value.
    pub receipt_number: String,

    /// 1-based position in the schedule.
    pub installment_number: u32,

    /// Calendar due date computed by the projector.
    pub due_date: NaiveDate,

    /// Snapshot of the sale's schedule length at creation time.
    pub total_number_of_payments: u32,

    /// Amount paid, in cents.
    pub amount_cents: i64,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Floor Plan
// =============================================================================

/// Activity status of a floor-plan financing arrangement.
///
/// ## Invariant
/// DERIVED from the installment-completion state of every attached vehicle
/// (see [`crate::floorplan`]), unless the plan is soft-deleted - then the
/// status is frozen forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum FloorPlanStatus {
    /// At least one attached vehicle still owes payments.
    Active,
    /// No attached vehicles, or every attached vehicle is paid off.
    Inactive,
}

impl Default for FloorPlanStatus {
    fn default() -> Self {
        FloorPlanStatus::Inactive
    }
}

/// A floor-plan financing arrangement with a lender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlan {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Lender company name. Unique across plans.
    pub company_name: String,

    /// Derived activity status. Created Inactive by default.
    pub status: FloorPlanStatus,

    /// Interest rate in basis points. Not functional to the core logic.
    pub rate_bps: Option<i64>,
    /// Flat fee in cents. Not functional to the core logic.
    pub fee_cents: Option<i64>,
    /// Term length in days. Not functional to the core logic.
    pub term_days: Option<i64>,

    /// Soft-delete flag. Once set, `status` is frozen and the plan is
    /// skipped by every reconciliation run.
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Customer & Vendor
// =============================================================================

/// A customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Human-readable running number, `1000 + counter` (unpadded).
    pub customer_number: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A vendor (auction house, wholesaler, trade-in source, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Human-readable vendor ID: `{categoryCode}-{seq:04}`.
    pub vendor_id: String,
    pub name: String,
    /// Category code used as the prefix of this vendor's stock IDs.
    pub category_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_status_default() {
        assert_eq!(SalesStatus::default(), SalesStatus::Available);
    }

    #[test]
    fn test_floor_plan_status_default() {
        // Plans start Inactive; the reconciler activates them.
        assert_eq!(FloorPlanStatus::default(), FloorPlanStatus::Inactive);
    }

    #[test]
    fn test_total_number_of_payments_defaults_to_zero() {
        let sale = Sale {
            id: "s1".into(),
            receipt_id: "RC-2026-0001".into(),
            customer_id: "c1".into(),
            vehicle_id: None,
            trade_in_vehicle_id: None,
            pricing: Pricing {
                is_cash_sale: true,
                ..Pricing::default()
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(sale.total_number_of_payments(), 0);
    }
}
