//! # Floor-Plan Status Derivation
//!
//! Pure derivation of a floor plan's Active/Inactive status from the
//! installment-completion state of its attached vehicles.
//!
//! ## Derivation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Floor-Plan Status Derivation                           │
//! │                                                                         │
//! │  plan is soft-deleted?  ──────────────►  FROZEN (no write, ever)        │
//! │                                                                         │
//! │  zero attached vehicles ──────────────►  Inactive                       │
//! │                                                                         │
//! │  any attached vehicle with:                                             │
//! │    • no sale record                 ┐                                   │
//! │    • no schedule (total == 0)       ├──►  Active                        │
//! │    • paid < total                   ┘                                   │
//! │                                                                         │
//! │  every attached vehicle paid off ─────►  Inactive                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The derivation returns the TARGET status only when it differs from the
//! current one - callers write on actual transitions and skip redundant
//! writes, which keeps the reconciler idempotent by construction.
//!
//! The I/O half (gathering attached vehicles, their sales, and installment
//! counts) lives in the API app's floor-plan service; this module never
//! touches a database.

use crate::types::FloorPlanStatus;

// =============================================================================
// Inputs
// =============================================================================

/// Installment-completion snapshot of one vehicle attached to a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehiclePayoff {
    /// Whether a sales record was found for the vehicle at all.
    pub has_sale: bool,
    /// The sale schedule's `number_of_payments` (0 when no schedule).
    pub total_installments: u32,
    /// Count of installment entries recorded for the sale's receipt.
    pub paid_installments: u32,
}

impl VehiclePayoff {
    /// Whether this vehicle's schedule is fully paid.
    ///
    /// A vehicle with no sale, or with no schedule (`total == 0`), is
    /// conservatively treated as NOT paid off - it keeps the plan Active
    /// rather than silently satisfying completion.
    pub fn is_paid_off(&self) -> bool {
        self.has_sale && self.total_installments > 0 && self.paid_installments >= self.total_installments
    }

    /// Snapshot for a vehicle with no sales record.
    pub fn no_sale() -> Self {
        VehiclePayoff {
            has_sale: false,
            total_installments: 0,
            paid_installments: 0,
        }
    }
}

// =============================================================================
// Derivation
// =============================================================================

/// Derives the status a floor plan SHOULD have from its attached vehicles.
///
/// This is the pure half of the reconciler. It is total and deterministic:
/// running it twice on the same inputs yields the same answer, and a `None`
/// result means "no write needed".
///
/// ## Returns
/// * `Some(target)` - the plan must transition to `target`
/// * `None` - already correct, or soft-deleted (frozen)
pub fn derive_floor_plan_status(
    current: FloorPlanStatus,
    is_deleted: bool,
    vehicles: &[VehiclePayoff],
) -> Option<FloorPlanStatus> {
    // Soft-deleted plans are never reactivated (or deactivated) - frozen.
    if is_deleted {
        return None;
    }

    let target = if vehicles.is_empty() {
        // A plan with nothing attached is always Inactive.
        FloorPlanStatus::Inactive
    } else if vehicles.iter().all(VehiclePayoff::is_paid_off) {
        FloorPlanStatus::Inactive
    } else {
        FloorPlanStatus::Active
    };

    (target != current).then_some(target)
}

// =============================================================================
// Unit Tests
// =============================================================================
