//! # Floor-Plan Service
//!
//! Floor-plan CRUD and the status reconciler.
//!
//! ## Reconciliation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Floor-Plan Reconciler                                │
//! │                                                                         │
//! │  Trigger points:                                                        │
//! │    • installment recorded  ──► reconcile_for_vehicle (fast path)        │
//! │    • sale deleted          ──► reconcile_for_vehicle                    │
//! │    • plan edited           ──► reconcile (full)                         │
//! │    • attachment changed    ──► reconcile (full) + sweep_active          │
//! │                                                                         │
//! │  Full algorithm (per plan):                                             │
//! │    gather attached vehicles ──► payoff snapshot per vehicle             │
//! │      └─► derive_floor_plan_status ──► write only on transition          │
//! │                                                                         │
//! │  Fast path (per triggering vehicle):                                    │
//! │    vehicle still owes?  ──► plan must be Active, done                   │
//! │    vehicle paid off?    ──► full scan decides (other vehicles count)    │
//! │                                                                         │
//! │  Soft-deleted plans are frozen: every path skips them.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reconciliation is idempotent: it recomputes from current records, so a
//! crashed or skipped run is fully repaired by the next one.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use lotledger_core::error::CoreError;
use lotledger_core::floorplan::{derive_floor_plan_status, VehiclePayoff};
use lotledger_core::validation::validate_name;
use lotledger_core::{FloorPlan, FloorPlanStatus, Outcome, Vehicle};
use lotledger_db::{Database, DbError, DbResult};

use crate::error::ApiResult;

// =============================================================================
// Payloads
// =============================================================================

/// Request payload for creating a floor plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFloorPlan {
    pub company_name: String,
    pub rate_bps: Option<i64>,
    pub fee_cents: Option<i64>,
    pub term_days: Option<i64>,
}

/// Request payload for editing a floor plan's non-derived fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlanDetails {
    pub company_name: String,
    pub rate_bps: Option<i64>,
    pub fee_cents: Option<i64>,
    pub term_days: Option<i64>,
}

// =============================================================================
// Service
// =============================================================================

/// Floor-plan operations and the status reconciler.
pub struct FloorPlanService {
    db: Database,
}

impl FloorPlanService {
    pub fn new(db: Database) -> Self {
        FloorPlanService { db }
    }

    /// Creates a floor plan. Plans start Inactive; attaching an unpaid
    /// vehicle activates them through reconciliation.
    pub async fn create(&self, req: NewFloorPlan) -> ApiResult<FloorPlan> {
        validate_name("companyName", &req.company_name)?;

        let now = Utc::now();
        let plan = FloorPlan {
            id: Uuid::new_v4().to_string(),
            company_name: req.company_name.trim().to_string(),
            status: FloorPlanStatus::Inactive,
            rate_bps: req.rate_bps,
            fee_cents: req.fee_cents,
            term_days: req.term_days,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        match self.db.floor_plans().insert(&plan).await {
            Ok(()) => {}
            Err(DbError::UniqueViolation { .. }) => {
                return Err(CoreError::DuplicateCompanyName(plan.company_name).into());
            }
            Err(other) => return Err(other.into()),
        }

        info!(id = %plan.id, company = %plan.company_name, "Floor plan created");
        Ok(plan)
    }

    /// Gets a floor plan by ID.
    pub async fn get(&self, id: &str) -> ApiResult<FloorPlan> {
        self.db
            .floor_plans()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::FloorPlanNotFound(id.to_string()).into())
    }

    /// Edits a plan's non-derived fields, then re-reconciles its status.
    pub async fn update(&self, id: &str, req: FloorPlanDetails) -> ApiResult<Outcome<FloorPlan>> {
        validate_name("companyName", &req.company_name)?;

        // Ensure the plan exists before touching anything.
        self.get(id).await?;

        match self
            .db
            .floor_plans()
            .update_details(
                id,
                req.company_name.trim(),
                req.rate_bps,
                req.fee_cents,
                req.term_days,
            )
            .await
        {
            Ok(()) => {}
            Err(DbError::UniqueViolation { .. }) => {
                return Err(CoreError::DuplicateCompanyName(req.company_name).into());
            }
            Err(other) => return Err(other.into()),
        }

        let mut outcome = Outcome::clean(self.get(id).await?);
        if let Err(e) = self.reconcile(id).await {
            outcome.warn("floor_plan_reconcile", e.to_string());
        } else {
            outcome.value = self.get(id).await?;
        }

        Ok(outcome)
    }

    /// Soft-deletes a plan. Attached vehicles keep their links; the plan's
    /// status is frozen as-is and every future reconciliation skips it.
    pub async fn soft_delete(&self, id: &str) -> ApiResult<FloorPlan> {
        self.get(id).await?;
        self.db.floor_plans().mark_deleted(id).await?;
        info!(id, "Floor plan soft-deleted");
        self.get(id).await
    }

    /// Hard-deletes a plan: detaches every linked vehicle first, then
    /// removes the row. Returns the number of vehicles detached.
    pub async fn delete(&self, id: &str) -> ApiResult<u64> {
        self.get(id).await?;

        let detached = self.db.vehicles().detach_all_from_plan(id).await?;
        self.db.floor_plans().delete(id).await?;

        info!(id, detached, "Floor plan deleted");
        Ok(detached)
    }

    // =========================================================================
    // Reconciler
    // =========================================================================

    /// Full reconciliation of one plan: gathers every attached vehicle's
    /// payoff state and writes the derived status on an actual transition.
    pub async fn reconcile(&self, plan_id: &str) -> DbResult<Option<FloorPlanStatus>> {
        let plan = self
            .db
            .floor_plans()
            .get_by_id(plan_id)
            .await?
            .ok_or_else(|| DbError::not_found("FloorPlan", plan_id))?;

        if plan.is_deleted {
            debug!(plan_id, "Skipping reconciliation of soft-deleted plan");
            return Ok(None);
        }

        let vehicles = self.db.vehicles().list_attached_to_plan(plan_id).await?;
        let mut payoffs = Vec::with_capacity(vehicles.len());
        for vehicle in &vehicles {
            payoffs.push(self.payoff(vehicle).await?);
        }

        let transition = derive_floor_plan_status(plan.status, plan.is_deleted, &payoffs);
        if let Some(target) = transition {
            self.db.floor_plans().set_status(plan_id, target).await?;
            info!(plan_id, from = ?plan.status, to = ?target, "Floor plan reconciled");
        }

        Ok(transition)
    }

    /// Scoped reconciliation after an installment touches one vehicle.
    ///
    /// Checks the triggering vehicle's own completion first: while it still
    /// owes payments its plan must be Active regardless of the other
    /// vehicles, so the full scan is skipped. Only when this vehicle just
    /// became complete do the others get a say.
    pub async fn reconcile_for_vehicle(
        &self,
        vehicle_id: &str,
    ) -> DbResult<Option<FloorPlanStatus>> {
        let Some(vehicle) = self.db.vehicles().get_by_id(vehicle_id).await? else {
            return Ok(None);
        };

        if !vehicle.floor_plan.is_floor_planned {
            return Ok(None);
        }
        let Some(plan_id) = vehicle.floor_plan.floor_plan_id.clone() else {
            return Ok(None);
        };

        if !self.payoff(&vehicle).await?.is_paid_off() {
            // This vehicle still owes: the plan's target is Active no matter
            // what the rest of the fleet looks like.
            let Some(plan) = self.db.floor_plans().get_by_id(&plan_id).await? else {
                return Ok(None);
            };
            if plan.is_deleted || plan.status == FloorPlanStatus::Active {
                return Ok(None);
            }
            self.db
                .floor_plans()
                .set_status(&plan_id, FloorPlanStatus::Active)
                .await?;
            info!(plan_id, "Floor plan reconciled (fast path, activated)");
            return Ok(Some(FloorPlanStatus::Active));
        }

        // The triggering vehicle just completed - whether the plan winds
        // down now depends on every other attached vehicle.
        self.reconcile(&plan_id).await
    }

    /// Reconciles every currently Active plan. Run after attachment changes,
    /// where a vehicle leaving one plan can wind that plan down.
    ///
    /// ## Returns
    /// Number of plans that transitioned.
    pub async fn sweep_active(&self) -> DbResult<u32> {
        let mut transitions = 0;
        for plan in self.db.floor_plans().list_active().await? {
            if self.reconcile(&plan.id).await?.is_some() {
                transitions += 1;
            }
        }
        Ok(transitions)
    }

    /// Installment-completion snapshot of one vehicle, joined through its
    /// latest sale. Missing sale records are a normal case (soft reference).
    async fn payoff(&self, vehicle: &Vehicle) -> DbResult<VehiclePayoff> {
        let Some(sale) = self.db.sales().find_by_vehicle(&vehicle.id).await? else {
            return Ok(VehiclePayoff::no_sale());
        };

        let paid = self
            .db
            .accounting()
            .count_by_receipt(&sale.receipt_id)
            .await?;

        Ok(VehiclePayoff {
            has_sale: true,
            total_installments: sale.total_number_of_payments(),
            paid_installments: paid,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
