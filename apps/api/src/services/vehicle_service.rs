//! # Vehicle Service
//!
//! Inventory vehicle creation (with stock-ID minting) and floor-plan
//! attachment changes.
//!
//! ## Stock-ID Minting
//! ```text
//! vendor category "AU" + vehicle type "SUV"
//!        │
//!        ▼
//! prefix "AU-SUV" ──► counter "stock:AU-SUV" (self-healing against
//!        │            legacy rows, see the db sequence repository)
//!        ▼
//! stock ID "AU-SUV-0042"
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use lotledger_core::error::CoreError;
use lotledger_core::validation::{validate_code, validate_name};
use lotledger_core::{ids, FloorPlanLink, Outcome, SalesStatus, Vehicle};
use lotledger_db::Database;

use crate::error::ApiResult;
use crate::services::floorplan_service::FloorPlanService;

// =============================================================================
// Payloads
// =============================================================================

/// Request payload for creating a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub vin: Option<String>,
    pub vendor_id: Option<String>,
    /// Code of the acquisition channel, first half of the stock-ID prefix.
    pub vendor_category_code: String,
    /// Vehicle body-type code, second half of the stock-ID prefix.
    pub vehicle_type_code: String,
}

/// Request payload for changing a vehicle's floor-plan attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlanAttachment {
    pub floor_plan_id: Option<String>,
    pub is_floor_planned: bool,
}

// =============================================================================
// Service
// =============================================================================

/// Vehicle inventory operations.
pub struct VehicleService {
    db: Database,
}

impl VehicleService {
    pub fn new(db: Database) -> Self {
        VehicleService { db }
    }

    /// Creates a vehicle with a freshly minted stock ID.
    pub async fn create(&self, req: NewVehicle) -> ApiResult<Vehicle> {
        validate_name("make", &req.make)?;
        validate_name("model", &req.model)?;
        validate_code("vendorCategoryCode", &req.vendor_category_code)?;
        validate_code("vehicleTypeCode", &req.vehicle_type_code)?;

        let prefix = ids::stock_prefix(
            req.vendor_category_code.trim(),
            req.vehicle_type_code.trim(),
        );
        let seq = self.db.sequences().next_stock_seq(&prefix).await?;
        let stock_id = ids::stock_id(&prefix, seq);

        let now = Utc::now();
        let vehicle = Vehicle {
            id: Uuid::new_v4().to_string(),
            stock_id,
            make: req.make.trim().to_string(),
            model: req.model.trim().to_string(),
            year: req.year,
            vin: req.vin,
            sales_status: SalesStatus::Available,
            sales_id: None,
            floor_plan: FloorPlanLink::default(),
            vendor_id: req.vendor_id,
            created_at: now,
            updated_at: now,
        };

        self.db.vehicles().insert(&vehicle).await?;
        info!(id = %vehicle.id, stock_id = %vehicle.stock_id, "Vehicle created");
        Ok(vehicle)
    }

    /// Gets a vehicle by ID.
    pub async fn get(&self, id: &str) -> ApiResult<Vehicle> {
        self.db
            .vehicles()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::VehicleNotFound(id.to_string()).into())
    }

    /// Changes a vehicle's floor-plan attachment, then reconciles the
    /// affected plans best-effort.
    ///
    /// The newly referenced plan (if any) is reconciled directly; every
    /// other Active plan is swept, because the vehicle may have just left
    /// one of them.
    pub async fn set_floor_plan(
        &self,
        vehicle_id: &str,
        req: FloorPlanAttachment,
    ) -> ApiResult<Outcome<Vehicle>> {
        self.get(vehicle_id).await?;

        if let Some(plan_id) = &req.floor_plan_id {
            if self.db.floor_plans().get_by_id(plan_id).await?.is_none() {
                return Err(CoreError::FloorPlanNotFound(plan_id.clone()).into());
            }
        }

        self.db
            .vehicles()
            .set_floor_plan(vehicle_id, req.floor_plan_id.as_deref(), req.is_floor_planned)
            .await?;

        let mut outcome = Outcome::clean(self.get(vehicle_id).await?);

        let reconciler = FloorPlanService::new(self.db.clone());
        if let Some(plan_id) = &req.floor_plan_id {
            if let Err(e) = reconciler.reconcile(plan_id).await {
                outcome.warn("floor_plan_reconcile", e.to_string());
            }
        }
        if let Err(e) = reconciler.sweep_active().await {
            outcome.warn("floor_plan_sweep", e.to_string());
        }

        Ok(outcome)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::floorplan_service::NewFloorPlan;
    use lotledger_core::FloorPlanStatus;
    use lotledger_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_vehicle(category: &str, vtype: &str) -> NewVehicle {
        NewVehicle {
            make: "Toyota".to_string(),
            model: "Tacoma".to_string(),
            year: Some(2023),
            vin: None,
            vendor_id: None,
            vendor_category_code: category.to_string(),
            vehicle_type_code: vtype.to_string(),
        }
    }

    #[tokio::test]
    async fn test_stock_ids_are_sequential_per_prefix() {
        let db = test_db().await;
        let svc = VehicleService::new(db.clone());

        let v1 = svc.create(new_vehicle("AU", "TRK")).await.unwrap();
        let v2 = svc.create(new_vehicle("AU", "TRK")).await.unwrap();
        let other = svc.create(new_vehicle("TI", "TRK")).await.unwrap();

        assert_eq!(v1.stock_id, "AU-TRK-0001");
        assert_eq!(v2.stock_id, "AU-TRK-0002");
        assert_eq!(other.stock_id, "TI-TRK-0001");
        assert_eq!(v1.sales_status, SalesStatus::Available);
    }

    #[tokio::test]
    async fn test_invalid_codes_are_rejected() {
        let db = test_db().await;
        let svc = VehicleService::new(db.clone());

        let err = svc.create(new_vehicle("A U", "TRK")).await.unwrap_err();
        assert!(err.to_string().contains("vendorCategoryCode"));
    }

    #[tokio::test]
    async fn test_attachment_requires_existing_plan() {
        let db = test_db().await;
        let svc = VehicleService::new(db.clone());
        let vehicle = svc.create(new_vehicle("AU", "SUV")).await.unwrap();

        let err = svc
            .set_floor_plan(
                &vehicle.id,
                FloorPlanAttachment {
                    floor_plan_id: Some("missing".to_string()),
                    is_floor_planned: true,
                },
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Floor plan not found"));
    }

    #[tokio::test]
    async fn test_attachment_activates_plan() {
        let db = test_db().await;
        let svc = VehicleService::new(db.clone());
        let plans = FloorPlanService::new(db.clone());

        let plan = plans
            .create(NewFloorPlan {
                company_name: "Heartland Floor Credit".to_string(),
                rate_bps: None,
                fee_cents: None,
                term_days: None,
            })
            .await
            .unwrap();
        let vehicle = svc.create(new_vehicle("AU", "SUV")).await.unwrap();

        let outcome = svc
            .set_floor_plan(
                &vehicle.id,
                FloorPlanAttachment {
                    floor_plan_id: Some(plan.id.clone()),
                    is_floor_planned: true,
                },
            )
            .await
            .unwrap();

        assert!(outcome.is_clean());
        assert!(outcome.value.floor_plan.is_floor_planned);
        // Unpaid vehicle attached: the plan activates immediately.
        assert_eq!(plans.get(&plan.id).await.unwrap().status, FloorPlanStatus::Active);
    }
}
