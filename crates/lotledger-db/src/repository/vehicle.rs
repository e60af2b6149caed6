//! # Vehicle Repository
//!
//! Database operations for inventory vehicles, including the two derived
//! mutations the core flows need: sales-status transitions and floor-plan
//! attachment changes.
//!
//! Status values are written here but DECIDED in lotledger-core - this
//! layer never invents a transition on its own.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use lotledger_core::{FloorPlanLink, SalesStatus, Vehicle};

/// Repository for vehicle database operations.
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    pool: SqlitePool,
}

impl VehicleRepository {
    /// Creates a new VehicleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VehicleRepository { pool }
    }

    /// Inserts a vehicle.
    pub async fn insert(&self, vehicle: &Vehicle) -> DbResult<()> {
        debug!(id = %vehicle.id, stock_id = %vehicle.stock_id, "Inserting vehicle");

        sqlx::query(
            r#"
            INSERT INTO vehicles (
                id, stock_id, make, model, year, vin,
                sales_status, sales_id, floor_plan_id, is_floor_planned,
                vendor_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.stock_id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.vin)
        .bind(vehicle.sales_status)
        .bind(&vehicle.sales_id)
        .bind(&vehicle.floor_plan.floor_plan_id)
        .bind(vehicle.floor_plan.is_floor_planned)
        .bind(&vehicle.vendor_id)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a vehicle by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Vehicle>> {
        let row = sqlx::query("SELECT * FROM vehicles WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(vehicle_from_row).transpose().map_err(Into::into)
    }

    /// Writes a sales-status transition together with the sale link.
    ///
    /// `sales_id` is `Some` when a sale takes the vehicle (Pending/
    /// Reserved/Sold) and `None` when a deleted sale releases it.
    pub async fn update_sales_status(
        &self,
        id: &str,
        status: SalesStatus,
        sales_id: Option<&str>,
    ) -> DbResult<()> {
        debug!(id, ?status, "Updating vehicle sales status");

        let result = sqlx::query(
            r#"
            UPDATE vehicles SET
                sales_status = ?2,
                sales_id = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(sales_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vehicle", id));
        }

        Ok(())
    }

    /// Writes a floor-plan attachment change.
    pub async fn set_floor_plan(
        &self,
        id: &str,
        floor_plan_id: Option<&str>,
        is_floor_planned: bool,
    ) -> DbResult<()> {
        debug!(id, ?floor_plan_id, is_floor_planned, "Updating vehicle floor plan");

        let result = sqlx::query(
            r#"
            UPDATE vehicles SET
                floor_plan_id = ?2,
                is_floor_planned = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(floor_plan_id)
        .bind(is_floor_planned)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vehicle", id));
        }

        Ok(())
    }

    /// All vehicles currently counting against a floor plan.
    ///
    /// Requires BOTH the matching reference and the attachment flag - a
    /// paid-off vehicle keeps its stale `floor_plan_id` with the flag off.
    pub async fn list_attached_to_plan(&self, floor_plan_id: &str) -> DbResult<Vec<Vehicle>> {
        let rows = sqlx::query(
            "SELECT * FROM vehicles WHERE floor_plan_id = ?1 AND is_floor_planned = 1",
        )
        .bind(floor_plan_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(vehicle_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Detaches every vehicle from a floor plan (used by plan deletion).
    ///
    /// ## Returns
    /// Number of vehicles unlinked.
    pub async fn detach_all_from_plan(&self, floor_plan_id: &str) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles SET
                floor_plan_id = NULL,
                is_floor_planned = 0,
                updated_at = ?2
            WHERE floor_plan_id = ?1
            "#,
        )
        .bind(floor_plan_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Maps a vehicles row to the domain type.
fn vehicle_from_row(row: &SqliteRow) -> Result<Vehicle, sqlx::Error> {
    Ok(Vehicle {
        id: row.try_get("id")?,
        stock_id: row.try_get("stock_id")?,
        make: row.try_get("make")?,
        model: row.try_get("model")?,
        year: row.try_get("year")?,
        vin: row.try_get("vin")?,
        sales_status: row.try_get("sales_status")?,
        sales_id: row.try_get("sales_id")?,
        floor_plan: FloorPlanLink {
            floor_plan_id: row.try_get("floor_plan_id")?,
            is_floor_planned: row.try_get("is_floor_planned")?,
        },
        vendor_id: row.try_get("vendor_id")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_vehicle(id: &str, stock_id: &str) -> Vehicle {
        let now = Utc::now();
        Vehicle {
            id: id.to_string(),
            stock_id: stock_id.to_string(),
            make: "Toyota".to_string(),
            model: "RAV4".to_string(),
            year: Some(2022),
            vin: Some("JTM000000N0000001".to_string()),
            sales_status: SalesStatus::Available,
            sales_id: None,
            floor_plan: FloorPlanLink::default(),
            vendor_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vehicles = db.vehicles();

        vehicles.insert(&sample_vehicle("v1", "AU-SUV-0001")).await.unwrap();

        let loaded = vehicles.get_by_id("v1").await.unwrap().unwrap();
        assert_eq!(loaded.stock_id, "AU-SUV-0001");
        assert_eq!(loaded.sales_status, SalesStatus::Available);
        assert!(!loaded.floor_plan.is_floor_planned);
    }

    #[tokio::test]
    async fn test_status_update_and_release() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vehicles = db.vehicles();

        vehicles.insert(&sample_vehicle("v1", "AU-SUV-0001")).await.unwrap();
        vehicles
            .update_sales_status("v1", SalesStatus::Pending, Some("sale-1"))
            .await
            .unwrap();

        let loaded = vehicles.get_by_id("v1").await.unwrap().unwrap();
        assert_eq!(loaded.sales_status, SalesStatus::Pending);
        assert_eq!(loaded.sales_id.as_deref(), Some("sale-1"));

        vehicles
            .update_sales_status("v1", SalesStatus::Available, None)
            .await
            .unwrap();
        let loaded = vehicles.get_by_id("v1").await.unwrap().unwrap();
        assert_eq!(loaded.sales_status, SalesStatus::Available);
        assert_eq!(loaded.sales_id, None);
    }

    #[tokio::test]
    async fn test_update_missing_vehicle_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .vehicles()
            .update_sales_status("nope", SalesStatus::Pending, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_attachment_listing_requires_flag() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vehicles = db.vehicles();

        vehicles.insert(&sample_vehicle("v1", "AU-SUV-0001")).await.unwrap();
        vehicles.insert(&sample_vehicle("v2", "AU-SUV-0002")).await.unwrap();

        vehicles.set_floor_plan("v1", Some("plan-1"), true).await.unwrap();
        // Stale reference with the flag off: paid-off vehicle.
        vehicles.set_floor_plan("v2", Some("plan-1"), false).await.unwrap();

        let attached = vehicles.list_attached_to_plan("plan-1").await.unwrap();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].id, "v1");
    }

    #[tokio::test]
    async fn test_detach_all_from_plan() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vehicles = db.vehicles();

        vehicles.insert(&sample_vehicle("v1", "AU-SUV-0001")).await.unwrap();
        vehicles.insert(&sample_vehicle("v2", "AU-SUV-0002")).await.unwrap();
        vehicles.set_floor_plan("v1", Some("plan-1"), true).await.unwrap();
        vehicles.set_floor_plan("v2", Some("plan-1"), true).await.unwrap();

        let unlinked = vehicles.detach_all_from_plan("plan-1").await.unwrap();
        assert_eq!(unlinked, 2);

        let attached = vehicles.list_attached_to_plan("plan-1").await.unwrap();
        assert!(attached.is_empty());
    }
}
