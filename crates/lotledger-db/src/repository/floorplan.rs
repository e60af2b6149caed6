//! # Floor-Plan Repository
//!
//! Database operations for floor-plan financing arrangements.
//!
//! Status transitions are written here but DECIDED by the pure derivation
//! in lotledger-core - the reconciler in the API app computes the target
//! status and calls [`FloorPlanRepository::set_status`] only on an actual
//! transition.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use lotledger_core::{FloorPlan, FloorPlanStatus};

/// Repository for floor-plan database operations.
#[derive(Debug, Clone)]
pub struct FloorPlanRepository {
    pool: SqlitePool,
}

impl FloorPlanRepository {
    /// Creates a new FloorPlanRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FloorPlanRepository { pool }
    }

    /// Inserts a floor plan.
    pub async fn insert(&self, plan: &FloorPlan) -> DbResult<()> {
        debug!(id = %plan.id, company = %plan.company_name, "Inserting floor plan");

        sqlx::query(
            r#"
            INSERT INTO floor_plans (
                id, company_name, status, rate_bps, fee_cents, term_days,
                is_deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.company_name)
        .bind(plan.status)
        .bind(plan.rate_bps)
        .bind(plan.fee_cents)
        .bind(plan.term_days)
        .bind(plan.is_deleted)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a floor plan by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<FloorPlan>> {
        let row = sqlx::query("SELECT * FROM floor_plans WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(plan_from_row).transpose().map_err(Into::into)
    }

    /// Updates the editable (non-derived) fields of a plan.
    pub async fn update_details(
        &self,
        id: &str,
        company_name: &str,
        rate_bps: Option<i64>,
        fee_cents: Option<i64>,
        term_days: Option<i64>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE floor_plans SET
                company_name = ?2,
                rate_bps = ?3,
                fee_cents = ?4,
                term_days = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(company_name)
        .bind(rate_bps)
        .bind(fee_cents)
        .bind(term_days)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("FloorPlan", id));
        }

        Ok(())
    }

    /// Writes a derived status transition.
    pub async fn set_status(&self, id: &str, status: FloorPlanStatus) -> DbResult<()> {
        debug!(id, ?status, "Floor plan status transition");

        let result = sqlx::query(
            "UPDATE floor_plans SET status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("FloorPlan", id));
        }

        Ok(())
    }

    /// Marks a plan soft-deleted, freezing its status forever.
    pub async fn mark_deleted(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE floor_plans SET is_deleted = 1, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("FloorPlan", id));
        }

        Ok(())
    }

    /// Removes a plan row entirely. Callers must detach vehicles first.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM floor_plans WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("FloorPlan", id));
        }

        Ok(())
    }

    /// All currently Active, non-deleted plans - the sweep set checked when
    /// a vehicle's attachment changes.
    pub async fn list_active(&self) -> DbResult<Vec<FloorPlan>> {
        let rows = sqlx::query(
            "SELECT * FROM floor_plans WHERE status = 'active' AND is_deleted = 0",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(plan_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

/// Maps a floor_plans row to the domain type.
fn plan_from_row(row: &SqliteRow) -> Result<FloorPlan, sqlx::Error> {
    Ok(FloorPlan {
        id: row.try_get("id")?,
        company_name: row.try_get("company_name")?,
        status: row.try_get("status")?,
        rate_bps: row.try_get("rate_bps")?,
        fee_cents: row.try_get("fee_cents")?,
        term_days: row.try_get("term_days")?,
        is_deleted: row.try_get("is_deleted")?,
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

    fn plan(id: &str, company: &str) -> FloorPlan {
        let now = Utc::now();
        FloorPlan {
            id: id.to_string(),
            company_name: company.to_string(),
            status: FloorPlanStatus::Inactive,
            rate_bps: Some(450),
            fee_cents: Some(25_000),
            term_days: Some(90),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_status_transition() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let plans = db.floor_plans();

        plans.insert(&plan("p1", "Heartland Floor Credit")).await.unwrap();

        plans.set_status("p1", FloorPlanStatus::Active).await.unwrap();
        let loaded = plans.get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(loaded.status, FloorPlanStatus::Active);

        let active = plans.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_soft_deleted_plans_leave_active_listing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let plans = db.floor_plans();

        plans.insert(&plan("p1", "Heartland Floor Credit")).await.unwrap();
        plans.set_status("p1", FloorPlanStatus::Active).await.unwrap();
        plans.mark_deleted("p1").await.unwrap();

        assert!(plans.list_active().await.unwrap().is_empty());
        let loaded = plans.get_by_id("p1").await.unwrap().unwrap();
        assert!(loaded.is_deleted);
    }

    #[tokio::test]
    async fn test_duplicate_company_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let plans = db.floor_plans();

        plans.insert(&plan("p1", "Heartland Floor Credit")).await.unwrap();
        let err = plans
            .insert(&plan("p2", "Heartland Floor Credit"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
