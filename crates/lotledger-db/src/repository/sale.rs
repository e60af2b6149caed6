//! # Sale Repository
//!
//! Database operations for sales transactions.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE STUB                                                        │
//! │     └── insert() → minimal pricing, receipt ID minted by the service   │
//! │                                                                         │
//! │  2. ADD DETAILS                                                        │
//! │     └── update_pricing() → cash OR financed branch                     │
//! │         (switching the branch nulls the other branch's columns)        │
//! │                                                                         │
//! │  3. INSTALLMENTS ROLL IN                                               │
//! │     └── set_next_payment_due() → rolling pointer updated per entry     │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                  │
//! │     └── delete() → service resets the vehicle + reconciles the plan    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use lotledger_core::schedule::ScheduleKind;
use lotledger_core::{PaymentSchedule, Pricing, Sale};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale.
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, receipt_id = %sale.receipt_id, "Inserting sale");

        let schedule = sale.pricing.payment_schedule.as_ref();

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, receipt_id, customer_id, vehicle_id, trade_in_vehicle_id,
                is_cash_sale, sales_type, is_reserved, total_cents,
                schedule_kind, number_of_payments,
                first_payment_date, second_payment_date, next_payment_due,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.receipt_id)
        .bind(&sale.customer_id)
        .bind(&sale.vehicle_id)
        .bind(&sale.trade_in_vehicle_id)
        .bind(sale.pricing.is_cash_sale)
        .bind(&sale.pricing.sales_type)
        .bind(sale.pricing.is_reserved)
        .bind(sale.pricing.total_cents)
        .bind(schedule.map(|s| s.kind))
        .bind(schedule.map(|s| s.number_of_payments as i64))
        .bind(schedule.and_then(|s| s.first_payment_date))
        .bind(schedule.and_then(|s| s.second_payment_date))
        .bind(sale.pricing.next_payment_due)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query("SELECT * FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(sale_from_row).transpose().map_err(Into::into)
    }

    /// Gets a sale by its human-readable receipt ID.
    pub async fn get_by_receipt(&self, receipt_id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query("SELECT * FROM sales WHERE receipt_id = ?1")
            .bind(receipt_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(sale_from_row).transpose().map_err(Into::into)
    }

    /// Latest sale referencing a vehicle, if any.
    pub async fn find_by_vehicle(&self, vehicle_id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query(
            "SELECT * FROM sales WHERE vehicle_id = ?1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(sale_from_row).transpose().map_err(Into::into)
    }

    /// Latest sale for a customer, if any.
    pub async fn latest_for_customer(&self, customer_id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query(
            "SELECT * FROM sales WHERE customer_id = ?1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(sale_from_row).transpose().map_err(Into::into)
    }

    /// Rewrites the full pricing block.
    ///
    /// ## Branch Invariant
    /// The caller passes the complete new pricing; a cash pricing carries no
    /// schedule and no next-due, so this write clears the financed columns,
    /// and vice versa - switching the sale type unsets the other branch.
    pub async fn update_pricing(&self, id: &str, pricing: &Pricing) -> DbResult<()> {
        debug!(id, is_cash = pricing.is_cash_sale, "Updating sale pricing");

        let schedule = pricing.payment_schedule.as_ref();

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                is_cash_sale = ?2,
                sales_type = ?3,
                is_reserved = ?4,
                total_cents = ?5,
                schedule_kind = ?6,
                number_of_payments = ?7,
                first_payment_date = ?8,
                second_payment_date = ?9,
                next_payment_due = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(pricing.is_cash_sale)
        .bind(&pricing.sales_type)
        .bind(pricing.is_reserved)
        .bind(pricing.total_cents)
        .bind(schedule.map(|s| s.kind))
        .bind(schedule.map(|s| s.number_of_payments as i64))
        .bind(schedule.and_then(|s| s.first_payment_date))
        .bind(schedule.and_then(|s| s.second_payment_date))
        .bind(pricing.next_payment_due)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Updates the rolling next-due-date pointer after an installment.
    pub async fn set_next_payment_due(
        &self,
        receipt_id: &str,
        next_due: NaiveDate,
    ) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE sales SET next_payment_due = ?2, updated_at = ?3 WHERE receipt_id = ?1",
        )
        .bind(receipt_id)
        .bind(next_due)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", receipt_id));
        }

        Ok(())
    }

    /// Links an ingested trade-in vehicle to the sale.
    pub async fn set_trade_in(&self, id: &str, trade_in_vehicle_id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE sales SET trade_in_vehicle_id = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(trade_in_vehicle_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Deletes a sale.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }
}

/// Maps a sales row to the domain type, reassembling the pricing block.
fn sale_from_row(row: &SqliteRow) -> Result<Sale, sqlx::Error> {
    let schedule_kind: Option<ScheduleKind> = row.try_get("schedule_kind")?;
    let number_of_payments: Option<i64> = row.try_get("number_of_payments")?;
    let first_payment_date: Option<NaiveDate> = row.try_get("first_payment_date")?;
    let second_payment_date: Option<NaiveDate> = row.try_get("second_payment_date")?;

    let payment_schedule = schedule_kind.map(|kind| PaymentSchedule {
        kind,
        number_of_payments: number_of_payments.unwrap_or(0).max(0) as u32,
        first_payment_date,
        second_payment_date,
    });

    Ok(Sale {
        id: row.try_get("id")?,
        receipt_id: row.try_get("receipt_id")?,
        customer_id: row.try_get("customer_id")?,
        vehicle_id: row.try_get("vehicle_id")?,
        trade_in_vehicle_id: row.try_get("trade_in_vehicle_id")?,
        pricing: Pricing {
            is_cash_sale: row.try_get("is_cash_sale")?,
            sales_type: row.try_get("sales_type")?,
            is_reserved: row.try_get("is_reserved")?,
            total_cents: row.try_get("total_cents")?,
            payment_schedule,
            next_payment_due: row.try_get("next_payment_due")?,
        },
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

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn stub_sale(id: &str, receipt: &str) -> Sale {
        let now = Utc::now();
        Sale {
            id: id.to_string(),
            receipt_id: receipt.to_string(),
            customer_id: "c1".to_string(),
            vehicle_id: Some("v1".to_string()),
            trade_in_vehicle_id: None,
            pricing: Pricing::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn financed_pricing() -> Pricing {
        Pricing {
            is_cash_sale: false,
            sales_type: Some("retail".to_string()),
            is_reserved: false,
            total_cents: Some(2_400_000),
            payment_schedule: Some(PaymentSchedule {
                kind: ScheduleKind::Monthly,
                number_of_payments: 12,
                first_payment_date: Some(d(2026, 9, 1)),
                second_payment_date: None,
            }),
            next_payment_due: Some(d(2026, 9, 1)),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_receipt() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sales = db.sales();

        sales.insert(&stub_sale("s1", "RC-2026-0001")).await.unwrap();

        let loaded = sales.get_by_receipt("RC-2026-0001").await.unwrap().unwrap();
        assert_eq!(loaded.id, "s1");
        assert!(loaded.pricing.payment_schedule.is_none());
    }

    #[tokio::test]
    async fn test_financed_pricing_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sales = db.sales();

        sales.insert(&stub_sale("s1", "RC-2026-0001")).await.unwrap();
        sales.update_pricing("s1", &financed_pricing()).await.unwrap();

        let loaded = sales.get_by_id("s1").await.unwrap().unwrap();
        let schedule = loaded.pricing.payment_schedule.unwrap();
        assert_eq!(schedule.kind, ScheduleKind::Monthly);
        assert_eq!(schedule.number_of_payments, 12);
        assert_eq!(schedule.first_payment_date, Some(d(2026, 9, 1)));
        assert_eq!(loaded.pricing.next_payment_due, Some(d(2026, 9, 1)));
    }

    #[tokio::test]
    async fn test_switching_to_cash_unsets_schedule() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sales = db.sales();

        sales.insert(&stub_sale("s1", "RC-2026-0001")).await.unwrap();
        sales.update_pricing("s1", &financed_pricing()).await.unwrap();

        let cash = Pricing {
            is_cash_sale: true,
            sales_type: Some("retail".to_string()),
            total_cents: Some(2_400_000),
            ..Pricing::default()
        };
        sales.update_pricing("s1", &cash).await.unwrap();

        let loaded = sales.get_by_id("s1").await.unwrap().unwrap();
        assert!(loaded.pricing.is_cash_sale);
        assert!(loaded.pricing.payment_schedule.is_none());
        assert!(loaded.pricing.next_payment_due.is_none());
    }

    #[tokio::test]
    async fn test_next_payment_due_pointer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sales = db.sales();

        sales.insert(&stub_sale("s1", "RC-2026-0001")).await.unwrap();
        sales.update_pricing("s1", &financed_pricing()).await.unwrap();
        sales
            .set_next_payment_due("RC-2026-0001", d(2026, 10, 1))
            .await
            .unwrap();

        let loaded = sales.get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(loaded.pricing.next_payment_due, Some(d(2026, 10, 1)));
    }

    #[tokio::test]
    async fn test_delete_missing_sale_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.sales().delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_receipt_id_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sales = db.sales();

        sales.insert(&stub_sale("s1", "RC-2026-0001")).await.unwrap();
        let err = sales.insert(&stub_sale("s2", "RC-2026-0001")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
