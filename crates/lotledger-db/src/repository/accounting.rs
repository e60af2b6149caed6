//! # Accounting Repository
//!
//! The append-only installment ledger. Entries are created per payment
//! event, never updated or deleted; "the latest" entry is found by reading
//! in descending installment-number order.
//!
//! ## Installment Numbering
//! Numbers are assigned by the service as `count_by_receipt + 1`. The count
//! and the insert are two separate statements with no unique constraint
//! backing them - concurrent postings for the same receipt can mint the
//! same number (a documented, accepted race; see DESIGN.md). The floor-plan
//! reconciler tolerates the resulting over-count.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use lotledger_core::InstallmentEntry;

/// Repository for installment ledger operations.
#[derive(Debug, Clone)]
pub struct AccountingRepository {
    pool: SqlitePool,
}

impl AccountingRepository {
    /// Creates a new AccountingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountingRepository { pool }
    }

    /// Appends an installment entry.
    pub async fn insert(&self, entry: &InstallmentEntry) -> DbResult<()> {
        debug!(
            receipt = %entry.receipt_number,
            installment = entry.installment_number,
            "Inserting installment entry"
        );

        sqlx::query(
            r#"
            INSERT INTO accounting_entries (
                id, receipt_number, installment_number, due_date,
                total_number_of_payments, amount_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.receipt_number)
        .bind(entry.installment_number as i64)
        .bind(entry.due_date)
        .bind(entry.total_number_of_payments as i64)
        .bind(entry.amount_cents)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of entries recorded for a receipt.
    pub async fn count_by_receipt(&self, receipt_number: &str) -> DbResult<u32> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM accounting_entries WHERE receipt_number = ?1",
        )
        .bind(receipt_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u32)
    }

    /// The latest entry for a receipt: highest installment number, with
    /// creation time as the tie-breaker (duplicates from the documented
    /// numbering race resolve to the most recent row).
    pub async fn latest_by_receipt(
        &self,
        receipt_number: &str,
    ) -> DbResult<Option<InstallmentEntry>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM accounting_entries
            WHERE receipt_number = ?1
            ORDER BY installment_number DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(receipt_number)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(entry_from_row).transpose().map_err(Into::into)
    }

    /// All entries for a receipt, newest installment first.
    pub async fn list_by_receipt(&self, receipt_number: &str) -> DbResult<Vec<InstallmentEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM accounting_entries
            WHERE receipt_number = ?1
            ORDER BY installment_number DESC, created_at DESC
            "#,
        )
        .bind(receipt_number)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(entry_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Paginated listing keeping only the highest-numbered entry per
    /// receipt - the read side of the accounting view.
    pub async fn latest_per_receipt(
        &self,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<InstallmentEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT a.* FROM accounting_entries a
            JOIN (
                SELECT receipt_number, MAX(installment_number) AS max_no
                FROM accounting_entries
                GROUP BY receipt_number
            ) m ON a.receipt_number = m.receipt_number
               AND a.installment_number = m.max_no
            ORDER BY a.created_at DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(entry_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

/// Maps an accounting_entries row to the domain type.
fn entry_from_row(row: &SqliteRow) -> Result<InstallmentEntry, sqlx::Error> {
    Ok(InstallmentEntry {
        id: row.try_get("id")?,
        receipt_number: row.try_get("receipt_number")?,
        installment_number: row.try_get::<i64, _>("installment_number")?.max(0) as u32,
        due_date: row.try_get::<NaiveDate, _>("due_date")?,
        total_number_of_payments: row.try_get::<i64, _>("total_number_of_payments")?.max(0) as u32,
        amount_cents: row.try_get("amount_cents")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
