//! Vendor repository. Vendors supply inventory; their category code feeds
//! the stock-ID prefix of the vehicles acquired from them.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use lotledger_core::Vendor;

/// Repository for vendor database operations.
#[derive(Debug, Clone)]
pub struct VendorRepository {
    pool: SqlitePool,
}

impl VendorRepository {
    /// Creates a new VendorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VendorRepository { pool }
    }

    /// Inserts a vendor.
    pub async fn insert(&self, vendor: &Vendor) -> DbResult<()> {
        debug!(id = %vendor.id, vendor_id = %vendor.vendor_id, "Inserting vendor");

        sqlx::query(
            r#"
            INSERT INTO vendors (id, vendor_id, name, category_code, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&vendor.id)
        .bind(&vendor.vendor_id)
        .bind(&vendor.name)
        .bind(&vendor.category_code)
        .bind(vendor.created_at)
        .bind(vendor.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a vendor by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Vendor>> {
        let row = sqlx::query("SELECT * FROM vendors WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(vendor_from_row).transpose().map_err(Into::into)
    }
}

fn vendor_from_row(row: &SqliteRow) -> Result<Vendor, sqlx::Error> {
    Ok(Vendor {
        id: row.try_get("id")?,
        vendor_id: row.try_get("vendor_id")?,
        name: row.try_get("name")?,
        category_code: row.try_get("category_code")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let vendor = Vendor {
            id: "vn1".to_string(),
            vendor_id: "AU-0001".to_string(),
            name: "Lakeside Auto Auction".to_string(),
            category_code: "AU".to_string(),
            created_at: now,
            updated_at: now,
        };

        db.vendors().insert(&vendor).await.unwrap();
        let loaded = db.vendors().get_by_id("vn1").await.unwrap().unwrap();
        assert_eq!(loaded.category_code, "AU");
    }
}
