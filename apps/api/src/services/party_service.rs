//! # Party Service
//!
//! Customer and vendor records. Both carry counter-minted business IDs:
//! customers get an unpadded running number on a base offset, vendors get
//! a `{categoryCode}-{seq:04}` ID namespaced per category.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use lotledger_core::error::CoreError;
use lotledger_core::validation::{validate_code, validate_name};
use lotledger_core::{ids, Customer, Vendor};
use lotledger_db::Database;

use crate::error::ApiResult;

// =============================================================================
// Payloads
// =============================================================================

/// Request payload for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Request payload for creating a vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVendor {
    pub name: String,
    pub category_code: String,
}

// =============================================================================
// Service
// =============================================================================

/// Customer and vendor operations.
pub struct PartyService {
    db: Database,
}

impl PartyService {
    pub fn new(db: Database) -> Self {
        PartyService { db }
    }

    /// Creates a customer with a minted running number.
    pub async fn create_customer(&self, req: NewCustomer) -> ApiResult<Customer> {
        validate_name("name", &req.name)?;

        let seq = self.db.sequences().next(ids::CUSTOMER_NAMESPACE).await?;
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            customer_number: ids::customer_number(seq),
            name: req.name.trim().to_string(),
            email: req.email,
            phone: req.phone,
            created_at: now,
            updated_at: now,
        };

        self.db.customers().insert(&customer).await?;
        info!(id = %customer.id, number = %customer.customer_number, "Customer created");
        Ok(customer)
    }

    /// Gets a customer by ID.
    pub async fn get_customer(&self, id: &str) -> ApiResult<Customer> {
        self.db
            .customers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()).into())
    }

    /// Creates a vendor with a minted category-scoped vendor ID.
    pub async fn create_vendor(&self, req: NewVendor) -> ApiResult<Vendor> {
        validate_name("name", &req.name)?;
        validate_code("categoryCode", &req.category_code)?;

        let code = req.category_code.trim().to_string();
        let seq = self.db.sequences().next(&ids::vendor_namespace(&code)).await?;
        let now = Utc::now();
        let vendor = Vendor {
            id: Uuid::new_v4().to_string(),
            vendor_id: ids::vendor_id(&code, seq),
            name: req.name.trim().to_string(),
            category_code: code,
            created_at: now,
            updated_at: now,
        };

        self.db.vendors().insert(&vendor).await?;
        info!(id = %vendor.id, vendor_id = %vendor.vendor_id, "Vendor created");
        Ok(vendor)
    }

    /// Gets a vendor by ID.
    pub async fn get_vendor(&self, id: &str) -> ApiResult<Vendor> {
        self.db
            .vendors()
            .get_by_id(id)
            .await?
            .ok_or_else(|| crate::error::ApiError::NotFound(format!("Vendor not found: {id}")))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lotledger_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_customer_numbers_start_at_1001() {
        let db = test_db().await;
        let svc = PartyService::new(db.clone());

        let first = svc
            .create_customer(NewCustomer {
                name: "Dana Whitfield".to_string(),
                email: None,
                phone: None,
            })
            .await
            .unwrap();
        let second = svc
            .create_customer(NewCustomer {
                name: "Ray Osei".to_string(),
                email: None,
                phone: None,
            })
            .await
            .unwrap();

        assert_eq!(first.customer_number, "1001");
        assert_eq!(second.customer_number, "1002");
    }

    #[tokio::test]
    async fn test_vendor_ids_are_namespaced_per_category() {
        let db = test_db().await;
        let svc = PartyService::new(db.clone());

        let auction = svc
            .create_vendor(NewVendor {
                name: "Lakeside Auto Auction".to_string(),
                category_code: "AU".to_string(),
            })
            .await
            .unwrap();
        let wholesale = svc
            .create_vendor(NewVendor {
                name: "Plains Wholesale".to_string(),
                category_code: "WH".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(auction.vendor_id, "AU-0001");
        assert_eq!(wholesale.vendor_id, "WH-0001");
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let db = test_db().await;
        let err = PartyService::new(db.clone())
            .create_customer(NewCustomer {
                name: "   ".to_string(),
                email: None,
                phone: None,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("required"));
    }
}
