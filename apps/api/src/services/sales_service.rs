//! # Sales Service
//!
//! Sale lifecycle orchestration: stub creation, pricing details, trade-in
//! ingestion, and deletion.
//!
//! ## Lifecycle and Vehicle Status
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create stub        ──► receipt minted, vehicle → Pending              │
//! │  add details        ──► cash|financed branch, vehicle → Reserved/Sold  │
//! │  attach trade-in    ──► trade-in vehicle ingested into inventory       │
//! │  delete             ──► vehicle → Available, plan reconciled           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Vehicle status write-backs and reconciliation are best-effort: once the
//! primary sale write lands, their failures surface as warnings, never as
//! request errors.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use lotledger_core::error::{CoreError, ValidationError};
use lotledger_core::schedule::ScheduleKind;
use lotledger_core::status::{status_after, SaleLifecycleEvent};
use lotledger_core::validation::{validate_amount_cents, validate_number_of_payments};
use lotledger_core::{ids, Outcome, PaymentSchedule, Pricing, Sale};
use lotledger_db::Database;

use crate::error::ApiResult;
use crate::services::floorplan_service::FloorPlanService;
use crate::services::vehicle_service::{NewVehicle, VehicleService};

// =============================================================================
// Payloads
// =============================================================================

/// Request payload for creating a sale stub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub customer_id: String,
    pub vehicle_id: Option<String>,
}

/// Payment-schedule block inside a details payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDetails {
    /// Free-form cadence string, parsed case-insensitively. Unrecognized
    /// values default to monthly.
    pub schedule_type: String,
    pub number_of_payments: i64,
    pub first_payment_date: Option<NaiveDate>,
    pub second_payment_date: Option<NaiveDate>,
    pub next_payment_due: Option<NaiveDate>,
}

/// Request payload for adding pricing details to a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDetails {
    pub is_cash_sale: bool,
    pub sales_type: Option<String>,
    #[serde(default)]
    pub is_reserved: bool,
    pub total_cents: Option<i64>,
    /// Required for financed sales, ignored for cash sales.
    pub payment_schedule: Option<ScheduleDetails>,
}

/// Request payload for ingesting a trade-in vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeInVehicle {
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub vin: Option<String>,
    pub vendor_category_code: String,
    pub vehicle_type_code: String,
}

// =============================================================================
// Service
// =============================================================================

/// Sale lifecycle operations.
pub struct SalesService {
    db: Database,
}

impl SalesService {
    pub fn new(db: Database) -> Self {
        SalesService { db }
    }

    /// Creates a sale stub with a freshly minted, yearly-namespaced receipt
    /// ID. The linked vehicle moves to Pending best-effort.
    pub async fn create(&self, req: NewSale) -> ApiResult<Outcome<Sale>> {
        if self.db.customers().get_by_id(&req.customer_id).await?.is_none() {
            return Err(CoreError::CustomerNotFound(req.customer_id).into());
        }
        if let Some(vehicle_id) = &req.vehicle_id {
            if self.db.vehicles().get_by_id(vehicle_id).await?.is_none() {
                return Err(CoreError::VehicleNotFound(vehicle_id.clone()).into());
            }
        }

        let now = Utc::now();
        let year = now.year();
        let seq = self.db.sequences().next(&ids::receipt_namespace(year)).await?;
        let receipt_id = ids::receipt_id(year, seq);

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            receipt_id,
            customer_id: req.customer_id,
            vehicle_id: req.vehicle_id,
            trade_in_vehicle_id: None,
            pricing: Pricing::default(),
            created_at: now,
            updated_at: now,
        };
        self.db.sales().insert(&sale).await?;
        info!(id = %sale.id, receipt = %sale.receipt_id, "Sale created");

        let mut outcome = Outcome::clean(sale);
        if let Some(vehicle_id) = outcome.value.vehicle_id.clone() {
            let status = status_after(SaleLifecycleEvent::Created);
            if let Err(e) = self
                .db
                .vehicles()
                .update_sales_status(&vehicle_id, status, Some(&outcome.value.id))
                .await
            {
                outcome.warn("vehicle_status_update", e.to_string());
            }
        }

        Ok(outcome)
    }

    /// Gets a sale by ID.
    pub async fn get(&self, id: &str) -> ApiResult<Sale> {
        self.db
            .sales()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()).into())
    }

    /// Adds pricing details, choosing the cash or financed branch.
    ///
    /// Switching branches unsets the other branch's fields. The linked
    /// vehicle moves to Reserved or Sold best-effort.
    pub async fn add_details(&self, sale_id: &str, req: SaleDetails) -> ApiResult<Outcome<Sale>> {
        let sale = self.get(sale_id).await?;

        if let Some(cents) = req.total_cents {
            validate_amount_cents("totalCents", cents)?;
        }

        let payment_schedule = if req.is_cash_sale {
            None
        } else {
            let schedule = req.payment_schedule.ok_or(ValidationError::Required {
                field: "paymentSchedule".to_string(),
            })?;
            validate_number_of_payments(schedule.number_of_payments)?;

            Some((
                PaymentSchedule {
                    kind: ScheduleKind::parse(&schedule.schedule_type),
                    number_of_payments: schedule.number_of_payments as u32,
                    first_payment_date: schedule.first_payment_date,
                    second_payment_date: schedule.second_payment_date,
                },
                schedule.next_payment_due.or(schedule.first_payment_date),
            ))
        };

        let (payment_schedule, next_payment_due) = match payment_schedule {
            Some((schedule, next)) => (Some(schedule), next),
            None => (None, None),
        };

        let pricing = Pricing {
            is_cash_sale: req.is_cash_sale,
            sales_type: req.sales_type,
            is_reserved: req.is_reserved,
            total_cents: req.total_cents,
            payment_schedule,
            next_payment_due,
        };
        self.db.sales().update_pricing(sale_id, &pricing).await?;
        info!(id = sale_id, cash = req.is_cash_sale, "Sale details added");

        let mut outcome = Outcome::clean(self.get(sale_id).await?);
        if let Some(vehicle_id) = sale.vehicle_id {
            let status = status_after(SaleLifecycleEvent::DetailsAdded {
                reserved: req.is_reserved,
            });
            if let Err(e) = self
                .db
                .vehicles()
                .update_sales_status(&vehicle_id, status, Some(sale_id))
                .await
            {
                outcome.warn("vehicle_status_update", e.to_string());
            }
        }

        Ok(outcome)
    }

    /// Ingests a trade-in vehicle into inventory and links it to the sale.
    pub async fn attach_trade_in(
        &self,
        sale_id: &str,
        req: TradeInVehicle,
    ) -> ApiResult<Outcome<Sale>> {
        self.get(sale_id).await?;

        let vehicle = VehicleService::new(self.db.clone())
            .create(NewVehicle {
                make: req.make,
                model: req.model,
                year: req.year,
                vin: req.vin,
                vendor_id: None,
                vendor_category_code: req.vendor_category_code,
                vehicle_type_code: req.vehicle_type_code,
            })
            .await?;

        self.db.sales().set_trade_in(sale_id, &vehicle.id).await?;
        info!(sale_id, trade_in = %vehicle.stock_id, "Trade-in attached");

        Ok(Outcome::clean(self.get(sale_id).await?))
    }

    /// Deletes a sale. The linked vehicle returns to Available with its
    /// sale link cleared, and its floor plan is re-reconciled (the vehicle
    /// owes again once its sale is gone) - both best-effort.
    pub async fn delete(&self, sale_id: &str) -> ApiResult<Outcome<Sale>> {
        let sale = self.get(sale_id).await?;
        self.db.sales().delete(sale_id).await?;
        info!(id = sale_id, receipt = %sale.receipt_id, "Sale deleted");

        let mut outcome = Outcome::clean(sale);
        if let Some(vehicle_id) = outcome.value.vehicle_id.clone() {
            let status = status_after(SaleLifecycleEvent::Deleted);
            if let Err(e) = self
                .db
                .vehicles()
                .update_sales_status(&vehicle_id, status, None)
                .await
            {
                outcome.warn("vehicle_status_update", e.to_string());
            }

            if let Err(e) = FloorPlanService::new(self.db.clone())
                .reconcile_for_vehicle(&vehicle_id)
                .await
            {
                outcome.warn("floor_plan_reconcile", e.to_string());
            }
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
    use lotledger_core::{Customer, SalesStatus};
    use lotledger_db::DbConfig;

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        db.customers()
            .insert(&Customer {
                id: "c1".to_string(),
                customer_number: "1001".to_string(),
                name: "Dana Whitfield".to_string(),
                email: None,
                phone: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db
    }

    async fn create_vehicle(db: &Database) -> String {
        VehicleService::new(db.clone())
            .create(NewVehicle {
                make: "Ford".to_string(),
                model: "Escape".to_string(),
                year: Some(2020),
                vin: None,
                vendor_id: None,
                vendor_category_code: "AU".to_string(),
                vehicle_type_code: "SUV".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn financed_details(payments: i64) -> SaleDetails {
        SaleDetails {
            is_cash_sale: false,
            sales_type: Some("retail".to_string()),
            is_reserved: false,
            total_cents: Some(1_500_000),
            payment_schedule: Some(ScheduleDetails {
                schedule_type: "Monthly".to_string(),
                number_of_payments: payments,
                first_payment_date: NaiveDate::from_ymd_opt(2026, 9, 1),
                second_payment_date: None,
                next_payment_due: None,
            }),
        }
    }

    #[tokio::test]
    async fn test_create_mints_receipt_and_flags_vehicle_pending() {
        let db = test_db().await;
        let svc = SalesService::new(db.clone());
        let vehicle_id = create_vehicle(&db).await;

        let outcome = svc
            .create(NewSale {
                customer_id: "c1".to_string(),
                vehicle_id: Some(vehicle_id.clone()),
            })
            .await
            .unwrap();

        assert!(outcome.is_clean());
        let year = Utc::now().year();
        assert_eq!(outcome.value.receipt_id, format!("RC-{year}-0001"));

        let vehicle = db.vehicles().get_by_id(&vehicle_id).await.unwrap().unwrap();
        assert_eq!(vehicle.sales_status, SalesStatus::Pending);
        assert_eq!(vehicle.sales_id.as_deref(), Some(outcome.value.id.as_str()));
    }

    #[tokio::test]
    async fn test_create_requires_existing_customer() {
        let db = test_db().await;
        let svc = SalesService::new(db.clone());

        let err = svc
            .create(NewSale {
                customer_id: "ghost".to_string(),
                vehicle_id: None,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Customer not found"));
    }

    #[tokio::test]
    async fn test_financed_details_set_schedule_and_sold_status() {
        let db = test_db().await;
        let svc = SalesService::new(db.clone());
        let vehicle_id = create_vehicle(&db).await;

        let sale = svc
            .create(NewSale {
                customer_id: "c1".to_string(),
                vehicle_id: Some(vehicle_id.clone()),
            })
            .await
            .unwrap()
            .value;

        let outcome = svc.add_details(&sale.id, financed_details(12)).await.unwrap();
        assert!(outcome.is_clean());

        let schedule = outcome.value.pricing.payment_schedule.unwrap();
        assert_eq!(schedule.kind, ScheduleKind::Monthly);
        assert_eq!(schedule.number_of_payments, 12);
        // next-due pointer falls back to the first payment date.
        assert_eq!(
            outcome.value.pricing.next_payment_due,
            NaiveDate::from_ymd_opt(2026, 9, 1)
        );

        let vehicle = db.vehicles().get_by_id(&vehicle_id).await.unwrap().unwrap();
        assert_eq!(vehicle.sales_status, SalesStatus::Sold);
    }

    #[tokio::test]
    async fn test_reserved_details_flag_vehicle_reserved() {
        let db = test_db().await;
        let svc = SalesService::new(db.clone());
        let vehicle_id = create_vehicle(&db).await;

        let sale = svc
            .create(NewSale {
                customer_id: "c1".to_string(),
                vehicle_id: Some(vehicle_id.clone()),
            })
            .await
            .unwrap()
            .value;

        let mut details = financed_details(12);
        details.is_reserved = true;
        svc.add_details(&sale.id, details).await.unwrap();

        let vehicle = db.vehicles().get_by_id(&vehicle_id).await.unwrap().unwrap();
        assert_eq!(vehicle.sales_status, SalesStatus::Reserved);
    }

    #[tokio::test]
    async fn test_financed_details_require_a_schedule() {
        let db = test_db().await;
        let svc = SalesService::new(db.clone());

        let sale = svc
            .create(NewSale {
                customer_id: "c1".to_string(),
                vehicle_id: None,
            })
            .await
            .unwrap()
            .value;

        let err = svc
            .add_details(
                &sale.id,
                SaleDetails {
                    is_cash_sale: false,
                    sales_type: None,
                    is_reserved: false,
                    total_cents: None,
                    payment_schedule: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("paymentSchedule"));
    }

    #[tokio::test]
    async fn test_switching_to_cash_clears_the_financed_branch() {
        let db = test_db().await;
        let svc = SalesService::new(db.clone());

        let sale = svc
            .create(NewSale {
                customer_id: "c1".to_string(),
                vehicle_id: None,
            })
            .await
            .unwrap()
            .value;
        svc.add_details(&sale.id, financed_details(12)).await.unwrap();

        let cash = svc
            .add_details(
                &sale.id,
                SaleDetails {
                    is_cash_sale: true,
                    sales_type: Some("retail".to_string()),
                    is_reserved: false,
                    total_cents: Some(1_500_000),
                    payment_schedule: None,
                },
            )
            .await
            .unwrap();

        assert!(cash.value.pricing.is_cash_sale);
        assert!(cash.value.pricing.payment_schedule.is_none());
        assert!(cash.value.pricing.next_payment_due.is_none());
    }

    #[tokio::test]
    async fn test_trade_in_is_ingested_into_inventory() {
        let db = test_db().await;
        let svc = SalesService::new(db.clone());

        let sale = svc
            .create(NewSale {
                customer_id: "c1".to_string(),
                vehicle_id: None,
            })
            .await
            .unwrap()
            .value;

        let outcome = svc
            .attach_trade_in(
                &sale.id,
                TradeInVehicle {
                    make: "Mazda".to_string(),
                    model: "CX-5".to_string(),
                    year: Some(2018),
                    vin: None,
                    vendor_category_code: "TI".to_string(),
                    vehicle_type_code: "SUV".to_string(),
                },
            )
            .await
            .unwrap();

        let trade_in_id = outcome.value.trade_in_vehicle_id.unwrap();
        let trade_in = db.vehicles().get_by_id(&trade_in_id).await.unwrap().unwrap();
        assert_eq!(trade_in.stock_id, "TI-SUV-0001");
        assert_eq!(trade_in.sales_status, SalesStatus::Available);
    }

    #[tokio::test]
    async fn test_delete_releases_the_vehicle() {
        let db = test_db().await;
        let svc = SalesService::new(db.clone());
        let vehicle_id = create_vehicle(&db).await;

        let sale = svc
            .create(NewSale {
                customer_id: "c1".to_string(),
                vehicle_id: Some(vehicle_id.clone()),
            })
            .await
            .unwrap()
            .value;
        svc.add_details(&sale.id, financed_details(12)).await.unwrap();

        let outcome = svc.delete(&sale.id).await.unwrap();
        assert!(outcome.is_clean());

        let vehicle = db.vehicles().get_by_id(&vehicle_id).await.unwrap().unwrap();
        assert_eq!(vehicle.sales_status, SalesStatus::Available);
        assert_eq!(vehicle.sales_id, None);
        assert!(svc.get(&sale.id).await.is_err());
    }
}
