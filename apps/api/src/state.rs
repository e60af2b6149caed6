//! Shared application state.

use lotledger_db::Database;

use crate::config::ApiConfig;
use crate::services::accounting_service::AccountingService;
use crate::services::floorplan_service::FloorPlanService;
use crate::services::party_service::PartyService;
use crate::services::sales_service::SalesService;
use crate::services::summary_service::SummaryService;
use crate::services::vehicle_service::VehicleService;

/// Shared application state, cloned into every handler via `Arc`.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState { db, config }
    }

    /// Vehicle inventory operations.
    pub fn vehicle_service(&self) -> VehicleService {
        VehicleService::new(self.db.clone())
    }

    /// Sale lifecycle operations.
    pub fn sales_service(&self) -> SalesService {
        SalesService::new(self.db.clone())
    }

    /// Installment ledger operations.
    pub fn accounting_service(&self) -> AccountingService {
        AccountingService::new(self.db.clone())
    }

    /// Floor-plan operations, including the status reconciler.
    pub fn floor_plan_service(&self) -> FloorPlanService {
        FloorPlanService::new(self.db.clone())
    }

    /// Customer and vendor operations.
    pub fn party_service(&self) -> PartyService {
        PartyService::new(self.db.clone())
    }

    /// Read-side aggregation views.
    pub fn summary_service(&self) -> SummaryService {
        SummaryService::new(self.db.clone())
    }
}
