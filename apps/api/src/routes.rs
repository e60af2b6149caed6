//! # HTTP Routes
//!
//! Route table and thin handlers. Handlers only deserialize, delegate to a
//! service, and serialize - every business decision lives below this layer.
//!
//! ## Route Table
//! ```text
//! GET    /health
//!
//! POST   /api/vehicles                      create vehicle
//! GET    /api/vehicles/{id}                 fetch vehicle
//! PUT    /api/vehicles/{id}/floor-plan      change floor-plan attachment
//!
//! POST   /api/sales                         create sale stub
//! GET    /api/sales/{id}                    fetch sale
//! DELETE /api/sales/{id}                    delete sale (vehicle released)
//! PUT    /api/sales/{id}/details            add pricing details
//! PUT    /api/sales/{id}/trade-in           ingest trade-in vehicle
//!
//! POST   /api/accounting                    record installment
//! GET    /api/accounting                    paginated receipt listing
//! GET    /api/accounting/{receipt}          entries for one receipt
//!
//! POST   /api/floor-plans                   create floor plan
//! GET    /api/floor-plans/{id}              fetch floor plan
//! PUT    /api/floor-plans/{id}              edit + re-reconcile
//! DELETE /api/floor-plans/{id}              hard delete (detaches vehicles)
//! POST   /api/floor-plans/{id}/archive      soft delete (status frozen)
//!
//! POST   /api/customers                     create customer
//! GET    /api/customers/{id}                fetch customer
//! GET    /api/customers/{id}/summary        payment summary view
//! POST   /api/vendors                       create vendor
//! GET    /api/vendors/{id}                  fetch vendor
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use lotledger_core::summary::PaymentSummary;
use lotledger_core::{Customer, FloorPlan, InstallmentEntry, Outcome, Sale, Vehicle, Vendor};

use crate::error::ApiResult;
use crate::services::accounting_service::NewInstallment;
use crate::services::floorplan_service::{FloorPlanDetails, NewFloorPlan};
use crate::services::party_service::{NewCustomer, NewVendor};
use crate::services::sales_service::{NewSale, SaleDetails, TradeInVehicle};
use crate::services::summary_service::ReceiptListingItem;
use crate::services::vehicle_service::{FloorPlanAttachment, NewVehicle};
use crate::state::AppState;

/// Builds the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/vehicles", post(create_vehicle))
        .route("/api/vehicles/{id}", get(get_vehicle))
        .route("/api/vehicles/{id}/floor-plan", put(set_vehicle_floor_plan))
        .route("/api/sales", post(create_sale))
        .route("/api/sales/{id}", get(get_sale).delete(delete_sale))
        .route("/api/sales/{id}/details", put(add_sale_details))
        .route("/api/sales/{id}/trade-in", put(attach_trade_in))
        .route("/api/accounting", post(record_installment).get(accounting_listing))
        .route("/api/accounting/{receipt}", get(receipt_entries))
        .route("/api/floor-plans", post(create_floor_plan))
        .route(
            "/api/floor-plans/{id}",
            get(get_floor_plan).put(update_floor_plan).delete(delete_floor_plan),
        )
        .route("/api/floor-plans/{id}/archive", post(archive_floor_plan))
        .route("/api/customers", post(create_customer))
        .route("/api/customers/{id}", get(get_customer))
        .route("/api/customers/{id}/summary", get(customer_summary))
        .route("/api/vendors", post(create_vendor))
        .route("/api/vendors/{id}", get(get_vendor))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let healthy = state.db.health_check().await;
    Json(json!({ "status": if healthy { "ok" } else { "degraded" } }))
}

// =============================================================================
// Vehicles
// =============================================================================

async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewVehicle>,
) -> ApiResult<Json<Vehicle>> {
    Ok(Json(state.vehicle_service().create(req).await?))
}

async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vehicle>> {
    Ok(Json(state.vehicle_service().get(&id).await?))
}

async fn set_vehicle_floor_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FloorPlanAttachment>,
) -> ApiResult<Json<Outcome<Vehicle>>> {
    Ok(Json(state.vehicle_service().set_floor_plan(&id, req).await?))
}

// =============================================================================
// Sales
// =============================================================================

async fn create_sale(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSale>,
) -> ApiResult<Json<Outcome<Sale>>> {
    Ok(Json(state.sales_service().create(req).await?))
}

async fn get_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sale>> {
    Ok(Json(state.sales_service().get(&id).await?))
}

async fn add_sale_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SaleDetails>,
) -> ApiResult<Json<Outcome<Sale>>> {
    Ok(Json(state.sales_service().add_details(&id, req).await?))
}

async fn attach_trade_in(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<TradeInVehicle>,
) -> ApiResult<Json<Outcome<Sale>>> {
    Ok(Json(state.sales_service().attach_trade_in(&id, req).await?))
}

async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Outcome<Sale>>> {
    Ok(Json(state.sales_service().delete(&id).await?))
}

// =============================================================================
// Accounting
// =============================================================================

async fn record_installment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewInstallment>,
) -> ApiResult<Json<Outcome<InstallmentEntry>>> {
    Ok(Json(state.accounting_service().record_installment(req).await?))
}

#[derive(Debug, Deserialize)]
struct Pagination {
    page: Option<i64>,
    per_page: Option<i64>,
}

async fn accounting_listing(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<ReceiptListingItem>>> {
    let page = pagination.page.unwrap_or(1);
    let per_page = pagination.per_page.unwrap_or(state.config.default_page_size);
    let listing = state
        .summary_service()
        .accounting_listing(page, per_page, state.config.max_page_size)
        .await?;
    Ok(Json(listing))
}

async fn receipt_entries(
    State(state): State<Arc<AppState>>,
    Path(receipt): Path<String>,
) -> ApiResult<Json<Vec<InstallmentEntry>>> {
    Ok(Json(state.accounting_service().list_by_receipt(&receipt).await?))
}

// =============================================================================
// Floor Plans
// =============================================================================

async fn create_floor_plan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewFloorPlan>,
) -> ApiResult<Json<FloorPlan>> {
    Ok(Json(state.floor_plan_service().create(req).await?))
}

async fn get_floor_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FloorPlan>> {
    Ok(Json(state.floor_plan_service().get(&id).await?))
}

async fn update_floor_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FloorPlanDetails>,
) -> ApiResult<Json<Outcome<FloorPlan>>> {
    Ok(Json(state.floor_plan_service().update(&id, req).await?))
}

async fn archive_floor_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FloorPlan>> {
    Ok(Json(state.floor_plan_service().soft_delete(&id).await?))
}

async fn delete_floor_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let detached = state.floor_plan_service().delete(&id).await?;
    Ok(Json(json!({ "deleted": true, "vehicles_detached": detached })))
}

// =============================================================================
// Customers & Vendors
// =============================================================================

async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewCustomer>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.party_service().create_customer(req).await?))
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.party_service().get_customer(&id).await?))
}

async fn customer_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PaymentSummary>> {
    Ok(Json(state.summary_service().customer_summary(&id).await?))
}

async fn create_vendor(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewVendor>,
) -> ApiResult<Json<Vendor>> {
    Ok(Json(state.party_service().create_vendor(req).await?))
}

async fn get_vendor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vendor>> {
    Ok(Json(state.party_service().get_vendor(&id).await?))
}
