//! # Service Layer
//!
//! Orchestration between the HTTP boundary, the pure core logic, and the
//! repositories.
//!
//! ## Service Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Service Layer                                     │
//! │                                                                         │
//! │  vehicle_service     Vehicle creation (stock-ID minting), attachments   │
//! │  sales_service       Sale lifecycle (stub → details → delete)           │
//! │  accounting_service  Installment recording + due-date projection        │
//! │  floorplan_service   Floor-plan CRUD + the status reconciler            │
//! │  party_service       Customers and vendors                              │
//! │  summary_service     Read-side aggregation views                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Policy
//! Services validate and enforce business rules BEFORE the primary write,
//! and treat derived side effects (status write-backs, reconciliation)
//! best-effort AFTER it, returning failures as [`lotledger_core::Warning`]s.

pub mod accounting_service;
pub mod floorplan_service;
pub mod party_service;
pub mod sales_service;
pub mod summary_service;
pub mod vehicle_service;
