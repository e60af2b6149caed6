//! # Repository Module
//!
//! Database repository implementations for LotLedger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  API service                                                           │
//! │       │                                                                 │
//! │       │  db.accounting().count_by_receipt("RC-2026-0007")              │
//! │       ▼                                                                 │
//! │  AccountingRepository                                                  │
//! │  ├── insert(&self, entry)                                              │
//! │  ├── count_by_receipt(&self, receipt)                                  │
//! │  └── latest_by_receipt(&self, receipt)                                 │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • Services stay orchestration-only                                    │
//! │  • In-memory SQLite makes every repository testable                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`vehicle::VehicleRepository`] - inventory and floor-plan attachment
//! - [`sale::SaleRepository`] - sales lifecycle and pricing details
//! - [`accounting::AccountingRepository`] - append-only installment ledger
//! - [`floorplan::FloorPlanRepository`] - floor plans and status writes
//! - [`customer::CustomerRepository`] / [`vendor::VendorRepository`]
//! - [`sequence::SequenceRepository`] - atomic business-ID counters

pub mod accounting;
pub mod customer;
pub mod floorplan;
pub mod sale;
pub mod sequence;
pub mod vehicle;
pub mod vendor;
