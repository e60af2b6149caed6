//! # lotledger-core: Pure Business Logic for LotLedger
//!
//! This crate is the **heart** of LotLedger. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LotLedger Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    create sale ──► add details ──► post installment ──► views  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lotledger-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ schedule  │  │ floorplan │  │  status   │  │   │
//! │  │   │  Vehicle  │  │  due-date │  │  Active/  │  │ Available │  │   │
//! │  │   │   Sale    │  │ projector │  │  Inactive │  │ →Pending  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 lotledger-db (Database Layer)                   │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Vehicle, Sale, InstallmentEntry, FloorPlan, ...)
//! - [`schedule`] - Installment due-date projection for all schedule kinds
//! - [`floorplan`] - Floor-plan Active/Inactive derivation
//! - [`status`] - Vehicle sales-status state machine
//! - [`summary`] - Read-side aggregation math (remaining payments, etc.)
//! - [`ids`] - Human-readable business ID formatting
//! - [`validation`] - Business rule validation
//! - [`outcome`] - Primary result + warnings for best-effort side effects
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every derived status is `f(inputs) -> Status`,
//!    so recomputing is always safe and idempotent
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Soft References**: entities relate by stored ID values; every
//!    consumer treats a missing linked record as a normal case
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod floorplan;
pub mod ids;
pub mod outcome;
pub mod schedule;
pub mod status;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use lotledger_core::Sale` instead of
// `use lotledger_core::types::Sale`

pub use error::{CoreError, ValidationError};
pub use outcome::{Outcome, Warning};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Base offset for customer numbers.
///
/// ## Why a constant?
/// Customer-facing numbers start at 1001 (counter value 1 + offset 1000)
/// so they never collide with legacy paper records numbered below 1000.
pub const CUSTOMER_NUMBER_BASE: i64 = 1000;

/// Width of the zero-padded sequence suffix in stock/vendor/receipt IDs.
pub const SEQUENCE_PAD_WIDTH: usize = 4;
