//! # lotledger-db: Database Layer for LotLedger
//!
//! All database operations live here: the connection pool, embedded
//! migrations, and one repository per entity.
//!
//! ## Layout
//! - [`pool`] - `DbConfig` / `Database` handle with repository accessors
//! - [`migrations`] - embedded SQL migrations
//! - [`repository`] - vehicles, sales, accounting, floor plans, customers,
//!   vendors, and the atomic sequence counters
//! - [`error`] - `DbError` / `DbResult`
//!
//! ## Soft References
//! The schema declares NO foreign keys between business entities. A sale may
//! reference a vehicle that is gone; an installment entry references its
//! sale's receipt by value. Repositories return `Option`s and callers treat
//! a missing linked record as a normal case.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
