//! # Vehicle Sales-Status State Machine
//!
//! Derives a vehicle's sales status from sale lifecycle events.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Available ──(sale created)──► Pending ──(details added)──┬─► Sold    │
//! │       ▲                                                     │           │
//! │       │                                  is_reserved=true   └─► Reserved│
//! │       │                                                                 │
//! │       └───────────────(sale deleted)────────── Sold/Reserved/Pending   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transitions depend only on the event, never on the current status: a
//! newly created sale puts the vehicle in Pending even if some earlier sale
//! left it in another state. Only the vehicle referenced by the specific
//! sale is ever touched.

use crate::types::SalesStatus;

// =============================================================================
// Events
// =============================================================================

/// A sale lifecycle event affecting the linked vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleLifecycleEvent {
    /// A sales record was created with this vehicle linked.
    Created,
    /// Pricing/payment details were added to the sale.
    DetailsAdded { reserved: bool },
    /// The sales record was deleted.
    Deleted,
}

// =============================================================================
// Transition
// =============================================================================

/// The sales status a vehicle takes after a sale lifecycle event.
pub fn status_after(event: SaleLifecycleEvent) -> SalesStatus {
    match event {
        SaleLifecycleEvent::Created => SalesStatus::Pending,
        SaleLifecycleEvent::DetailsAdded { reserved: true } => SalesStatus::Reserved,
        SaleLifecycleEvent::DetailsAdded { reserved: false } => SalesStatus::Sold,
        SaleLifecycleEvent::Deleted => SalesStatus::Available,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
