//! # Business ID Formatting
//!
//! Pure formatting of human-readable business identifiers from counter
//! values. The atomic allocation itself lives in the db layer's sequence
//! repository; this module only turns an integer into a domain ID.
//!
//! ## ID Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Entity     Namespace key        Format             Example             │
//! │  ─────────  ──────────────────   ────────────────   ──────────────────  │
//! │  Vehicle    stock:AU-SUV         {prefix}-{0000}    AU-SUV-0042         │
//! │  Sale       receipt:2026         RC-{year}-{0000}   RC-2026-0007        │
//! │  Vendor     vendor:AU            {code}-{0000}      AU-0003             │
//! │  Customer   customer             1000 + n           1043                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Customer numbers are unpadded running numbers on top of a base offset;
//! everything else is zero-padded to four digits.

use crate::{CUSTOMER_NUMBER_BASE, SEQUENCE_PAD_WIDTH};

// =============================================================================
// Namespaces
// =============================================================================

/// Counter namespace for a stock-ID prefix, e.g. `stock:AU-SUV`.
pub fn stock_namespace(prefix: &str) -> String {
    format!("stock:{prefix}")
}

/// Counter namespace for receipts, yearly-scoped, e.g. `receipt:2026`.
pub fn receipt_namespace(year: i32) -> String {
    format!("receipt:{year}")
}

/// Counter namespace for vendor IDs under a category code.
pub fn vendor_namespace(category_code: &str) -> String {
    format!("vendor:{category_code}")
}

/// Counter namespace for customer numbers.
pub const CUSTOMER_NAMESPACE: &str = "customer";

// =============================================================================
// Formatters
// =============================================================================

/// Stock ID: `{vendorCategory}-{vehicleType}-{seq:04}`.
///
/// The prefix already carries both category and vehicle-type codes
/// (e.g. `AU-SUV`), so the formatter just appends the padded sequence.
pub fn stock_id(prefix: &str, seq: i64) -> String {
    format!("{prefix}-{seq:0width$}", width = SEQUENCE_PAD_WIDTH)
}

/// Stock-ID prefix from vendor category and vehicle type codes.
pub fn stock_prefix(vendor_category: &str, vehicle_type: &str) -> String {
    format!("{vendor_category}-{vehicle_type}")
}

/// Receipt ID: `RC-{year}-{seq:04}`.
pub fn receipt_id(year: i32, seq: i64) -> String {
    format!("RC-{year}-{seq:0width$}", width = SEQUENCE_PAD_WIDTH)
}

/// Vendor ID: `{categoryCode}-{seq:04}`.
pub fn vendor_id(category_code: &str, seq: i64) -> String {
    format!("{category_code}-{seq:0width$}", width = SEQUENCE_PAD_WIDTH)
}

/// Customer number: unpadded `1000 + seq`.
pub fn customer_number(seq: i64) -> String {
    (CUSTOMER_NUMBER_BASE + seq).to_string()
}

// =============================================================================
// Parsing (for counter self-healing)
// =============================================================================

/// Extracts the numeric sequence suffix from a stock ID with the given
/// prefix, e.g. `("AU-SUV", "AU-SUV-0042") -> Some(42)`.
///
/// Used by the stock sequence's self-healing reconciliation: the counter is
/// bumped to at least the highest suffix observed among existing stock IDs,
/// so manually inserted or migrated rows can never cause a collision.
pub fn stock_seq_suffix(prefix: &str, stock_id: &str) -> Option<i64> {
    let rest = stock_id.strip_prefix(prefix)?.strip_prefix('-')?;
    rest.parse::<i64>().ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
