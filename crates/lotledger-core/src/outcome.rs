//! # Outcome: Primary Result + Warnings
//!
//! Mutations in LotLedger follow an at-least-the-primary-record-succeeds
//! policy: once the primary write lands, failures in derived side effects
//! (floor-plan reconciliation, vehicle status write-back, next-due-date
//! propagation) must not roll anything back or fail the request.
//!
//! Instead of silently logging those failures, services return them as
//! structured warnings alongside the primary value, so callers and tests can
//! assert on partial failure without log inspection.

use serde::{Deserialize, Serialize};

// =============================================================================
// Warning
// =============================================================================

/// A side effect that failed after the primary write succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Which side effect failed, e.g. `floor_plan_reconcile`.
    pub side_effect: String,
    /// Human-readable failure detail.
    pub detail: String,
}

impl Warning {
    pub fn new(side_effect: impl Into<String>, detail: impl Into<String>) -> Self {
        Warning {
            side_effect: side_effect.into(),
            detail: detail.into(),
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// A successful primary operation plus any side-effect warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// The primary result. Always present - a failed primary write is an
    /// error, never an Outcome.
    pub value: T,
    /// Side effects that failed best-effort. Empty on a fully clean run.
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    /// An outcome with no warnings.
    pub fn clean(value: T) -> Self {
        Outcome {
            value,
            warnings: Vec::new(),
        }
    }

    /// Records a failed side effect.
    pub fn warn(&mut self, side_effect: impl Into<String>, detail: impl Into<String>) {
        self.warnings.push(Warning::new(side_effect, detail));
    }

    /// Whether every side effect succeeded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_outcome() {
        let outcome = Outcome::clean(42);
        assert!(outcome.is_clean());
        assert_eq!(outcome.value, 42);
    }

    #[test]
    fn test_warnings_accumulate() {
        let mut outcome = Outcome::clean("entry");
        outcome.warn("floor_plan_reconcile", "plan row missing");
        outcome.warn("sale_due_date_update", "sale deleted concurrently");
        assert!(!outcome.is_clean());
        assert_eq!(outcome.warnings.len(), 2);
        assert_eq!(outcome.warnings[0].side_effect, "floor_plan_reconcile");
    }
}
