//! # Sequence Repository
//!
//! Atomic counter allocation for human-readable business IDs.
//!
//! ## The One Atomic Operation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Nothing else in LotLedger is atomic across writes, but THIS must be:  │
//! │                                                                         │
//! │  INSERT INTO counters (key, seq) VALUES (?, 1)                         │
//! │  ON CONFLICT (key) DO UPDATE SET seq = seq + 1                         │
//! │  RETURNING seq                                                         │
//! │                                                                         │
//! │  One statement: upsert-on-first-use + increment + read-back.           │
//! │  N concurrent callers on one namespace get N distinct consecutive      │
//! │  integers with no gaps or repeats.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Counter Self-Healing (stock IDs only)
//! Stock counters additionally reconcile against the highest sequence
//! suffix observed among existing stock IDs with the same prefix, taking
//! `max(counter, observed) + 1`. This heals counters that drifted behind
//! manually inserted or legacy-migrated vehicles.
//!
//! ## Failure Mode
//! Allocation happens inside the creating service call. If the store is
//! unavailable the whole creation fails - no ID is ever reserved without
//! its owning record.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use lotledger_core::ids;

/// Repository for atomic sequence allocation.
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    pool: SqlitePool,
}

impl SequenceRepository {
    /// Creates a new SequenceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SequenceRepository { pool }
    }

    /// Atomically increments and returns the counter for a namespace.
    ///
    /// Implicitly creates the counter at 1 on first use.
    pub async fn next(&self, namespace: &str) -> DbResult<i64> {
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO counters (key, seq) VALUES (?1, 1)
            ON CONFLICT (key) DO UPDATE SET seq = seq + 1
            RETURNING seq
            "#,
        )
        .bind(namespace)
        .fetch_one(&self.pool)
        .await?;

        debug!(namespace, seq, "Allocated sequence");
        Ok(seq)
    }

    /// Atomically increments the counter, first raising it to at least
    /// `floor` - still a single statement, so concurrent callers cannot
    /// observe the pre-heal value.
    pub async fn next_with_floor(&self, namespace: &str, floor: i64) -> DbResult<i64> {
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO counters (key, seq) VALUES (?1, ?2 + 1)
            ON CONFLICT (key) DO UPDATE SET seq = MAX(seq, ?2) + 1
            RETURNING seq
            "#,
        )
        .bind(namespace)
        .bind(floor)
        .fetch_one(&self.pool)
        .await?;

        debug!(namespace, seq, floor, "Allocated sequence (with floor)");
        Ok(seq)
    }

    /// Allocates the next stock-ID sequence for a prefix, reconciling the
    /// counter against existing vehicle rows first.
    ///
    /// ## Why
    /// Stock IDs can predate the counter table (legacy migrations, manual
    /// inserts). Taking `max(counter, highest observed suffix) + 1` keeps
    /// allocation collision-free even when the counter drifted.
    pub async fn next_stock_seq(&self, prefix: &str) -> DbResult<i64> {
        let pattern = format!("{prefix}-%");
        let existing: Vec<String> =
            sqlx::query_scalar("SELECT stock_id FROM vehicles WHERE stock_id LIKE ?1")
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await?;

        let observed_max = existing
            .iter()
            .filter_map(|id| ids::stock_seq_suffix(prefix, id))
            .max()
            .unwrap_or(0);

        self.next_with_floor(&ids::stock_namespace(prefix), observed_max)
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
