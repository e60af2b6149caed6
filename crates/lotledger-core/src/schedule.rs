//! # Installment Due-Date Projection
//!
//! Computes the due date of the Nth installment for a financed sale.
//!
//! ## How Projection Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Due-Date Projection                                  │
//! │                                                                         │
//! │  Installment #1                                                         │
//! │    explicit payload date → schedule first date → sale next due → today  │
//! │    (first non-null wins)                                                │
//! │                                                                         │
//! │  Installment #N (N > 1)                                                 │
//! │    prev_due = previous entry due → sale next due → schedule first date  │
//! │    (first non-null wins; nothing resolvable → today)                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │    weekly        prev + 7 days                                          │
//! │    bi-weekly     prev + 14 days                                         │
//! │    semi-monthly  alternate between the two anchor days-of-month         │
//! │                  (anchors unknown → prev + 15 days)                     │
//! │    monthly       prev + 1 calendar month (day clamped at month end)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Calendar Edge Cases
//! - monthly from 2024-01-31 lands on 2024-02-29 (leap-year clamp)
//! - semi-monthly "same month" candidates that would not move time forward
//!   roll over to the next month
//!
//! Projection never fails: when no anchor of any kind is resolvable the due
//! date defaults to `today`, so installment creation is never blocked.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

// =============================================================================
// Schedule Kind
// =============================================================================

/// Payment schedule cadence.
///
/// Parsed case-insensitively from free-form client strings; anything
/// unrecognized falls back to [`ScheduleKind::Monthly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleKind {
    /// Every 7 calendar days.
    Weekly,
    /// Every 14 calendar days.
    BiWeekly,
    /// Twice a month, alternating between two anchor days-of-month.
    SemiMonthly,
    /// Every calendar month, day-of-month preserved (clamped at month end).
    Monthly,
}

impl Default for ScheduleKind {
    fn default() -> Self {
        ScheduleKind::Monthly
    }
}

impl ScheduleKind {
    /// Parses a schedule string as clients send it.
    ///
    /// Matching is case-insensitive and tolerant of the hyphenated and
    /// squashed spellings ("bi-weekly" / "biweekly"). Unrecognized strings
    /// map to Monthly, matching the system's default cadence.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" => ScheduleKind::Weekly,
            "bi-weekly" | "biweekly" => ScheduleKind::BiWeekly,
            "semi-monthly" | "semimonthly" => ScheduleKind::SemiMonthly,
            _ => ScheduleKind::Monthly,
        }
    }
}

// =============================================================================
// Anchors
// =============================================================================

/// The date anchors a schedule carries.
///
/// `second` is meaningful only for semi-monthly schedules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleAnchors {
    pub first: Option<NaiveDate>,
    pub second: Option<NaiveDate>,
}

// =============================================================================
// Projection
// =============================================================================

/// Computes the due date for the installment being recorded.
///
/// ## Arguments
/// * `installment_number` - 1-based position in the schedule
/// * `kind` - schedule cadence
/// * `anchors` - the schedule's first/second payment dates
/// * `explicit_due` - due date supplied in the request payload, if any
/// * `sale_next_due` - the sale's rolling `next_payment_due` pointer
/// * `prev_entry_due` - due date of the previously recorded entry, if any
/// * `today` - "now" at date precision, passed in so this stays pure
///
/// ## Guarantee
/// Always returns a date - unresolvable anchors degrade to `today`.
pub fn project_due_date(
    installment_number: u32,
    kind: ScheduleKind,
    anchors: &ScheduleAnchors,
    explicit_due: Option<NaiveDate>,
    sale_next_due: Option<NaiveDate>,
    prev_entry_due: Option<NaiveDate>,
    today: NaiveDate,
) -> NaiveDate {
    if installment_number <= 1 {
        return explicit_due
            .or(anchors.first)
            .or(sale_next_due)
            .unwrap_or(today);
    }

    let prev_due = match prev_entry_due.or(sale_next_due).or(anchors.first) {
        Some(date) => date,
        None => return today,
    };

    advance(prev_due, kind, anchors)
}

/// Advances one cadence step from `prev_due`.
fn advance(prev_due: NaiveDate, kind: ScheduleKind, anchors: &ScheduleAnchors) -> NaiveDate {
    match kind {
        ScheduleKind::Weekly => add_days(prev_due, 7),
        ScheduleKind::BiWeekly => add_days(prev_due, 14),
        ScheduleKind::SemiMonthly => match (anchors.first, anchors.second) {
            (Some(first), Some(second)) => advance_semi_monthly(prev_due, first, second),
            // Anchors unknown: approximate half a month.
            _ => add_days(prev_due, 15),
        },
        ScheduleKind::Monthly => prev_due
            .checked_add_months(Months::new(1))
            .unwrap_or(prev_due),
    }
}

/// Semi-monthly alternation between the two anchor days-of-month.
///
/// If `prev_due` sits on the first anchor's day, the next due date is the
/// second anchor's day in the same month - unless that would not move time
/// forward, in which case it rolls to the next month. From any other day
/// (including the second anchor's), the next due date is the first anchor's
/// day in the following month.
fn advance_semi_monthly(prev_due: NaiveDate, first: NaiveDate, second: NaiveDate) -> NaiveDate {
    let first_day = first.day();
    let second_day = second.day();

    if prev_due.day() == first_day {
        let same_month = clamp_day(prev_due.year(), prev_due.month(), second_day);
        if same_month > prev_due {
            same_month
        } else {
            day_in_next_month(prev_due, second_day)
        }
    } else {
        day_in_next_month(prev_due, first_day)
    }
}

/// The given day-of-month in the month after `from`, clamped to month end.
fn day_in_next_month(from: NaiveDate, day: u32) -> NaiveDate {
    let next = first_of_month(from)
        .checked_add_months(Months::new(1))
        .unwrap_or(from);
    clamp_day(next.year(), next.month(), day)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

/// Builds a date from components, walking the day down to the last valid
/// day of the month when it overflows (e.g. day 31 in February).
fn clamp_day(year: i32, month: u32, day: u32) -> NaiveDate {
    (1..=day.max(1))
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ScheduleKind::parse("Weekly"), ScheduleKind::Weekly);
        assert_eq!(ScheduleKind::parse("BI-WEEKLY"), ScheduleKind::BiWeekly);
        assert_eq!(ScheduleKind::parse("biweekly"), ScheduleKind::BiWeekly);
        assert_eq!(ScheduleKind::parse("Semi-Monthly"), ScheduleKind::SemiMonthly);
        assert_eq!(ScheduleKind::parse("semimonthly"), ScheduleKind::SemiMonthly);
        assert_eq!(ScheduleKind::parse("monthly"), ScheduleKind::Monthly);
    }

    #[test]
    fn test_parse_unrecognized_defaults_to_monthly() {
        assert_eq!(ScheduleKind::parse("fortnightly"), ScheduleKind::Monthly);
        assert_eq!(ScheduleKind::parse(""), ScheduleKind::Monthly);
    }

    #[test]
    fn test_first_installment_priority_chain() {
        let today = d(2026, 8, 23);
        let anchors = ScheduleAnchors {
            first: Some(d(2026, 9, 1)),
            second: None,
        };

        // Explicit payload date wins over everything.
        let due = project_due_date(
            1,
            ScheduleKind::Monthly,
            &anchors,
            Some(d(2026, 9, 15)),
            Some(d(2026, 9, 10)),
            None,
            today,
        );
        assert_eq!(due, d(2026, 9, 15));

        // Then the schedule's first payment date.
        let due = project_due_date(
            1,
            ScheduleKind::Monthly,
            &anchors,
            None,
            Some(d(2026, 9, 10)),
            None,
            today,
        );
        assert_eq!(due, d(2026, 9, 1));

        // Then the sale's next-due pointer.
        let due = project_due_date(
            1,
            ScheduleKind::Monthly,
            &ScheduleAnchors::default(),
            None,
            Some(d(2026, 9, 10)),
            None,
            today,
        );
        assert_eq!(due, d(2026, 9, 10));

        // Nothing resolvable: today.
        let due = project_due_date(
            1,
            ScheduleKind::Monthly,
            &ScheduleAnchors::default(),
            None,
            None,
            None,
            today,
        );
        assert_eq!(due, today);
    }

    #[test]
    fn test_weekly_advances_seven_days() {
        let due = project_due_date(
            2,
            ScheduleKind::Weekly,
            &ScheduleAnchors::default(),
            None,
            None,
            Some(d(2024, 3, 1)),
            d(2024, 3, 5),
        );
        assert_eq!(due, d(2024, 3, 8));
    }

    #[test]
    fn test_biweekly_advances_fourteen_days() {
        let due = project_due_date(
            3,
            ScheduleKind::BiWeekly,
            &ScheduleAnchors::default(),
            None,
            None,
            Some(d(2024, 3, 1)),
            d(2024, 3, 5),
        );
        assert_eq!(due, d(2024, 3, 15));
    }

    #[test]
    fn test_monthly_clamps_at_month_end() {
        // 2024 is a leap year: Jan 31 → Feb 29.
        let due = project_due_date(
            2,
            ScheduleKind::Monthly,
            &ScheduleAnchors::default(),
            None,
            None,
            Some(d(2024, 1, 31)),
            d(2024, 2, 1),
        );
        assert_eq!(due, d(2024, 2, 29));

        // Non-leap year: Jan 31 → Feb 28.
        let due = advance(d(2023, 1, 31), ScheduleKind::Monthly, &ScheduleAnchors::default());
        assert_eq!(due, d(2023, 2, 28));
    }

    #[test]
    fn test_semi_monthly_alternation() {
        let anchors = ScheduleAnchors {
            first: Some(d(2024, 1, 5)),
            second: Some(d(2024, 1, 20)),
        };

        // On the first anchor's day → second anchor's day, same month.
        let due = advance(d(2024, 2, 5), ScheduleKind::SemiMonthly, &anchors);
        assert_eq!(due, d(2024, 2, 20));

        // On the second anchor's day → first anchor's day, next month.
        let due = advance(d(2024, 2, 20), ScheduleKind::SemiMonthly, &anchors);
        assert_eq!(due, d(2024, 3, 5));
    }

    #[test]
    fn test_semi_monthly_same_month_candidate_must_move_forward() {
        // Anchors where the second day-of-month is BEFORE the first: the
        // same-month candidate is not after prev, so it rolls over.
        let anchors = ScheduleAnchors {
            first: Some(d(2024, 1, 20)),
            second: Some(d(2024, 1, 5)),
        };
        let due = advance(d(2024, 2, 20), ScheduleKind::SemiMonthly, &anchors);
        assert_eq!(due, d(2024, 3, 5));
    }

    #[test]
    fn test_semi_monthly_without_anchors_falls_back_fifteen_days() {
        let due = advance(
            d(2024, 3, 1),
            ScheduleKind::SemiMonthly,
            &ScheduleAnchors::default(),
        );
        assert_eq!(due, d(2024, 3, 16));
    }

    #[test]
    fn test_later_installment_with_no_anchors_defaults_to_today() {
        let today = d(2026, 8, 23);
        let due = project_due_date(
            4,
            ScheduleKind::Weekly,
            &ScheduleAnchors::default(),
            None,
            None,
            None,
            today,
        );
        assert_eq!(due, today);
    }

    #[test]
    fn test_prev_due_resolution_chain() {
        let anchors = ScheduleAnchors {
            first: Some(d(2024, 1, 1)),
            second: None,
        };

        // Previous entry wins over the sale pointer and the anchor.
        let due = project_due_date(
            2,
            ScheduleKind::Weekly,
            &anchors,
            None,
            Some(d(2024, 2, 1)),
            Some(d(2024, 3, 1)),
            d(2024, 3, 5),
        );
        assert_eq!(due, d(2024, 3, 8));

        // No previous entry: sale pointer wins over the anchor.
        let due = project_due_date(
            2,
            ScheduleKind::Weekly,
            &anchors,
            None,
            Some(d(2024, 2, 1)),
            None,
            d(2024, 3, 5),
        );
        assert_eq!(due, d(2024, 2, 8));

        // Only the anchor remains.
        let due = project_due_date(
            2,
            ScheduleKind::Weekly,
            &anchors,
            None,
            None,
            None,
            d(2024, 3, 5),
        );
        assert_eq!(due, d(2024, 1, 8));
    }

    #[test]
    fn test_semi_monthly_anchor_day_clamped_in_short_month() {
        let anchors = ScheduleAnchors {
            first: Some(d(2024, 1, 15)),
            second: Some(d(2024, 1, 31)),
        };
        // Feb 15 → second anchor day 31 clamps to Feb 29 (leap year).
        let due = advance(d(2024, 2, 15), ScheduleKind::SemiMonthly, &anchors);
        assert_eq!(due, d(2024, 2, 29));
    }
}
