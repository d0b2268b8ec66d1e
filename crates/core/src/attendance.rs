//! Attendance statuses, work-hour derivation, and the attendance rate.
//!
//! The rate counts a half day as half of a present day:
//!
//! ```text
//! rate = (present + 0.5 * half_day) / total * 100
//! ```

use chrono::NaiveTime;
use serde::Serialize;
use validator::ValidationError;

use crate::stats::{round2, zero_filled, StatusCounts};
use crate::validation::one_of;

pub const STATUS_PRESENT: &str = "present";
pub const STATUS_ABSENT: &str = "absent";
pub const STATUS_HALF_DAY: &str = "half_day";
pub const STATUS_LEAVE: &str = "leave";

pub const VALID_STATUSES: &[&str] = &[STATUS_PRESENT, STATUS_ABSENT, STATUS_HALF_DAY, STATUS_LEAVE];

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_STATUSES)
}

/// Hours between check-in and check-out, rounded to two decimals.
///
/// Returns `None` unless both times are present and check-out is after
/// check-in.
pub fn work_hours(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> Option<f64> {
    let (start, end) = (check_in?, check_out?);
    if end <= start {
        return None;
    }
    let minutes = (end - start).num_minutes() as f64;
    Some(round2(minutes / 60.0))
}

/// Attendance rate as a percentage with two decimals; `0.0` when `total` is 0.
pub fn attendance_rate(present: i64, half_day: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let effective = present as f64 + half_day as f64 * 0.5;
    round2(effective / total as f64 * 100.0)
}

/// Aggregate attendance for an employee (or everyone) over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub counts: StatusCounts,
    pub total: i64,
    pub attendance_rate: f64,
}

impl AttendanceSummary {
    /// Build a summary from raw `(status, count)` rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let counts = zero_filled(VALID_STATUSES, rows);
        let total = crate::stats::total(&counts);
        let present = counts.get(STATUS_PRESENT).copied().unwrap_or(0);
        let half_day = counts.get(STATUS_HALF_DAY).copied().unwrap_or(0);
        Self {
            attendance_rate: attendance_rate(present, half_day, total),
            counts,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn eight_present_two_half_days_is_ninety_percent() {
        let summary = AttendanceSummary::from_rows(vec![
            (STATUS_PRESENT.to_string(), 8),
            (STATUS_HALF_DAY.to_string(), 2),
        ]);
        assert_eq!(summary.total, 10);
        assert_eq!(summary.attendance_rate, 90.00);
        assert_eq!(summary.counts[STATUS_ABSENT], 0);
        assert_eq!(summary.counts[STATUS_LEAVE], 0);
    }

    #[test]
    fn empty_range_has_zero_rate_and_all_statuses() {
        let summary = AttendanceSummary::from_rows(Vec::new());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.attendance_rate, 0.0);
        assert_eq!(summary.counts.len(), VALID_STATUSES.len());
    }

    #[test]
    fn work_hours_from_times() {
        assert_eq!(work_hours(t(9, 0), t(17, 30)), Some(8.5));
        assert_eq!(work_hours(t(9, 0), t(9, 20)), Some(0.33));
    }

    #[test]
    fn work_hours_requires_both_ordered_times() {
        assert_eq!(work_hours(t(9, 0), None), None);
        assert_eq!(work_hours(None, t(17, 0)), None);
        assert_eq!(work_hours(t(17, 0), t(9, 0)), None);
    }
}
