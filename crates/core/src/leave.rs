//! Leave request vocabulary, day counting, and transitions.

use chrono::NaiveDate;
use validator::ValidationError;

use crate::transition::TransitionTable;
use crate::validation::one_of;

pub const TYPE_ANNUAL: &str = "annual";
pub const TYPE_SICK: &str = "sick";
pub const TYPE_PERSONAL: &str = "personal";
pub const TYPE_MATERNITY: &str = "maternity";
pub const TYPE_PATERNITY: &str = "paternity";
pub const TYPE_UNPAID: &str = "unpaid";

pub const VALID_TYPES: &[&str] = &[
    TYPE_ANNUAL,
    TYPE_SICK,
    TYPE_PERSONAL,
    TYPE_MATERNITY,
    TYPE_PATERNITY,
    TYPE_UNPAID,
];

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

pub const TRANSITIONS: TransitionTable = &[(STATUS_PENDING, &[STATUS_APPROVED, STATUS_REJECTED])];

pub fn validate_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_TYPES)
}

/// Number of calendar days covered by an inclusive date range; 0 if inverted.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> i32 {
    let days = (end - start).num_days() + 1;
    i32::try_from(days.max(0)).unwrap_or(i32::MAX)
}
