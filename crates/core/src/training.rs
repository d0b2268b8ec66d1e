//! Training sessions and employee training requests.

use validator::ValidationError;

use crate::transition::TransitionTable;
use crate::validation::one_of;

// ---------------------------------------------------------------------------
// Training sessions
// ---------------------------------------------------------------------------

pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_ONGOING: &str = "ongoing";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_SCHEDULED,
    STATUS_ONGOING,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_STATUSES)
}

// ---------------------------------------------------------------------------
// Training requests
// ---------------------------------------------------------------------------

pub const REQUEST_PENDING: &str = "pending";
pub const REQUEST_APPROVED: &str = "approved";
pub const REQUEST_REJECTED: &str = "rejected";
pub const REQUEST_COMPLETED: &str = "completed";

pub const VALID_REQUEST_STATUSES: &[&str] = &[
    REQUEST_PENDING,
    REQUEST_APPROVED,
    REQUEST_REJECTED,
    REQUEST_COMPLETED,
];

pub const REQUEST_TRANSITIONS: TransitionTable = &[
    (REQUEST_PENDING, &[REQUEST_APPROVED, REQUEST_REJECTED]),
    (REQUEST_APPROVED, &[REQUEST_COMPLETED]),
];
