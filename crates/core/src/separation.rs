//! Separation (offboarding) request vocabulary and transitions.
//!
//! A request is approved or rejected by HR; approved requests are later
//! marked `processed` once the exit formalities are complete.

use validator::ValidationError;

use crate::transition::TransitionTable;
use crate::validation::one_of;

pub const TYPE_RESIGNATION: &str = "resignation";
pub const TYPE_TERMINATION: &str = "termination";
pub const TYPE_RETIREMENT: &str = "retirement";
pub const TYPE_CONTRACT_END: &str = "contract_end";

pub const VALID_TYPES: &[&str] = &[
    TYPE_RESIGNATION,
    TYPE_TERMINATION,
    TYPE_RETIREMENT,
    TYPE_CONTRACT_END,
];

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";
pub const STATUS_PROCESSED: &str = "processed";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_APPROVED,
    STATUS_REJECTED,
    STATUS_PROCESSED,
];

pub const TRANSITIONS: TransitionTable = &[
    (STATUS_PENDING, &[STATUS_APPROVED, STATUS_REJECTED]),
    (STATUS_APPROVED, &[STATUS_PROCESSED]),
];

pub fn validate_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_TYPES)
}
