//! Asset vocabulary and assignment reconciliation.
//!
//! `assigned_at` is present exactly when `assigned_to` is present. The
//! status follows the assignment: handing an available asset to someone
//! makes it `assigned`, taking it back makes it `available` again. Assets in
//! maintenance or retired keep their status.

use validator::ValidationError;

use crate::types::{DbId, Timestamp};
use crate::validation::one_of;

pub const CATEGORY_LAPTOP: &str = "laptop";
pub const CATEGORY_DESKTOP: &str = "desktop";
pub const CATEGORY_PHONE: &str = "phone";
pub const CATEGORY_MONITOR: &str = "monitor";
pub const CATEGORY_FURNITURE: &str = "furniture";
pub const CATEGORY_VEHICLE: &str = "vehicle";
pub const CATEGORY_OTHER: &str = "other";

pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_LAPTOP,
    CATEGORY_DESKTOP,
    CATEGORY_PHONE,
    CATEGORY_MONITOR,
    CATEGORY_FURNITURE,
    CATEGORY_VEHICLE,
    CATEGORY_OTHER,
];

pub const STATUS_AVAILABLE: &str = "available";
pub const STATUS_ASSIGNED: &str = "assigned";
pub const STATUS_MAINTENANCE: &str = "maintenance";
pub const STATUS_RETIRED: &str = "retired";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_AVAILABLE,
    STATUS_ASSIGNED,
    STATUS_MAINTENANCE,
    STATUS_RETIRED,
];

pub fn validate_category(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_CATEGORIES)
}

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_STATUSES)
}

/// Assignment fields after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub assigned_to: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub status: String,
}

/// Apply the assignment rules to the values about to be saved.
pub fn reconcile_assignment(
    assigned_to: Option<DbId>,
    assigned_at: Option<Timestamp>,
    status: &str,
    now: Timestamp,
) -> Assignment {
    match assigned_to {
        Some(employee_id) => Assignment {
            assigned_to: Some(employee_id),
            assigned_at: Some(assigned_at.unwrap_or(now)),
            status: if status == STATUS_AVAILABLE {
                STATUS_ASSIGNED.to_string()
            } else {
                status.to_string()
            },
        },
        None => Assignment {
            assigned_to: None,
            assigned_at: None,
            status: if status == STATUS_ASSIGNED {
                STATUS_AVAILABLE.to_string()
            } else {
                status.to_string()
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap()
    }

    #[test]
    fn assigning_without_timestamp_fills_it() {
        let a = reconcile_assignment(Some(3), None, STATUS_AVAILABLE, now());
        assert_eq!(a.assigned_at, Some(now()));
        assert_eq!(a.status, STATUS_ASSIGNED);
    }

    #[test]
    fn explicit_timestamp_is_kept() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let a = reconcile_assignment(Some(3), Some(earlier), STATUS_ASSIGNED, now());
        assert_eq!(a.assigned_at, Some(earlier));
    }

    #[test]
    fn clearing_assignee_clears_timestamp() {
        let a = reconcile_assignment(None, Some(now()), STATUS_ASSIGNED, now());
        assert_eq!(a.assigned_to, None);
        assert_eq!(a.assigned_at, None);
        assert_eq!(a.status, STATUS_AVAILABLE);
    }

    #[test]
    fn maintenance_status_is_not_overridden() {
        let a = reconcile_assignment(None, None, STATUS_MAINTENANCE, now());
        assert_eq!(a.status, STATUS_MAINTENANCE);
        let a = reconcile_assignment(Some(1), None, STATUS_MAINTENANCE, now());
        assert_eq!(a.status, STATUS_MAINTENANCE);
    }
}
