//! Employee status vocabulary.

use validator::ValidationError;

use crate::validation::one_of;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_ON_LEAVE: &str = "on_leave";
pub const STATUS_SUSPENDED: &str = "suspended";
pub const STATUS_TERMINATED: &str = "terminated";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_ACTIVE,
    STATUS_ON_LEAVE,
    STATUS_SUSPENDED,
    STATUS_TERMINATED,
];

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_STATUSES)
}

/// Display name used in populated projections.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_validation() {
        assert!(validate_status("active").is_ok());
        assert!(validate_status("retired").is_err());
    }

    #[test]
    fn full_name_joins_parts() {
        assert_eq!(full_name("Ada", "Lovelace"), "Ada Lovelace");
        assert_eq!(full_name("Ada", ""), "Ada");
    }
}
