//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role`.

use validator::ValidationError;

use crate::validation::one_of;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_HR: &str = "hr";
pub const ROLE_EMPLOYEE: &str = "employee";

pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_HR, ROLE_EMPLOYEE];

/// Roles allowed to manage HR records (create/update/delete, transitions).
pub const HR_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_HR];

pub fn validate_role(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_ROLES)
}

/// Returns `true` when `role` appears in the `allowed` list.
pub fn role_allowed(role: &str, allowed: &[&str]) -> bool {
    allowed.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hr_roles_include_admin() {
        assert!(role_allowed(ROLE_ADMIN, HR_ROLES));
        assert!(role_allowed(ROLE_HR, HR_ROLES));
        assert!(!role_allowed(ROLE_EMPLOYEE, HR_ROLES));
    }

    #[test]
    fn unknown_role_is_never_allowed() {
        assert!(!role_allowed("superuser", VALID_ROLES));
        assert!(validate_role("superuser").is_err());
        assert!(validate_role(ROLE_HR).is_ok());
    }
}
