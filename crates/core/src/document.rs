//! Employee document types.

use validator::ValidationError;

use crate::validation::one_of;

pub const TYPE_CONTRACT: &str = "contract";
pub const TYPE_IDENTIFICATION: &str = "identification";
pub const TYPE_CERTIFICATE: &str = "certificate";
pub const TYPE_RESUME: &str = "resume";
pub const TYPE_POLICY: &str = "policy";
pub const TYPE_OTHER: &str = "other";

pub const VALID_TYPES: &[&str] = &[
    TYPE_CONTRACT,
    TYPE_IDENTIFICATION,
    TYPE_CERTIFICATE,
    TYPE_RESUME,
    TYPE_POLICY,
    TYPE_OTHER,
];

pub fn validate_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_TYPES)
}
