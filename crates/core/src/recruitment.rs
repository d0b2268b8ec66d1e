//! Recruitment: job postings and the candidate pipeline.

use validator::ValidationError;

use crate::transition::TransitionTable;
use crate::validation::one_of;

pub const EMPLOYMENT_FULL_TIME: &str = "full_time";
pub const EMPLOYMENT_PART_TIME: &str = "part_time";
pub const EMPLOYMENT_CONTRACT: &str = "contract";
pub const EMPLOYMENT_INTERNSHIP: &str = "internship";

pub const VALID_EMPLOYMENT_TYPES: &[&str] = &[
    EMPLOYMENT_FULL_TIME,
    EMPLOYMENT_PART_TIME,
    EMPLOYMENT_CONTRACT,
    EMPLOYMENT_INTERNSHIP,
];

pub const POSTING_OPEN: &str = "open";
pub const POSTING_ON_HOLD: &str = "on_hold";
pub const POSTING_CLOSED: &str = "closed";

pub const VALID_POSTING_STATUSES: &[&str] = &[POSTING_OPEN, POSTING_ON_HOLD, POSTING_CLOSED];

pub const CANDIDATE_APPLIED: &str = "applied";
pub const CANDIDATE_SCREENING: &str = "screening";
pub const CANDIDATE_INTERVIEW: &str = "interview";
pub const CANDIDATE_OFFERED: &str = "offered";
pub const CANDIDATE_HIRED: &str = "hired";
pub const CANDIDATE_REJECTED: &str = "rejected";

pub const VALID_CANDIDATE_STATUSES: &[&str] = &[
    CANDIDATE_APPLIED,
    CANDIDATE_SCREENING,
    CANDIDATE_INTERVIEW,
    CANDIDATE_OFFERED,
    CANDIDATE_HIRED,
    CANDIDATE_REJECTED,
];

/// Candidates advance one stage at a time and may be rejected at any
/// non-terminal stage.
pub const CANDIDATE_TRANSITIONS: TransitionTable = &[
    (CANDIDATE_APPLIED, &[CANDIDATE_SCREENING, CANDIDATE_REJECTED]),
    (CANDIDATE_SCREENING, &[CANDIDATE_INTERVIEW, CANDIDATE_REJECTED]),
    (CANDIDATE_INTERVIEW, &[CANDIDATE_OFFERED, CANDIDATE_REJECTED]),
    (CANDIDATE_OFFERED, &[CANDIDATE_HIRED, CANDIDATE_REJECTED]),
];

pub fn validate_employment_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_EMPLOYMENT_TYPES)
}

pub fn validate_posting_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_POSTING_STATUSES)
}

pub fn validate_candidate_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_CANDIDATE_STATUSES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::is_allowed;

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(!is_allowed(CANDIDATE_TRANSITIONS, CANDIDATE_APPLIED, CANDIDATE_HIRED));
        assert!(is_allowed(CANDIDATE_TRANSITIONS, CANDIDATE_OFFERED, CANDIDATE_HIRED));
    }

    #[test]
    fn rejection_allowed_until_hired() {
        for stage in [
            CANDIDATE_APPLIED,
            CANDIDATE_SCREENING,
            CANDIDATE_INTERVIEW,
            CANDIDATE_OFFERED,
        ] {
            assert!(is_allowed(CANDIDATE_TRANSITIONS, stage, CANDIDATE_REJECTED));
        }
        assert!(!is_allowed(CANDIDATE_TRANSITIONS, CANDIDATE_HIRED, CANDIDATE_REJECTED));
    }
}
