//! Leave request entity model and DTOs.
//!
//! `status`, `reviewed_by`, `reviewed_at` and `review_comment` are written
//! only by the approve/reject transitions, never by create or update.

use hrms_core::leave::{leave_days, validate_type};
use hrms_core::pagination::PageRequest;
use hrms_core::stats::StatusCounts;
use hrms_core::types::{Date, DbId, Timestamp};
use hrms_core::validation::cross_field_error;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::common::{EmployeeSummary, UserSummary};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeaveRequest {
    pub id: DbId,
    pub employee_id: DbId,
    pub leave_type: String,
    pub start_date: Date,
    pub end_date: Date,
    /// Inclusive day count, derived from the date range.
    pub days: i32,
    pub reason: String,
    pub status: String,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub review_comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveRequestDetail {
    #[serde(flatten)]
    pub leave_request: LeaveRequest,
    pub employee: Option<EmployeeSummary>,
    pub reviewer: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "check_range", skip_on_field_errors = false))]
pub struct CreateLeaveRequest {
    #[validate(required)]
    pub employee_id: Option<DbId>,
    #[validate(required, custom(function = "validate_type"))]
    pub leave_type: Option<String>,
    #[validate(required)]
    pub start_date: Option<Date>,
    #[validate(required)]
    pub end_date: Option<Date>,
    #[validate(required, length(min = 1, max = 1000))]
    pub reason: Option<String>,
}

impl CreateLeaveRequest {
    pub fn days(&self) -> Option<i32> {
        Some(leave_days(self.start_date?, self.end_date?))
    }
}

fn check_range(input: &CreateLeaveRequest) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
        if end < start {
            return Err(cross_field_error("end_date", "must not be before start_date"));
        }
    }
    Ok(())
}

/// Editable fields of a pending leave request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLeaveRequest {
    pub leave_type: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub reason: Option<String>,
}

impl UpdateLeaveRequest {
    pub fn apply_to(self, current: &LeaveRequest) -> CreateLeaveRequest {
        CreateLeaveRequest {
            employee_id: Some(current.employee_id),
            leave_type: Some(self.leave_type.unwrap_or_else(|| current.leave_type.clone())),
            start_date: Some(self.start_date.unwrap_or(current.start_date)),
            end_date: Some(self.end_date.unwrap_or(current.end_date)),
            reason: Some(self.reason.unwrap_or_else(|| current.reason.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub employee_id: Option<DbId>,
    pub status: Option<String>,
    pub leave_type: Option<String>,
    /// Inclusive range on `start_date`.
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl LeaveQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveStats {
    pub by_status: StatusCounts,
    pub by_type: StatusCounts,
    pub total: i64,
    /// Sum of `days` over approved requests.
    pub approved_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_core::validation::collect_field_errors;

    #[test]
    fn end_before_start_is_a_field_error() {
        let input = CreateLeaveRequest {
            employee_id: Some(1),
            leave_type: Some("annual".into()),
            start_date: Date::from_ymd_opt(2024, 5, 10),
            end_date: Date::from_ymd_opt(2024, 5, 8),
            reason: Some("Trip".into()),
        };
        let errors = collect_field_errors(&input.validate().unwrap_err());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "end_date");
    }

    #[test]
    fn days_are_inclusive() {
        let input = CreateLeaveRequest {
            start_date: Date::from_ymd_opt(2024, 5, 6),
            end_date: Date::from_ymd_opt(2024, 5, 10),
            ..Default::default()
        };
        assert_eq!(input.days(), Some(5));
    }

    #[test]
    fn merged_update_is_revalidated() {
        let current = LeaveRequest {
            id: 1,
            employee_id: 3,
            leave_type: "sick".into(),
            start_date: Date::from_ymd_opt(2024, 5, 6).unwrap(),
            end_date: Date::from_ymd_opt(2024, 5, 7).unwrap(),
            days: 2,
            reason: "Flu".into(),
            status: "pending".into(),
            reviewed_by: None,
            reviewed_at: None,
            review_comment: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let patch = UpdateLeaveRequest {
            start_date: Date::from_ymd_opt(2024, 5, 9),
            ..Default::default()
        };
        assert!(patch.apply_to(&current).validate().is_err());
    }
}
