//! Attendance entity model and DTOs.

use chrono::NaiveTime;
use hrms_core::attendance::{validate_status, work_hours};
use hrms_core::pagination::PageRequest;
use hrms_core::types::{nullable, Date, DbId, Timestamp};
use hrms_core::validation::cross_field_error;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::common::{EmployeeSummary, UserSummary};

/// A row from the `attendance` table. One row per employee per day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attendance {
    pub id: DbId,
    pub employee_id: DbId,
    pub date: Date,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: String,
    /// Derived from `check_in`/`check_out` on every write.
    pub work_hours: Option<f64>,
    pub notes: Option<String>,
    pub checked_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceDetail {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub employee: Option<EmployeeSummary>,
    pub checked_by_user: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "check_times", skip_on_field_errors = false))]
pub struct CreateAttendance {
    #[validate(required)]
    pub employee_id: Option<DbId>,
    #[validate(required)]
    pub date: Option<Date>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    #[validate(required, custom(function = "validate_status"))]
    pub status: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl CreateAttendance {
    pub fn work_hours(&self) -> Option<f64> {
        work_hours(self.check_in, self.check_out)
    }
}

fn check_times(input: &CreateAttendance) -> Result<(), ValidationError> {
    if let (Some(check_in), Some(check_out)) = (input.check_in, input.check_out) {
        if check_out <= check_in {
            return Err(cross_field_error("check_out", "must be after check_in"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttendance {
    pub employee_id: Option<DbId>,
    pub date: Option<Date>,
    #[serde(default, deserialize_with = "nullable")]
    pub check_in: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "nullable")]
    pub check_out: Option<Option<NaiveTime>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl UpdateAttendance {
    pub fn apply_to(self, current: &Attendance) -> CreateAttendance {
        CreateAttendance {
            employee_id: Some(self.employee_id.unwrap_or(current.employee_id)),
            date: Some(self.date.unwrap_or(current.date)),
            check_in: self.check_in.unwrap_or(current.check_in),
            check_out: self.check_out.unwrap_or(current.check_out),
            status: Some(self.status.unwrap_or_else(|| current.status.clone())),
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub employee_id: Option<DbId>,
    pub status: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl AttendanceQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_core::validation::collect_field_errors;

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn check_out_before_check_in_is_rejected() {
        let input = CreateAttendance {
            employee_id: Some(1),
            date: Date::from_ymd_opt(2024, 3, 1),
            check_in: t(17, 0),
            check_out: t(9, 0),
            status: Some("present".into()),
            notes: None,
        };
        let errors = collect_field_errors(&input.validate().unwrap_err());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "check_out");
    }

    #[test]
    fn unknown_status_lists_allowed_values() {
        let input = CreateAttendance {
            employee_id: Some(1),
            date: Date::from_ymd_opt(2024, 3, 1),
            status: Some("late".into()),
            ..Default::default()
        };
        let errors = collect_field_errors(&input.validate().unwrap_err());
        assert_eq!(errors[0].field, "status");
        assert!(errors[0].message.contains("half_day"));
    }

    #[test]
    fn merged_update_recomputes_hours() {
        let current = Attendance {
            id: 1,
            employee_id: 2,
            date: Date::from_ymd_opt(2024, 3, 1).unwrap(),
            check_in: t(9, 0),
            check_out: t(17, 0),
            status: "present".into(),
            work_hours: Some(8.0),
            notes: None,
            checked_by: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let patch: UpdateAttendance = serde_json::from_str(r#"{"check_out": "13:00:00"}"#).unwrap();
        let merged = patch.apply_to(&current);
        assert_eq!(merged.work_hours(), Some(4.0));
    }
}
