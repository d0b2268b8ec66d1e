//! Separation request entity model and DTOs.

use hrms_core::pagination::PageRequest;
use hrms_core::separation::validate_type;
use hrms_core::types::{Date, DbId, Timestamp};
use hrms_core::validation::cross_field_error;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::common::{EmployeeSummary, UserSummary};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeparationRequest {
    pub id: DbId,
    pub employee_id: DbId,
    pub separation_type: String,
    pub reason: String,
    pub notice_date: Date,
    pub last_working_day: Date,
    pub status: String,
    pub processed_by: Option<DbId>,
    pub processed_at: Option<Timestamp>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeparationRequestDetail {
    #[serde(flatten)]
    pub separation_request: SeparationRequest,
    pub employee: Option<EmployeeSummary>,
    pub processor: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "check_range", skip_on_field_errors = false))]
pub struct CreateSeparationRequest {
    #[validate(required)]
    pub employee_id: Option<DbId>,
    #[validate(required, custom(function = "validate_type"))]
    pub separation_type: Option<String>,
    #[validate(required, length(min = 1, max = 2000))]
    pub reason: Option<String>,
    #[validate(required)]
    pub notice_date: Option<Date>,
    #[validate(required)]
    pub last_working_day: Option<Date>,
}

fn check_range(input: &CreateSeparationRequest) -> Result<(), ValidationError> {
    if let (Some(notice), Some(last)) = (input.notice_date, input.last_working_day) {
        if last < notice {
            return Err(cross_field_error(
                "last_working_day",
                "must not be before notice_date",
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSeparationRequest {
    pub separation_type: Option<String>,
    pub reason: Option<String>,
    pub notice_date: Option<Date>,
    pub last_working_day: Option<Date>,
}

impl UpdateSeparationRequest {
    pub fn apply_to(self, current: &SeparationRequest) -> CreateSeparationRequest {
        CreateSeparationRequest {
            employee_id: Some(current.employee_id),
            separation_type: Some(
                self.separation_type
                    .unwrap_or_else(|| current.separation_type.clone()),
            ),
            reason: Some(self.reason.unwrap_or_else(|| current.reason.clone())),
            notice_date: Some(self.notice_date.unwrap_or(current.notice_date)),
            last_working_day: Some(self.last_working_day.unwrap_or(current.last_working_day)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeparationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub employee_id: Option<DbId>,
    pub status: Option<String>,
    pub separation_type: Option<String>,
    /// Inclusive range on `last_working_day`.
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl SeparationQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
