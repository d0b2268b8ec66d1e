//! Training session and training request models and DTOs.

use hrms_core::pagination::PageRequest;
use hrms_core::training::validate_status;
use hrms_core::types::{nullable, Date, DbId, Timestamp};
use hrms_core::validation::cross_field_error;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::common::{EmployeeSummary, TrainingSummary, UserSummary};

// ---------------------------------------------------------------------------
// Training sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Training {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub trainer: String,
    pub start_date: Date,
    pub end_date: Date,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "check_range", skip_on_field_errors = false))]
pub struct CreateTraining {
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub trainer: Option<String>,
    #[validate(required)]
    pub start_date: Option<Date>,
    #[validate(required)]
    pub end_date: Option<Date>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

fn check_range(input: &CreateTraining) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
        if end < start {
            return Err(cross_field_error("end_date", "must not be before start_date"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTraining {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub trainer: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub capacity: Option<Option<i32>>,
    pub status: Option<String>,
}

impl UpdateTraining {
    pub fn apply_to(self, current: &Training) -> CreateTraining {
        CreateTraining {
            title: Some(self.title.unwrap_or_else(|| current.title.clone())),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            trainer: Some(self.trainer.unwrap_or_else(|| current.trainer.clone())),
            start_date: Some(self.start_date.unwrap_or(current.start_date)),
            end_date: Some(self.end_date.unwrap_or(current.end_date)),
            location: self.location.unwrap_or_else(|| current.location.clone()),
            capacity: self.capacity.unwrap_or(current.capacity),
            status: Some(self.status.unwrap_or_else(|| current.status.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    /// Matches title or trainer.
    pub search: Option<String>,
    /// Inclusive range on `start_date`.
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl TrainingQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

// ---------------------------------------------------------------------------
// Training requests
// ---------------------------------------------------------------------------

/// An employee's request to attend a training session. Status moves only
/// through the approve/reject/complete transitions.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingRequest {
    pub id: DbId,
    pub employee_id: DbId,
    pub training_id: DbId,
    pub status: String,
    pub notes: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingRequestDetail {
    #[serde(flatten)]
    pub training_request: TrainingRequest,
    pub employee: Option<EmployeeSummary>,
    pub training: Option<TrainingSummary>,
    pub reviewer: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTrainingRequest {
    #[validate(required)]
    pub employee_id: Option<DbId>,
    #[validate(required)]
    pub training_id: Option<DbId>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTrainingRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl UpdateTrainingRequest {
    pub fn apply_to(self, current: &TrainingRequest) -> CreateTrainingRequest {
        CreateTrainingRequest {
            employee_id: Some(current.employee_id),
            training_id: Some(current.training_id),
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingRequestQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub employee_id: Option<DbId>,
    pub training_id: Option<DbId>,
    pub status: Option<String>,
}

impl TrainingRequestQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
