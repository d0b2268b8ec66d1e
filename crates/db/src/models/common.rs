//! Projections embedded in populated responses, and query parameters
//! shared by several resources.

use hrms_core::types::{Date, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Employee reference as shown inside other records.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct EmployeeSummary {
    pub id: DbId,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

/// User reference (reviewers, uploaders, processors).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TrainingSummary {
    pub id: DbId,
    pub title: String,
    pub start_date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct JobPostingSummary {
    pub id: DbId,
    pub title: String,
    pub department: String,
}

/// Scope for the `/stats` endpoints: an optional owning employee and an
/// inclusive date range on the resource's primary date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub employee_id: Option<DbId>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

/// Body accepted by review-style transitions (approve/reject/process).
#[derive(Debug, Clone, Default, Deserialize, validator::Validate)]
pub struct ReviewAction {
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}
