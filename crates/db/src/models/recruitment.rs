//! Job posting and candidate models and DTOs.

use hrms_core::pagination::PageRequest;
use hrms_core::recruitment::{
    validate_candidate_status, validate_employment_type, validate_posting_status,
};
use hrms_core::types::{nullable, Date, DbId, Timestamp};
use hrms_core::validation::validate_phone;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::common::JobPostingSummary;

// ---------------------------------------------------------------------------
// Job postings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobPosting {
    pub id: DbId,
    pub title: String,
    pub department: String,
    pub description: String,
    pub employment_type: String,
    pub openings: i32,
    pub status: String,
    pub closing_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateJobPosting {
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub department: Option<String>,
    #[validate(required, length(min = 1, max = 5000))]
    pub description: Option<String>,
    #[validate(required, custom(function = "validate_employment_type"))]
    pub employment_type: Option<String>,
    #[validate(range(min = 1))]
    pub openings: Option<i32>,
    #[validate(custom(function = "validate_posting_status"))]
    pub status: Option<String>,
    pub closing_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJobPosting {
    pub title: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    pub employment_type: Option<String>,
    pub openings: Option<i32>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub closing_date: Option<Option<Date>>,
}

impl UpdateJobPosting {
    pub fn apply_to(self, current: &JobPosting) -> CreateJobPosting {
        CreateJobPosting {
            title: Some(self.title.unwrap_or_else(|| current.title.clone())),
            department: Some(self.department.unwrap_or_else(|| current.department.clone())),
            description: Some(
                self.description
                    .unwrap_or_else(|| current.description.clone()),
            ),
            employment_type: Some(
                self.employment_type
                    .unwrap_or_else(|| current.employment_type.clone()),
            ),
            openings: Some(self.openings.unwrap_or(current.openings)),
            status: Some(self.status.unwrap_or_else(|| current.status.clone())),
            closing_date: self.closing_date.unwrap_or(current.closing_date),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPostingQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub employment_type: Option<String>,
    pub search: Option<String>,
}

impl JobPostingQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// An application to a job posting. `status` follows the hiring pipeline
/// and changes only through the status endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Candidate {
    pub id: DbId,
    pub job_posting_id: DbId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_path: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetail {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub job_posting: Option<JobPostingSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCandidate {
    #[validate(required)]
    pub job_posting_id: Option<DbId>,
    #[validate(required, length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub resume_path: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCandidate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub resume_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl UpdateCandidate {
    pub fn apply_to(self, current: &Candidate) -> CreateCandidate {
        CreateCandidate {
            job_posting_id: Some(current.job_posting_id),
            full_name: Some(self.full_name.unwrap_or_else(|| current.full_name.clone())),
            email: Some(self.email.unwrap_or_else(|| current.email.clone())),
            phone: self.phone.unwrap_or_else(|| current.phone.clone()),
            resume_path: self
                .resume_path
                .unwrap_or_else(|| current.resume_path.clone()),
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
        }
    }
}

/// Body of the pipeline transition endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCandidateStatus {
    #[validate(required, custom(function = "validate_candidate_status"))]
    pub status: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub job_posting_id: Option<DbId>,
    pub status: Option<String>,
    /// Matches full name or e-mail.
    pub search: Option<String>,
}

impl CandidateQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Scope for candidate pipeline stats.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineQuery {
    pub job_posting_id: Option<DbId>,
}
