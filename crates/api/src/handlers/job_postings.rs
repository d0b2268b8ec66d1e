//! Handlers for the `/job-postings` resource.

use axum::extract::{Path, State};
use axum::Json;
use hrms_core::audit::{actions, entities};
use hrms_core::types::DbId;
use hrms_db::models::recruitment::{
    CreateJobPosting, JobPosting, JobPostingQuery, UpdateJobPosting,
};
use hrms_db::repositories::JobPostingRepo;
use serde_json::json;

use super::not_found;
use crate::audit;
use crate::error::AppResult;
use crate::extract::{self, JsonBody, Query, ValidJson};
use crate::middleware::rbac::{RequireAuth, RequireHr};
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

/// POST /api/v1/job-postings
pub async fn create_job_posting(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    ValidJson(input): ValidJson<CreateJobPosting>,
) -> AppResult<Created<JobPosting>> {
    let posting = JobPostingRepo::create(&state.pool, &input).await?;

    tracing::info!(job_posting_id = posting.id, title = %posting.title, "Job posting created");
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::JOB_POSTING,
        Some(posting.id),
        Some(json!({ "title": posting.title, "department": posting.department })),
    )
    .await;

    Ok(created(posting, "Job posting created"))
}

/// GET /api/v1/job-postings
///
/// Filters: `status`, `department`, `employment_type`, `search` (title).
pub async fn list_job_postings(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<JobPostingQuery>,
) -> AppResult<JsonResponse<Vec<JobPosting>>> {
    let page = params.page_request();
    let rows = JobPostingRepo::list(&state.pool, &params, page).await?;
    let total = JobPostingRepo::count(&state.pool, &params).await?;
    Ok(Json(ApiResponse::page(rows, page, total)))
}

/// GET /api/v1/job-postings/{id}
pub async fn get_job_posting(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<JobPosting>> {
    let posting = JobPostingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Job posting", id))?;
    Ok(ok(posting))
}

/// PUT /api/v1/job-postings/{id}
pub async fn update_job_posting(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateJobPosting>,
) -> AppResult<JsonResponse<JobPosting>> {
    let current = JobPostingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Job posting", id))?;

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let posting = JobPostingRepo::update(&state.pool, id, &merged)
        .await?
        .ok_or_else(|| not_found("Job posting", id))?;

    tracing::info!(job_posting_id = id, status = %posting.status, "Job posting updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::JOB_POSTING,
        Some(id),
        Some(json!({ "status": posting.status })),
    )
    .await;

    Ok(ok(posting))
}

/// DELETE /api/v1/job-postings/{id}
///
/// Blocked while candidates reference the posting; close it instead.
pub async fn delete_job_posting(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    JobPostingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Job posting", id))?;
    if !JobPostingRepo::delete(&state.pool, id).await? {
        return Err(not_found("Job posting", id));
    }

    tracing::info!(job_posting_id = id, user_id = user.user_id, "Job posting deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::JOB_POSTING,
        Some(id),
        None,
    )
    .await;

    Ok(ack("Job posting deleted"))
}
