//! Handlers for the `/candidates` resource (recruitment pipeline).
//!
//! Candidates move one stage at a time through `PUT /candidates/{id}/status`
//! and may be rejected at any stage before hiring.

use axum::extract::{Path, State};
use axum::Json;
use hrms_core::audit::{actions, entities};
use hrms_core::error::CoreError;
use hrms_core::recruitment::{CANDIDATE_TRANSITIONS, POSTING_OPEN, VALID_CANDIDATE_STATUSES};
use hrms_core::stats::{total, zero_filled, StatusCounts};
use hrms_core::transition::ensure_allowed;
use hrms_core::types::DbId;
use hrms_db::models::recruitment::{
    CandidateDetail, CandidateQuery, CreateCandidate, PipelineQuery, UpdateCandidate,
    UpdateCandidateStatus,
};
use hrms_db::populate;
use hrms_db::repositories::{CandidateRepo, JobPostingRepo};
use serde::Serialize;
use serde_json::json;

use super::{not_found, status_changed};
use crate::audit;
use crate::error::{AppError, AppResult};
use crate::extract::{self, JsonBody, Query, ValidJson};
use crate::middleware::rbac::RequireHr;
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CandidateStats {
    pub by_status: StatusCounts,
    pub total: i64,
}

/// POST /api/v1/candidates
///
/// Applications are only accepted for open postings.
pub async fn create_candidate(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    ValidJson(input): ValidJson<CreateCandidate>,
) -> AppResult<Created<CandidateDetail>> {
    if let Some(posting_id) = input.job_posting_id {
        if let Some(posting) = JobPostingRepo::find_by_id(&state.pool, posting_id).await? {
            if posting.status != POSTING_OPEN {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Job posting '{}' is {} and not accepting applications",
                    posting.title, posting.status
                ))));
            }
        }
    }

    let candidate = CandidateRepo::create(&state.pool, &input).await?;

    tracing::info!(
        candidate_id = candidate.id,
        job_posting_id = candidate.job_posting_id,
        "Candidate added"
    );
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::CANDIDATE,
        Some(candidate.id),
        Some(json!({ "job_posting_id": candidate.job_posting_id })),
    )
    .await;

    let detail = populate::candidate(&state.pool, candidate).await?;
    Ok(created(detail, "Candidate created"))
}

/// GET /api/v1/candidates
///
/// Filters: `job_posting_id`, `status`, `search` (name, e-mail).
pub async fn list_candidates(
    State(state): State<AppState>,
    RequireHr(_user): RequireHr,
    Query(params): Query<CandidateQuery>,
) -> AppResult<JsonResponse<Vec<CandidateDetail>>> {
    let page = params.page_request();
    let rows = CandidateRepo::list(&state.pool, &params, page).await?;
    let total = CandidateRepo::count(&state.pool, &params).await?;
    let data = populate::candidates(&state.pool, rows).await?;
    Ok(Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/candidates/{id}
pub async fn get_candidate(
    State(state): State<AppState>,
    RequireHr(_user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<CandidateDetail>> {
    let candidate = CandidateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Candidate", id))?;
    Ok(ok(populate::candidate(&state.pool, candidate).await?))
}

/// PUT /api/v1/candidates/{id}
///
/// Contact details and notes. The stage changes through `/status`.
pub async fn update_candidate(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateCandidate>,
) -> AppResult<JsonResponse<CandidateDetail>> {
    let current = CandidateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Candidate", id))?;

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let candidate = CandidateRepo::update(&state.pool, id, &merged)
        .await?
        .ok_or_else(|| not_found("Candidate", id))?;

    tracing::info!(candidate_id = id, user_id = user.user_id, "Candidate updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::CANDIDATE,
        Some(id),
        None,
    )
    .await;

    Ok(ok(populate::candidate(&state.pool, candidate).await?))
}

/// PUT /api/v1/candidates/{id}/status
pub async fn update_candidate_status(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateCandidateStatus>,
) -> AppResult<JsonResponse<CandidateDetail>> {
    let current = CandidateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Candidate", id))?;
    let to = input.status.as_deref().unwrap_or_default();
    ensure_allowed("Candidate", CANDIDATE_TRANSITIONS, &current.status, to)?;

    let candidate =
        CandidateRepo::transition(&state.pool, id, &current.status, to, input.notes.as_deref())
            .await?
            .ok_or_else(|| status_changed("Candidate"))?;

    tracing::info!(
        candidate_id = id,
        from = %current.status,
        to,
        "Candidate moved through pipeline"
    );
    audit::record(
        &state.pool,
        &user,
        actions::STATUS_CHANGE,
        entities::CANDIDATE,
        Some(id),
        Some(json!({ "from": current.status, "to": to })),
    )
    .await;

    Ok(ok(populate::candidate(&state.pool, candidate).await?))
}

/// DELETE /api/v1/candidates/{id}
pub async fn delete_candidate(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    CandidateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Candidate", id))?;
    if !CandidateRepo::delete(&state.pool, id).await? {
        return Err(not_found("Candidate", id));
    }

    tracing::info!(candidate_id = id, user_id = user.user_id, "Candidate deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::CANDIDATE,
        Some(id),
        None,
    )
    .await;

    Ok(ack("Candidate deleted"))
}

/// GET /api/v1/candidates/stats
///
/// Pipeline counts, optionally for a single `job_posting_id`.
pub async fn candidate_stats(
    State(state): State<AppState>,
    RequireHr(_user): RequireHr,
    Query(params): Query<PipelineQuery>,
) -> AppResult<JsonResponse<CandidateStats>> {
    let by_status = zero_filled(
        VALID_CANDIDATE_STATUSES,
        CandidateRepo::count_by_status(&state.pool, params.job_posting_id).await?,
    );
    Ok(ok(CandidateStats {
        total: total(&by_status),
        by_status,
    }))
}
