//! Handlers for the `/trainings` resource (training sessions).

use axum::extract::{Path, State};
use axum::Json;
use hrms_core::audit::{actions, entities};
use hrms_core::stats::{group_by_month, total, zero_filled, MonthlyCounts, StatusCounts};
use hrms_core::training::{VALID_REQUEST_STATUSES, VALID_STATUSES};
use hrms_core::types::DbId;
use hrms_db::models::common::StatsQuery;
use hrms_db::models::training::{CreateTraining, Training, TrainingQuery, UpdateTraining};
use hrms_db::repositories::{TrainingRepo, TrainingRequestRepo};
use serde::Serialize;
use serde_json::json;

use super::not_found;
use crate::audit;
use crate::error::AppResult;
use crate::extract::{self, JsonBody, Query, ValidJson};
use crate::middleware::rbac::{RequireAuth, RequireHr};
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TrainingStats {
    pub by_status: StatusCounts,
    pub monthly: Vec<MonthlyCounts>,
    pub total: i64,
    /// Enrolment requests across all sessions, by request status.
    pub requests_by_status: StatusCounts,
}

/// POST /api/v1/trainings
pub async fn create_training(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    ValidJson(input): ValidJson<CreateTraining>,
) -> AppResult<Created<Training>> {
    let training = TrainingRepo::create(&state.pool, &input).await?;

    tracing::info!(training_id = training.id, title = %training.title, "Training scheduled");
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::TRAINING,
        Some(training.id),
        Some(json!({ "title": training.title, "start_date": training.start_date })),
    )
    .await;

    Ok(created(training, "Training created"))
}

/// GET /api/v1/trainings
///
/// Filters: `status`, `search` (title, trainer), `from`/`to` on start date.
pub async fn list_trainings(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<TrainingQuery>,
) -> AppResult<JsonResponse<Vec<Training>>> {
    let page = params.page_request();
    let rows = TrainingRepo::list(&state.pool, &params, page).await?;
    let total = TrainingRepo::count(&state.pool, &params).await?;
    Ok(Json(ApiResponse::page(rows, page, total)))
}

/// GET /api/v1/trainings/{id}
pub async fn get_training(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Training>> {
    let training = TrainingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Training", id))?;
    Ok(ok(training))
}

/// PUT /api/v1/trainings/{id}
pub async fn update_training(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateTraining>,
) -> AppResult<JsonResponse<Training>> {
    let current = TrainingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Training", id))?;

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let training = TrainingRepo::update(&state.pool, id, &merged)
        .await?
        .ok_or_else(|| not_found("Training", id))?;

    tracing::info!(training_id = id, user_id = user.user_id, "Training updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::TRAINING,
        Some(id),
        Some(json!({ "status": training.status })),
    )
    .await;

    Ok(ok(training))
}

/// DELETE /api/v1/trainings/{id}
///
/// Blocked while enrolment requests reference the session.
pub async fn delete_training(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    TrainingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Training", id))?;
    if !TrainingRepo::delete(&state.pool, id).await? {
        return Err(not_found("Training", id));
    }

    tracing::info!(training_id = id, user_id = user.user_id, "Training deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::TRAINING,
        Some(id),
        None,
    )
    .await;

    Ok(ack("Training deleted"))
}

/// GET /api/v1/trainings/stats
///
/// Scope: `from`/`to` on the session start date; months are start months.
pub async fn training_stats(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(scope): Query<StatsQuery>,
) -> AppResult<JsonResponse<TrainingStats>> {
    let by_status = zero_filled(
        VALID_STATUSES,
        TrainingRepo::count_by_status(&state.pool, &scope).await?,
    );
    let monthly = group_by_month(
        VALID_STATUSES,
        TrainingRepo::count_by_month(&state.pool, &scope).await?,
    );
    let requests_by_status = zero_filled(
        VALID_REQUEST_STATUSES,
        TrainingRequestRepo::count_by_status(&state.pool, &scope).await?,
    );

    Ok(ok(TrainingStats {
        total: total(&by_status),
        by_status,
        monthly,
        requests_by_status,
    }))
}
