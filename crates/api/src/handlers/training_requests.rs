//! Handlers for the `/training-requests` resource (enrolment requests).
//!
//! Lifecycle: `pending -> approved | rejected`, then `approved -> completed`.
//! Approval respects the session's capacity when one is set.

use axum::extract::{Path, State};
use axum::Json;
use hrms_core::audit::{actions, entities};
use hrms_core::error::CoreError;
use hrms_core::training::{
    REQUEST_APPROVED, REQUEST_COMPLETED, REQUEST_PENDING, REQUEST_REJECTED, REQUEST_TRANSITIONS,
    STATUS_CANCELLED, STATUS_COMPLETED,
};
use hrms_core::transition::ensure_allowed;
use hrms_core::types::DbId;
use hrms_db::models::training::{
    CreateTrainingRequest, TrainingRequestDetail, TrainingRequestQuery, UpdateTrainingRequest,
};
use hrms_db::populate;
use hrms_db::repositories::{TrainingRepo, TrainingRequestRepo};
use serde_json::json;

use super::{ensure_self_or_hr, not_found, status_changed};
use crate::audit;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, Query, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireHr};
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

const ENTITY: &str = "Training request";

/// POST /api/v1/training-requests
///
/// One request per employee and session. Sessions that are completed or
/// cancelled take no new requests.
pub async fn create_training_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidJson(input): ValidJson<CreateTrainingRequest>,
) -> AppResult<Created<TrainingRequestDetail>> {
    ensure_self_or_hr(&state, &user, input.employee_id).await?;

    if let Some(training_id) = input.training_id {
        if let Some(training) = TrainingRepo::find_by_id(&state.pool, training_id).await? {
            if training.status == STATUS_COMPLETED || training.status == STATUS_CANCELLED {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Training '{}' is {} and no longer accepts requests",
                    training.title, training.status
                ))));
            }
        }
    }

    let request = TrainingRequestRepo::create(&state.pool, &input).await?;

    tracing::info!(
        training_request_id = request.id,
        employee_id = request.employee_id,
        training_id = request.training_id,
        "Training request filed"
    );
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::TRAINING_REQUEST,
        Some(request.id),
        Some(json!({ "employee_id": request.employee_id, "training_id": request.training_id })),
    )
    .await;

    let detail = populate::training_request(&state.pool, request).await?;
    Ok(created(detail, "Training request submitted"))
}

/// GET /api/v1/training-requests
///
/// Filters: `employee_id`, `training_id`, `status`.
pub async fn list_training_requests(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<TrainingRequestQuery>,
) -> AppResult<JsonResponse<Vec<TrainingRequestDetail>>> {
    let page = params.page_request();
    let rows = TrainingRequestRepo::list(&state.pool, &params, page).await?;
    let total = TrainingRequestRepo::count(&state.pool, &params).await?;
    let data = populate::training_requests(&state.pool, rows).await?;
    Ok(Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/training-requests/{id}
pub async fn get_training_request(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<TrainingRequestDetail>> {
    let request = TrainingRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    Ok(ok(populate::training_request(&state.pool, request).await?))
}

/// PUT /api/v1/training-requests/{id}
///
/// Only the notes are editable; the employee and session are fixed once
/// the request exists.
pub async fn update_training_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateTrainingRequest>,
) -> AppResult<JsonResponse<TrainingRequestDetail>> {
    let current = TrainingRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    ensure_self_or_hr(&state, &user, Some(current.employee_id)).await?;

    let merged = input.apply_to(&current);
    let request = TrainingRequestRepo::update_notes(&state.pool, id, merged.notes.as_deref())
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;

    tracing::info!(training_request_id = id, user_id = user.user_id, "Training request updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::TRAINING_REQUEST,
        Some(id),
        None,
    )
    .await;

    Ok(ok(populate::training_request(&state.pool, request).await?))
}

/// DELETE /api/v1/training-requests/{id}
pub async fn delete_training_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    TrainingRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    if !TrainingRequestRepo::delete(&state.pool, id).await? {
        return Err(not_found(ENTITY, id));
    }

    tracing::info!(training_request_id = id, user_id = user.user_id, "Training request deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::TRAINING_REQUEST,
        Some(id),
        None,
    )
    .await;

    Ok(ack("Training request deleted"))
}

/// POST /api/v1/training-requests/{id}/approve
///
/// Fails with a conflict when the session's approved seats already reach
/// its capacity.
pub async fn approve_training_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<TrainingRequestDetail>> {
    transition(&state, &user, id, REQUEST_APPROVED, actions::APPROVE).await
}

/// POST /api/v1/training-requests/{id}/reject
pub async fn reject_training_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<TrainingRequestDetail>> {
    transition(&state, &user, id, REQUEST_REJECTED, actions::REJECT).await
}

/// POST /api/v1/training-requests/{id}/complete
pub async fn complete_training_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<TrainingRequestDetail>> {
    transition(&state, &user, id, REQUEST_COMPLETED, actions::STATUS_CHANGE).await
}

async fn transition(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    to: &str,
    action: &str,
) -> AppResult<JsonResponse<TrainingRequestDetail>> {
    let current = TrainingRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    ensure_allowed(ENTITY, REQUEST_TRANSITIONS, &current.status, to)?;

    if to == REQUEST_APPROVED && current.status == REQUEST_PENDING {
        let training = TrainingRepo::find_by_id(&state.pool, current.training_id)
            .await?
            .ok_or_else(|| not_found("Training", current.training_id))?;
        if let Some(capacity) = training.capacity {
            let approved = TrainingRequestRepo::count_approved(&state.pool, training.id).await?;
            if approved >= i64::from(capacity) {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Training '{}' is full ({approved}/{capacity} seats approved)",
                    training.title
                ))));
            }
        }
    }

    let request =
        TrainingRequestRepo::transition(&state.pool, id, &current.status, to, user.user_id)
            .await?
            .ok_or_else(|| status_changed(ENTITY))?;

    tracing::info!(
        training_request_id = id,
        status = to,
        reviewer = user.user_id,
        "Training request transitioned"
    );
    audit::record(
        &state.pool,
        &user,
        action,
        entities::TRAINING_REQUEST,
        Some(id),
        Some(json!({ "from": current.status, "to": to })),
    )
    .await;

    Ok(ok(populate::training_request(&state.pool, request).await?))
}
