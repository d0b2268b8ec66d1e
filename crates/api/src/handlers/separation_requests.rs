//! Handlers for the `/separation-requests` resource.
//!
//! Lifecycle: `pending -> approved | rejected`, then `approved -> processed`.
//! Processing a request marks the employee as terminated.

use axum::extract::{Path, State};
use axum::Json;
use hrms_core::audit::{actions, entities};
use hrms_core::employee::STATUS_TERMINATED;
use hrms_core::error::CoreError;
use hrms_core::separation::{
    self, STATUS_APPROVED, STATUS_PENDING, STATUS_PROCESSED, STATUS_REJECTED,
};
use hrms_core::stats::{total, zero_filled, StatusCounts};
use hrms_core::transition::ensure_allowed;
use hrms_core::types::DbId;
use hrms_db::models::common::{ReviewAction, StatsQuery};
use hrms_db::models::separation::{
    CreateSeparationRequest, SeparationQuery, SeparationRequestDetail, UpdateSeparationRequest,
};
use hrms_db::populate;
use hrms_db::repositories::{EmployeeRepo, SeparationRequestRepo};
use serde::Serialize;
use serde_json::json;

use super::{ensure_self_or_hr, not_found, status_changed};
use crate::audit;
use crate::error::{AppError, AppResult};
use crate::extract::{self, JsonBody, OptionalJson, Query, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireHr};
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

const ENTITY: &str = "Separation request";

#[derive(Debug, Serialize)]
pub struct SeparationStats {
    pub by_status: StatusCounts,
    pub by_type: StatusCounts,
    pub total: i64,
}

/// POST /api/v1/separation-requests
pub async fn create_separation_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidJson(input): ValidJson<CreateSeparationRequest>,
) -> AppResult<Created<SeparationRequestDetail>> {
    ensure_self_or_hr(&state, &user, input.employee_id).await?;

    let request = SeparationRequestRepo::create(&state.pool, &input).await?;

    tracing::info!(
        separation_request_id = request.id,
        employee_id = request.employee_id,
        separation_type = %request.separation_type,
        "Separation request filed"
    );
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::SEPARATION_REQUEST,
        Some(request.id),
        Some(json!({
            "employee_id": request.employee_id,
            "separation_type": request.separation_type,
        })),
    )
    .await;

    let detail = populate::separation_request(&state.pool, request).await?;
    Ok(created(detail, "Separation request submitted"))
}

/// GET /api/v1/separation-requests
///
/// Filters: `employee_id`, `status`, `separation_type`, `from`/`to` on the
/// notice date.
pub async fn list_separation_requests(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<SeparationQuery>,
) -> AppResult<JsonResponse<Vec<SeparationRequestDetail>>> {
    let page = params.page_request();
    let rows = SeparationRequestRepo::list(&state.pool, &params, page).await?;
    let total = SeparationRequestRepo::count(&state.pool, &params).await?;
    let data = populate::separation_requests(&state.pool, rows).await?;
    Ok(Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/separation-requests/{id}
pub async fn get_separation_request(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<SeparationRequestDetail>> {
    let request = SeparationRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    Ok(ok(populate::separation_request(&state.pool, request).await?))
}

/// PUT /api/v1/separation-requests/{id}
pub async fn update_separation_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateSeparationRequest>,
) -> AppResult<JsonResponse<SeparationRequestDetail>> {
    let current = SeparationRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    ensure_self_or_hr(&state, &user, Some(current.employee_id)).await?;

    if current.status != STATUS_PENDING {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Only pending separation requests can be updated (current status: '{}')",
            current.status
        ))));
    }

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let request = SeparationRequestRepo::update_pending(&state.pool, id, &merged)
        .await?
        .ok_or_else(|| status_changed(ENTITY))?;

    tracing::info!(separation_request_id = id, user_id = user.user_id, "Separation request updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::SEPARATION_REQUEST,
        Some(id),
        None,
    )
    .await;

    Ok(ok(populate::separation_request(&state.pool, request).await?))
}

/// DELETE /api/v1/separation-requests/{id}
pub async fn delete_separation_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    SeparationRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    if !SeparationRequestRepo::delete(&state.pool, id).await? {
        return Err(not_found(ENTITY, id));
    }

    tracing::info!(separation_request_id = id, user_id = user.user_id, "Separation request deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::SEPARATION_REQUEST,
        Some(id),
        None,
    )
    .await;

    Ok(ack("Separation request deleted"))
}

/// POST /api/v1/separation-requests/{id}/approve
pub async fn approve_separation_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    OptionalJson(body): OptionalJson<ReviewAction>,
) -> AppResult<JsonResponse<SeparationRequestDetail>> {
    transition(&state, &user, id, STATUS_APPROVED, actions::APPROVE, body).await
}

/// POST /api/v1/separation-requests/{id}/reject
pub async fn reject_separation_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    OptionalJson(body): OptionalJson<ReviewAction>,
) -> AppResult<JsonResponse<SeparationRequestDetail>> {
    transition(&state, &user, id, STATUS_REJECTED, actions::REJECT, body).await
}

/// POST /api/v1/separation-requests/{id}/process
///
/// Final step for an approved request. The employee's status becomes
/// `terminated`.
pub async fn process_separation_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    OptionalJson(body): OptionalJson<ReviewAction>,
) -> AppResult<JsonResponse<SeparationRequestDetail>> {
    transition(&state, &user, id, STATUS_PROCESSED, actions::PROCESS, body).await
}

async fn transition(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    to: &str,
    action: &str,
    body: ReviewAction,
) -> AppResult<JsonResponse<SeparationRequestDetail>> {
    let current = SeparationRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    ensure_allowed(ENTITY, separation::TRANSITIONS, &current.status, to)?;

    let request = SeparationRequestRepo::transition(
        &state.pool,
        id,
        &current.status,
        to,
        user.user_id,
        body.comment.as_deref(),
    )
    .await?
    .ok_or_else(|| status_changed(ENTITY))?;

    if to == STATUS_PROCESSED {
        EmployeeRepo::set_status(&state.pool, request.employee_id, STATUS_TERMINATED).await?;
        tracing::info!(employee_id = request.employee_id, "Employee terminated after separation");
        audit::record(
            &state.pool,
            &user,
            actions::STATUS_CHANGE,
            entities::EMPLOYEE,
            Some(request.employee_id),
            Some(json!({ "status": STATUS_TERMINATED, "separation_request_id": id })),
        )
        .await;
    }

    tracing::info!(
        separation_request_id = id,
        status = to,
        actor = user.user_id,
        "Separation request transitioned"
    );
    audit::record(
        &state.pool,
        &user,
        action,
        entities::SEPARATION_REQUEST,
        Some(id),
        Some(json!({ "from": current.status, "to": to, "remarks": body.comment })),
    )
    .await;

    Ok(ok(populate::separation_request(&state.pool, request).await?))
}

/// GET /api/v1/separation-requests/stats
pub async fn separation_stats(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(scope): Query<StatsQuery>,
) -> AppResult<JsonResponse<SeparationStats>> {
    let by_status = zero_filled(
        separation::VALID_STATUSES,
        SeparationRequestRepo::count_by_status(&state.pool, &scope).await?,
    );
    let by_type = zero_filled(
        separation::VALID_TYPES,
        SeparationRequestRepo::count_by_type(&state.pool, &scope).await?,
    );
    Ok(ok(SeparationStats {
        total: total(&by_status),
        by_status,
        by_type,
    }))
}
