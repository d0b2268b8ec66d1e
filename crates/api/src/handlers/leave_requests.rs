//! Handlers for the `/leave-requests` resource.
//!
//! Employees file and edit their own requests while they are pending; HR
//! approves or rejects them. `days` is derived from the inclusive date range.

use axum::extract::{Path, State};
use axum::Json;
use hrms_core::audit::{actions, entities};
use hrms_core::error::CoreError;
use hrms_core::leave::{self, STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};
use hrms_core::stats::{total, zero_filled};
use hrms_core::transition::ensure_allowed;
use hrms_core::types::DbId;
use hrms_db::models::common::{ReviewAction, StatsQuery};
use hrms_db::models::leave::{
    CreateLeaveRequest, LeaveQuery, LeaveRequestDetail, LeaveStats, UpdateLeaveRequest,
};
use hrms_db::populate;
use hrms_db::repositories::LeaveRequestRepo;
use serde_json::json;

use super::{ensure_self_or_hr, not_found, status_changed};
use crate::audit;
use crate::error::{AppError, AppResult};
use crate::extract::{self, JsonBody, OptionalJson, Query, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireHr};
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

const ENTITY: &str = "Leave request";

/// POST /api/v1/leave-requests
pub async fn create_leave_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidJson(input): ValidJson<CreateLeaveRequest>,
) -> AppResult<Created<LeaveRequestDetail>> {
    ensure_self_or_hr(&state, &user, input.employee_id).await?;

    let request = LeaveRequestRepo::create(&state.pool, &input, input.days()).await?;

    tracing::info!(
        leave_request_id = request.id,
        employee_id = request.employee_id,
        days = request.days,
        "Leave request filed"
    );
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::LEAVE_REQUEST,
        Some(request.id),
        Some(json!({ "leave_type": request.leave_type, "days": request.days })),
    )
    .await;

    let detail = populate::leave_request(&state.pool, request).await?;
    Ok(created(detail, "Leave request submitted"))
}

/// GET /api/v1/leave-requests
///
/// Filters: `employee_id`, `status`, `leave_type`, `from`/`to` on the start
/// date.
pub async fn list_leave_requests(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<LeaveQuery>,
) -> AppResult<JsonResponse<Vec<LeaveRequestDetail>>> {
    let page = params.page_request();
    let rows = LeaveRequestRepo::list(&state.pool, &params, page).await?;
    let total = LeaveRequestRepo::count(&state.pool, &params).await?;
    let data = populate::leave_requests(&state.pool, rows).await?;
    Ok(Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/leave-requests/{id}
pub async fn get_leave_request(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<LeaveRequestDetail>> {
    let request = LeaveRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    Ok(ok(populate::leave_request(&state.pool, request).await?))
}

/// PUT /api/v1/leave-requests/{id}
///
/// Only pending requests can be edited. Status and reviewer fields are not
/// part of the body; they change through approve/reject.
pub async fn update_leave_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateLeaveRequest>,
) -> AppResult<JsonResponse<LeaveRequestDetail>> {
    let current = LeaveRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    ensure_self_or_hr(&state, &user, Some(current.employee_id)).await?;

    if current.status != STATUS_PENDING {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Only pending leave requests can be updated (current status: '{}')",
            current.status
        ))));
    }

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let request = LeaveRequestRepo::update_pending(&state.pool, id, &merged, merged.days())
        .await?
        .ok_or_else(|| status_changed(ENTITY))?;

    tracing::info!(leave_request_id = id, user_id = user.user_id, "Leave request updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::LEAVE_REQUEST,
        Some(id),
        None,
    )
    .await;

    Ok(ok(populate::leave_request(&state.pool, request).await?))
}

/// DELETE /api/v1/leave-requests/{id}
pub async fn delete_leave_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    LeaveRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    if !LeaveRequestRepo::delete(&state.pool, id).await? {
        return Err(not_found(ENTITY, id));
    }

    tracing::info!(leave_request_id = id, user_id = user.user_id, "Leave request deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::LEAVE_REQUEST,
        Some(id),
        None,
    )
    .await;

    Ok(ack("Leave request deleted"))
}

/// POST /api/v1/leave-requests/{id}/approve
pub async fn approve_leave_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    OptionalJson(body): OptionalJson<ReviewAction>,
) -> AppResult<JsonResponse<LeaveRequestDetail>> {
    review(&state, &user, id, STATUS_APPROVED, actions::APPROVE, body).await
}

/// POST /api/v1/leave-requests/{id}/reject
pub async fn reject_leave_request(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    OptionalJson(body): OptionalJson<ReviewAction>,
) -> AppResult<JsonResponse<LeaveRequestDetail>> {
    review(&state, &user, id, STATUS_REJECTED, actions::REJECT, body).await
}

async fn review(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    to: &str,
    action: &str,
    body: ReviewAction,
) -> AppResult<JsonResponse<LeaveRequestDetail>> {
    let current = LeaveRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(ENTITY, id))?;
    ensure_allowed(ENTITY, leave::TRANSITIONS, &current.status, to)?;

    let request = LeaveRequestRepo::review(
        &state.pool,
        id,
        &current.status,
        to,
        user.user_id,
        body.comment.as_deref(),
    )
    .await?
    .ok_or_else(|| status_changed(ENTITY))?;

    tracing::info!(
        leave_request_id = id,
        status = to,
        reviewer = user.user_id,
        "Leave request reviewed"
    );
    audit::record(
        &state.pool,
        &user,
        action,
        entities::LEAVE_REQUEST,
        Some(id),
        Some(json!({ "from": current.status, "to": to, "comment": body.comment })),
    )
    .await;

    Ok(ok(populate::leave_request(&state.pool, request).await?))
}

/// GET /api/v1/leave-requests/stats
pub async fn leave_stats(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(scope): Query<StatsQuery>,
) -> AppResult<JsonResponse<LeaveStats>> {
    let by_status = zero_filled(
        leave::VALID_STATUSES,
        LeaveRequestRepo::count_by_status(&state.pool, &scope).await?,
    );
    let by_type = zero_filled(
        leave::VALID_TYPES,
        LeaveRequestRepo::count_by_type(&state.pool, &scope).await?,
    );
    let approved_days = LeaveRequestRepo::sum_days(&state.pool, &scope, STATUS_APPROVED).await?;

    Ok(ok(LeaveStats {
        total: total(&by_status),
        by_status,
        by_type,
        approved_days,
    }))
}
