//! Handlers for the `/attendance` resource.
//!
//! `work_hours` is derived from the check-in and check-out times on every
//! write; whatever the client sends for it is ignored.

use axum::extract::{Path, State};
use axum::Json;
use hrms_core::attendance::{AttendanceSummary, VALID_STATUSES};
use hrms_core::audit::{actions, entities};
use hrms_core::stats::{group_by_month, MonthlyCounts};
use hrms_core::types::DbId;
use hrms_db::models::attendance::{
    AttendanceDetail, AttendanceQuery, CreateAttendance, UpdateAttendance,
};
use hrms_db::models::common::StatsQuery;
use hrms_db::populate;
use hrms_db::repositories::AttendanceRepo;
use serde::Serialize;
use serde_json::json;

use super::not_found;
use crate::audit;
use crate::error::AppResult;
use crate::extract::{self, JsonBody, Query, ValidJson};
use crate::middleware::rbac::{RequireAuth, RequireHr};
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

/// Attendance summary for the scope plus the per-month breakdown.
#[derive(Debug, Serialize)]
pub struct AttendanceStats {
    #[serde(flatten)]
    pub summary: AttendanceSummary,
    pub monthly: Vec<MonthlyCounts>,
}

/// POST /api/v1/attendance
pub async fn create_attendance(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    ValidJson(input): ValidJson<CreateAttendance>,
) -> AppResult<Created<AttendanceDetail>> {
    let record =
        AttendanceRepo::create(&state.pool, &input, input.work_hours(), Some(user.user_id))
            .await?;

    tracing::info!(
        attendance_id = record.id,
        employee_id = record.employee_id,
        date = %record.date,
        "Attendance recorded"
    );
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::ATTENDANCE,
        Some(record.id),
        Some(json!({ "employee_id": record.employee_id, "date": record.date, "status": record.status })),
    )
    .await;

    let detail = populate::attendance(&state.pool, record).await?;
    Ok(created(detail, "Attendance recorded"))
}

/// GET /api/v1/attendance
///
/// Filters: `employee_id`, `status`, `from`/`to` on the attendance date.
pub async fn list_attendance(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<AttendanceQuery>,
) -> AppResult<JsonResponse<Vec<AttendanceDetail>>> {
    let page = params.page_request();
    let rows = AttendanceRepo::list(&state.pool, &params, page).await?;
    let total = AttendanceRepo::count(&state.pool, &params).await?;
    let data = populate::attendance_records(&state.pool, rows).await?;
    Ok(Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/attendance/{id}
pub async fn get_attendance(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<AttendanceDetail>> {
    let record = AttendanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Attendance", id))?;
    Ok(ok(populate::attendance(&state.pool, record).await?))
}

/// PUT /api/v1/attendance/{id}
pub async fn update_attendance(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateAttendance>,
) -> AppResult<JsonResponse<AttendanceDetail>> {
    let current = AttendanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Attendance", id))?;

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let record = AttendanceRepo::update(
        &state.pool,
        id,
        &merged,
        merged.work_hours(),
        Some(user.user_id),
    )
    .await?
    .ok_or_else(|| not_found("Attendance", id))?;

    tracing::info!(attendance_id = id, user_id = user.user_id, "Attendance updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::ATTENDANCE,
        Some(id),
        None,
    )
    .await;

    Ok(ok(populate::attendance(&state.pool, record).await?))
}

/// DELETE /api/v1/attendance/{id}
pub async fn delete_attendance(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    AttendanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Attendance", id))?;
    if !AttendanceRepo::delete(&state.pool, id).await? {
        return Err(not_found("Attendance", id));
    }

    tracing::info!(attendance_id = id, user_id = user.user_id, "Attendance deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::ATTENDANCE,
        Some(id),
        None,
    )
    .await;

    Ok(ack("Attendance record deleted"))
}

/// GET /api/v1/attendance/stats
///
/// Scope: optional `employee_id` and `from`/`to` dates. The rate counts a
/// half day as half a present day.
pub async fn attendance_stats(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(scope): Query<StatsQuery>,
) -> AppResult<JsonResponse<AttendanceStats>> {
    let summary = AttendanceSummary::from_rows(
        AttendanceRepo::count_by_status(&state.pool, &scope).await?,
    );
    let monthly = group_by_month(
        VALID_STATUSES,
        AttendanceRepo::count_by_month(&state.pool, &scope).await?,
    );
    Ok(ok(AttendanceStats { summary, monthly }))
}
