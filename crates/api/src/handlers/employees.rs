//! Handlers for the `/employees` resource.
//!
//! Reads are open to any authenticated user; writes require HR or admin.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use hrms_core::audit::{actions, entities};
use hrms_core::employee::VALID_STATUSES;
use hrms_core::stats::{total, zero_filled, StatusCounts};
use hrms_core::types::DbId;
use hrms_db::models::employee::{CreateEmployee, EmployeeDetail, EmployeeQuery, UpdateEmployee};
use hrms_db::populate;
use hrms_db::repositories::EmployeeRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::not_found;
use crate::audit;
use crate::error::AppResult;
use crate::extract::{self, JsonBody, Query, ValidJson};
use crate::middleware::rbac::{RequireAuth, RequireHr};
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;
use crate::upload::{read_multipart, remove_stored, store_image};

/// Upload subdirectory for employee photos.
const PHOTO_DIR: &str = "photos";

/// Query parameters for `GET /employees/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeStatsQuery {
    pub department: Option<String>,
}

/// Headcount by status and by department.
#[derive(Debug, Serialize)]
pub struct EmployeeStats {
    pub by_status: StatusCounts,
    pub by_department: StatusCounts,
    pub total: i64,
}

/// POST /api/v1/employees
pub async fn create_employee(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    ValidJson(input): ValidJson<CreateEmployee>,
) -> AppResult<Created<EmployeeDetail>> {
    let employee = EmployeeRepo::create(&state.pool, &input).await?;

    tracing::info!(
        employee_id = employee.id,
        code = %employee.employee_code,
        user_id = user.user_id,
        "Employee created"
    );
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::EMPLOYEE,
        Some(employee.id),
        Some(json!({ "employee_code": employee.employee_code })),
    )
    .await;

    let detail = populate::employee(&state.pool, employee).await?;
    Ok(created(detail, "Employee created"))
}

/// GET /api/v1/employees
///
/// Filters: `department`, `status`, `search`, `from`/`to` on hire date.
pub async fn list_employees(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<EmployeeQuery>,
) -> AppResult<JsonResponse<Vec<EmployeeDetail>>> {
    let page = params.page_request();
    let rows = EmployeeRepo::list(&state.pool, &params, page).await?;
    let total = EmployeeRepo::count(&state.pool, &params).await?;
    let data = populate::employees(&state.pool, rows).await?;
    Ok(Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/employees/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<EmployeeDetail>> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Employee", id))?;
    Ok(ok(populate::employee(&state.pool, employee).await?))
}

/// PUT /api/v1/employees/{id}
pub async fn update_employee(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateEmployee>,
) -> AppResult<JsonResponse<EmployeeDetail>> {
    let current = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Employee", id))?;

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let employee = EmployeeRepo::update(&state.pool, id, &merged)
        .await?
        .ok_or_else(|| not_found("Employee", id))?;

    tracing::info!(employee_id = id, user_id = user.user_id, "Employee updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::EMPLOYEE,
        Some(id),
        None,
    )
    .await;

    Ok(ok(populate::employee(&state.pool, employee).await?))
}

/// DELETE /api/v1/employees/{id}
///
/// Blocked with a conflict while attendance, requests, salaries, documents
/// or assets still reference the employee.
pub async fn delete_employee(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Employee", id))?;

    if !EmployeeRepo::delete(&state.pool, id).await? {
        return Err(not_found("Employee", id));
    }
    if let Some(photo) = employee.photo_path.as_deref() {
        remove_stored(&state.config.upload_dir, photo).await;
    }

    tracing::info!(employee_id = id, user_id = user.user_id, "Employee deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::EMPLOYEE,
        Some(id),
        Some(json!({ "employee_code": employee.employee_code })),
    )
    .await;

    Ok(ack("Employee deleted"))
}

/// POST /api/v1/employees/{id}/photo
///
/// Multipart upload with a single `file` part; replaces any previous photo.
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<JsonResponse<EmployeeDetail>> {
    let current = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Employee", id))?;

    let form = read_multipart(multipart).await?;
    let file = form.require_file()?;
    let stored = store_image(&state.config.upload_dir, PHOTO_DIR, "photo", file).await?;

    let employee = match EmployeeRepo::set_photo(&state.pool, id, &stored.file_path).await {
        Ok(Some(employee)) => employee,
        Ok(None) => {
            remove_stored(&state.config.upload_dir, &stored.file_path).await;
            return Err(not_found("Employee", id));
        }
        Err(e) => {
            remove_stored(&state.config.upload_dir, &stored.file_path).await;
            return Err(e.into());
        }
    };
    if let Some(old) = current.photo_path.as_deref() {
        remove_stored(&state.config.upload_dir, old).await;
    }

    tracing::info!(employee_id = id, path = %stored.file_path, "Employee photo uploaded");
    audit::record(
        &state.pool,
        &user,
        actions::UPLOAD,
        entities::EMPLOYEE,
        Some(id),
        Some(json!({ "photo_path": stored.file_path, "size_bytes": stored.size_bytes })),
    )
    .await;

    Ok(ok(populate::employee(&state.pool, employee).await?))
}

/// GET /api/v1/employees/stats
pub async fn employee_stats(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<EmployeeStatsQuery>,
) -> AppResult<JsonResponse<EmployeeStats>> {
    let department = params.department.as_deref();
    let by_status = zero_filled(
        VALID_STATUSES,
        EmployeeRepo::count_by_status(&state.pool, department).await?,
    );
    let by_department: StatusCounts = EmployeeRepo::count_by_department(&state.pool)
        .await?
        .into_iter()
        .filter(|(name, _)| department.map_or(true, |d| d == name))
        .collect();

    Ok(ok(EmployeeStats {
        total: total(&by_status),
        by_status,
        by_department,
    }))
}
