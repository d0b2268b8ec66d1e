//! Handlers for the `/admin/users` resource (user accounts).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use hrms_core::audit::{actions, entities};
use hrms_core::error::CoreError;
use hrms_core::types::DbId;
use hrms_core::validation::FieldError;
use hrms_db::models::user::{CreateUser, CreateUserRequest, UpdateUser, UserQuery, UserResponse};
use hrms_db::repositories::UserRepo;
use serde_json::json;

use super::not_found;
use crate::audit;
use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::{Query, ValidJson};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

/// Check strength and hash a plaintext password.
fn hashed_password(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(|msg| {
        AppError::Core(CoreError::InvalidFields(vec![FieldError::new("password", msg)]))
    })?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(input): ValidJson<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    let password = input.password.unwrap_or_default();
    let password_hash = hashed_password(&password)?;

    let dto = CreateUser {
        username: input.username.unwrap_or_default(),
        email: input.email.unwrap_or_default(),
        password_hash,
        role: input.role.unwrap_or_default(),
    };
    let user = UserRepo::create(&state.pool, &dto).await?;

    tracing::info!(user_id = user.id, role = %user.role, admin_id = admin.user_id, "User created");
    audit::record(
        &state.pool,
        &admin,
        actions::CREATE,
        entities::USER,
        Some(user.id),
        Some(json!({ "username": user.username, "role": user.role })),
    )
    .await;

    Ok(created(UserResponse::from(&user), "User created"))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserQuery>,
) -> AppResult<JsonResponse<Vec<UserResponse>>> {
    let page = params.page_request();
    let users = UserRepo::list(&state.pool, &params, page).await?;
    let total = UserRepo::count(&state.pool, &params).await?;
    let data = users.iter().map(UserResponse::from).collect();
    Ok(axum::Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("User", id))?;
    Ok(ok(UserResponse::from(&user)))
}

/// PUT /api/v1/admin/users/{id}
///
/// Partial update. A `password` field replaces the password after the
/// strength check.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateUser>,
) -> AppResult<JsonResponse<UserResponse>> {
    if id == admin.user_id && input.is_active == Some(false) {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }

    let password_hash = input.password.as_deref().map(hashed_password).transpose()?;

    let user = UserRepo::update(&state.pool, id, &input, password_hash.as_deref())
        .await?
        .ok_or_else(|| not_found("User", id))?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User updated");
    audit::record(
        &state.pool,
        &admin,
        actions::UPDATE,
        entities::USER,
        Some(id),
        Some(json!({
            "email": input.email,
            "role": input.role,
            "is_active": input.is_active,
            "password_changed": password_hash.is_some(),
        })),
    )
    .await;

    Ok(ok(UserResponse::from(&user)))
}

/// POST /api/v1/admin/users/{id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<UserResponse>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("User", id))?;
    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "User '{}' is already inactive",
            user.username
        ))));
    }

    tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    audit::record(
        &state.pool,
        &admin,
        actions::STATUS_CHANGE,
        entities::USER,
        Some(id),
        Some(json!({ "is_active": false })),
    )
    .await;

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("User", id))?;
    Ok(ok(UserResponse::from(&user)))
}
