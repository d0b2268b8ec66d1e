//! Handlers for the `/auth` resource (login, current user).

use axum::extract::State;
use chrono::Utc;
use hrms_core::audit::{actions, entities};
use hrms_core::error::CoreError;
use hrms_db::models::employee::Employee;
use hrms_db::models::user::UserResponse;
use hrms_db::repositories::{EmployeeRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::audit;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::{AuthUser, ClientIp};
use crate::response::{ok, JsonResponse};
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// The authenticated user plus the employee record linked to it, if any.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub employee: Option<Employee>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password and receive an access token.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip_address): ClientIp,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<JsonResponse<AuthResponse>> {
    // Fail on a missing secret before touching credentials.
    state.config.jwt.signing_secret()?;

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
        }
        return Err(invalid());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    let actor = AuthUser {
        user_id: user.id,
        role: user.role.clone(),
        ip_address,
    };
    audit::record(
        &state.pool,
        &actor,
        actions::LOGIN,
        entities::USER,
        Some(user.id),
        None,
    )
    .await;

    Ok(ok(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserResponse::from(&user),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<JsonResponse<MeResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    let employee = EmployeeRepo::find_by_user_id(&state.pool, user.id).await?;

    Ok(ok(MeResponse {
        user: UserResponse::from(&user),
        employee,
    }))
}
