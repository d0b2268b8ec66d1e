//! Request handlers, one module per resource.
//!
//! Handlers extract, validate, call repositories and shape the envelope.
//! Domain rules live in `hrms_core`, SQL in `hrms_db`.

pub mod assets;
pub mod attendance;
pub mod audit_logs;
pub mod auth;
pub mod candidates;
pub mod dashboard;
pub mod documents;
pub mod employees;
pub mod job_postings;
pub mod leave_requests;
pub mod salaries;
pub mod separation_requests;
pub mod training_requests;
pub mod trainings;
pub mod users;

use hrms_core::error::CoreError;
use hrms_core::roles::{role_allowed, HR_ROLES};
use hrms_core::types::DbId;
use hrms_db::repositories::EmployeeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// The status guard on a transition or pending-only update matched no row:
/// another request changed the status first.
pub(crate) fn status_changed(entity: &str) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "{entity} status changed concurrently; reload and retry"
    )))
}

/// Employees may only act on their own employee record; HR and admins may
/// act on anyone's.
pub(crate) async fn ensure_self_or_hr(
    state: &AppState,
    user: &AuthUser,
    employee_id: Option<DbId>,
) -> AppResult<()> {
    if role_allowed(&user.role, HR_ROLES) {
        return Ok(());
    }
    let own = EmployeeRepo::find_by_user_id(&state.pool, user.user_id).await?;
    match (own, employee_id) {
        (Some(own), Some(requested)) if own.id == requested => Ok(()),
        _ => Err(AppError::Core(CoreError::Forbidden(
            "Employees may only manage their own requests".into(),
        ))),
    }
}
