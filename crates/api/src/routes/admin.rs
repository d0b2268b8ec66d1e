//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{audit_logs, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users                        -> list_users
/// POST   /users                        -> create_user
/// GET    /users/{id}                   -> get_user
/// PUT    /users/{id}                   -> update_user
/// POST   /users/{id}/deactivate        -> deactivate_user
/// GET    /audit-logs                   -> list_audit_logs
/// GET    /audit-logs/integrity-check   -> check_integrity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user).put(users::update_user))
        .route("/users/{id}/deactivate", post(users::deactivate_user))
        .route("/audit-logs", get(audit_logs::list_audit_logs))
        .route(
            "/audit-logs/integrity-check",
            get(audit_logs::check_integrity),
        )
}
