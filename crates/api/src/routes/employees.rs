//! Route definitions for the `/employees` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::employees;
use crate::state::AppState;

/// Routes mounted at `/employees`.
///
/// ```text
/// GET    /                        -> list_employees
/// POST   /                        -> create_employee (hr)
/// GET    /stats                   -> employee_stats
/// GET    /{id}                    -> get_employee
/// PUT    /{id}                    -> update_employee (hr)
/// DELETE /{id}                    -> delete_employee (hr)
/// POST   /{id}/photo              -> upload_photo (hr, multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route("/stats", get(employees::employee_stats))
        .route(
            "/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/{id}/photo", post(employees::upload_photo))
}
