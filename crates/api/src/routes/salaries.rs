//! Route definitions for the `/salaries` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::salaries;
use crate::state::AppState;

/// Routes mounted at `/salaries`. Every route requires HR or admin.
///
/// ```text
/// GET    /                        -> list_salaries
/// POST   /                        -> create_salary
/// GET    /stats                   -> salary_stats
/// GET    /{id}                    -> get_salary
/// PUT    /{id}                    -> update_salary (pending only)
/// DELETE /{id}                    -> delete_salary
/// POST   /{id}/pay                -> pay_salary
/// POST   /{id}/cancel             -> cancel_salary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(salaries::list_salaries).post(salaries::create_salary))
        .route("/stats", get(salaries::salary_stats))
        .route(
            "/{id}",
            get(salaries::get_salary)
                .put(salaries::update_salary)
                .delete(salaries::delete_salary),
        )
        .route("/{id}/pay", post(salaries::pay_salary))
        .route("/{id}/cancel", post(salaries::cancel_salary))
}
