//! Route definitions for the `/attendance` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// GET    /                        -> list_attendance
/// POST   /                        -> create_attendance (hr)
/// GET    /stats                   -> attendance_stats
/// GET    /{id}                    -> get_attendance
/// PUT    /{id}                    -> update_attendance (hr)
/// DELETE /{id}                    -> delete_attendance (hr)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(attendance::list_attendance).post(attendance::create_attendance),
        )
        .route("/stats", get(attendance::attendance_stats))
        .route(
            "/{id}",
            get(attendance::get_attendance)
                .put(attendance::update_attendance)
                .delete(attendance::delete_attendance),
        )
}
