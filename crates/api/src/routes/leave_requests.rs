//! Route definitions for the `/leave-requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::leave_requests;
use crate::state::AppState;

/// Routes mounted at `/leave-requests`.
///
/// ```text
/// GET    /                        -> list_leave_requests
/// POST   /                        -> create_leave_request (own record or hr)
/// GET    /stats                   -> leave_stats
/// GET    /{id}                    -> get_leave_request
/// PUT    /{id}                    -> update_leave_request (pending only)
/// DELETE /{id}                    -> delete_leave_request (hr)
/// POST   /{id}/approve            -> approve_leave_request (hr)
/// POST   /{id}/reject             -> reject_leave_request (hr)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(leave_requests::list_leave_requests).post(leave_requests::create_leave_request),
        )
        .route("/stats", get(leave_requests::leave_stats))
        .route(
            "/{id}",
            get(leave_requests::get_leave_request)
                .put(leave_requests::update_leave_request)
                .delete(leave_requests::delete_leave_request),
        )
        .route("/{id}/approve", post(leave_requests::approve_leave_request))
        .route("/{id}/reject", post(leave_requests::reject_leave_request))
}
