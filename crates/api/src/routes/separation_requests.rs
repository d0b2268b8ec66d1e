//! Route definitions for the `/separation-requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::separation_requests as separation;
use crate::state::AppState;

/// Routes mounted at `/separation-requests`.
///
/// ```text
/// GET    /                        -> list_separation_requests
/// POST   /                        -> create_separation_request (own record or hr)
/// GET    /stats                   -> separation_stats
/// GET    /{id}                    -> get_separation_request
/// PUT    /{id}                    -> update_separation_request (pending only)
/// DELETE /{id}                    -> delete_separation_request (hr)
/// POST   /{id}/approve            -> approve_separation_request (hr)
/// POST   /{id}/reject             -> reject_separation_request (hr)
/// POST   /{id}/process            -> process_separation_request (hr)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(separation::list_separation_requests).post(separation::create_separation_request),
        )
        .route("/stats", get(separation::separation_stats))
        .route(
            "/{id}",
            get(separation::get_separation_request)
                .put(separation::update_separation_request)
                .delete(separation::delete_separation_request),
        )
        .route("/{id}/approve", post(separation::approve_separation_request))
        .route("/{id}/reject", post(separation::reject_separation_request))
        .route("/{id}/process", post(separation::process_separation_request))
}
