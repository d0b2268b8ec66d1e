//! Route definitions for `/trainings` and `/training-requests`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{training_requests, trainings};
use crate::state::AppState;

/// Routes mounted at `/trainings`.
///
/// ```text
/// GET    /                        -> list_trainings
/// POST   /                        -> create_training (hr)
/// GET    /stats                   -> training_stats
/// GET    /{id}                    -> get_training
/// PUT    /{id}                    -> update_training (hr)
/// DELETE /{id}                    -> delete_training (hr)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(trainings::list_trainings).post(trainings::create_training),
        )
        .route("/stats", get(trainings::training_stats))
        .route(
            "/{id}",
            get(trainings::get_training)
                .put(trainings::update_training)
                .delete(trainings::delete_training),
        )
}

/// Routes mounted at `/training-requests`.
///
/// ```text
/// GET    /                        -> list_training_requests
/// POST   /                        -> create_training_request (own record or hr)
/// GET    /{id}                    -> get_training_request
/// PUT    /{id}                    -> update_training_request (notes)
/// DELETE /{id}                    -> delete_training_request (hr)
/// POST   /{id}/approve            -> approve_training_request (hr, capacity checked)
/// POST   /{id}/reject             -> reject_training_request (hr)
/// POST   /{id}/complete           -> complete_training_request (hr)
/// ```
pub fn requests_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(training_requests::list_training_requests)
                .post(training_requests::create_training_request),
        )
        .route(
            "/{id}",
            get(training_requests::get_training_request)
                .put(training_requests::update_training_request)
                .delete(training_requests::delete_training_request),
        )
        .route("/{id}/approve", post(training_requests::approve_training_request))
        .route("/{id}/reject", post(training_requests::reject_training_request))
        .route("/{id}/complete", post(training_requests::complete_training_request))
}
