//! Route definitions for `/job-postings` and `/candidates`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{candidates, job_postings};
use crate::state::AppState;

/// Routes mounted at `/job-postings`.
///
/// ```text
/// GET    /                        -> list_job_postings
/// POST   /                        -> create_job_posting (hr)
/// GET    /{id}                    -> get_job_posting
/// PUT    /{id}                    -> update_job_posting (hr)
/// DELETE /{id}                    -> delete_job_posting (hr)
/// ```
pub fn postings_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(job_postings::list_job_postings).post(job_postings::create_job_posting),
        )
        .route(
            "/{id}",
            get(job_postings::get_job_posting)
                .put(job_postings::update_job_posting)
                .delete(job_postings::delete_job_posting),
        )
}

/// Routes mounted at `/candidates`. Every route requires HR or admin.
///
/// ```text
/// GET    /                        -> list_candidates
/// POST   /                        -> create_candidate
/// GET    /stats                   -> candidate_stats
/// GET    /{id}                    -> get_candidate
/// PUT    /{id}                    -> update_candidate
/// DELETE /{id}                    -> delete_candidate
/// PUT    /{id}/status             -> update_candidate_status
/// ```
pub fn candidates_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route("/stats", get(candidates::candidate_stats))
        .route(
            "/{id}",
            get(candidates::get_candidate)
                .put(candidates::update_candidate)
                .delete(candidates::delete_candidate),
        )
        .route("/{id}/status", put(candidates::update_candidate_status))
}
