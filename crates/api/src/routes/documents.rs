//! Route definitions for the `/documents` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /                        -> list_documents
/// POST   /                        -> upload_document (hr, multipart)
/// GET    /{id}                    -> get_document
/// PUT    /{id}                    -> update_document (hr, metadata only)
/// DELETE /{id}                    -> delete_document (hr)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(documents::list_documents).post(documents::upload_document),
        )
        .route(
            "/{id}",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
}
