//! Route definitions for the `/assets` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /                        -> list_assets
/// POST   /                        -> create_asset (hr)
/// GET    /stats                   -> asset_stats
/// GET    /{id}                    -> get_asset
/// PUT    /{id}                    -> update_asset (hr)
/// DELETE /{id}                    -> delete_asset (hr)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route("/stats", get(assets::asset_stats))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
}
