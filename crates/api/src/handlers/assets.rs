//! Handlers for the `/assets` resource (company equipment).
//!
//! Every write runs the assignment rules: setting an assignee fills
//! `assigned_at` when missing and clearing it clears the timestamp, with the
//! status following along.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use hrms_core::asset::{reconcile_assignment, VALID_CATEGORIES, VALID_STATUSES};
use hrms_core::audit::{actions, entities};
use hrms_core::stats::{total, zero_filled};
use hrms_core::types::DbId;
use hrms_db::models::asset::{AssetDetail, AssetQuery, AssetStats, CreateAsset, UpdateAsset};
use hrms_db::populate;
use hrms_db::repositories::AssetRepo;
use serde_json::json;

use super::not_found;
use crate::audit;
use crate::error::AppResult;
use crate::extract::{self, JsonBody, Query, ValidJson};
use crate::middleware::rbac::{RequireAuth, RequireHr};
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

/// POST /api/v1/assets
pub async fn create_asset(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    ValidJson(input): ValidJson<CreateAsset>,
) -> AppResult<Created<AssetDetail>> {
    let assignment = reconcile_assignment(
        input.assigned_to,
        input.assigned_at,
        input.status_or_default(),
        Utc::now(),
    );
    let asset = AssetRepo::create(&state.pool, &input, &assignment).await?;

    tracing::info!(
        asset_id = asset.id,
        serial = %asset.serial_number,
        status = %asset.status,
        "Asset registered"
    );
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::ASSET,
        Some(asset.id),
        Some(json!({ "serial_number": asset.serial_number, "assigned_to": asset.assigned_to })),
    )
    .await;

    let detail = populate::asset(&state.pool, asset).await?;
    Ok(created(detail, "Asset created"))
}

/// GET /api/v1/assets
///
/// Filters: `category`, `status`, `assigned_to`, `search` (name, serial).
pub async fn list_assets(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<AssetQuery>,
) -> AppResult<JsonResponse<Vec<AssetDetail>>> {
    let page = params.page_request();
    let rows = AssetRepo::list(&state.pool, &params, page).await?;
    let total = AssetRepo::count(&state.pool, &params).await?;
    let data = populate::assets(&state.pool, rows).await?;
    Ok(Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<AssetDetail>> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Asset", id))?;
    Ok(ok(populate::asset(&state.pool, asset).await?))
}

/// PUT /api/v1/assets/{id}
pub async fn update_asset(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateAsset>,
) -> AppResult<JsonResponse<AssetDetail>> {
    let current = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Asset", id))?;

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let assignment = reconcile_assignment(
        merged.assigned_to,
        merged.assigned_at,
        merged.status_or_default(),
        Utc::now(),
    );
    let asset = AssetRepo::update(&state.pool, id, &merged, &assignment)
        .await?
        .ok_or_else(|| not_found("Asset", id))?;

    tracing::info!(asset_id = id, status = %asset.status, "Asset updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::ASSET,
        Some(id),
        Some(json!({
            "assigned_to": asset.assigned_to,
            "previous_assignee": current.assigned_to,
            "status": asset.status,
        })),
    )
    .await;

    Ok(ok(populate::asset(&state.pool, asset).await?))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete_asset(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Asset", id))?;
    if !AssetRepo::delete(&state.pool, id).await? {
        return Err(not_found("Asset", id));
    }

    tracing::info!(asset_id = id, user_id = user.user_id, "Asset deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::ASSET,
        Some(id),
        None,
    )
    .await;

    Ok(ack("Asset deleted"))
}

/// GET /api/v1/assets/stats
pub async fn asset_stats(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<JsonResponse<AssetStats>> {
    let by_status = zero_filled(VALID_STATUSES, AssetRepo::count_by_status(&state.pool).await?);
    let by_category = zero_filled(
        VALID_CATEGORIES,
        AssetRepo::count_by_category(&state.pool).await?,
    );
    Ok(ok(AssetStats {
        total: total(&by_status),
        by_status,
        by_category,
    }))
}
