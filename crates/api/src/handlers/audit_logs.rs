//! Handlers for the `/admin/audit-logs` resource.
//!
//! Read-only: entries are appended by [`crate::audit::record`], never
//! through the API.

use axum::extract::State;
use axum::Json;
use hrms_db::models::audit::{verify_chain, AuditLog, AuditQuery, IntegrityCheckResult};
use hrms_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::extract::Query;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ok, ApiResponse, JsonResponse};
use crate::state::AppState;

/// GET /api/v1/admin/audit-logs
///
/// Newest first. Filters: `user_id`, `action`, `entity_type`, `entity_id`,
/// `from`, `to`.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AuditQuery>,
) -> AppResult<JsonResponse<Vec<AuditLog>>> {
    let page = params.page_request();
    let entries = AuditLogRepo::query(&state.pool, &params, page).await?;
    let total = AuditLogRepo::count(&state.pool, &params).await?;
    Ok(Json(ApiResponse::page(entries, page, total)))
}

/// GET /api/v1/admin/audit-logs/integrity-check
///
/// Walk the whole chain and report the first entry whose hash no longer
/// matches its content.
pub async fn check_integrity(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<JsonResponse<IntegrityCheckResult>> {
    let chain = AuditLogRepo::fetch_chain(&state.pool).await?;
    let result = verify_chain(&chain);

    if !result.chain_valid {
        tracing::warn!(
            first_break = ?result.first_break,
            verified = result.verified_entries,
            admin_id = admin.user_id,
            "Audit chain integrity check failed"
        );
    }
    Ok(ok(result))
}
