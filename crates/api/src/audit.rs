//! Best-effort audit trail for successful mutations.
//!
//! Handlers call [`record`] after the write has succeeded. A failure to
//! append the entry is logged and swallowed so it never changes the
//! response the client sees.

use hrms_core::audit::redact_sensitive_fields;
use hrms_core::types::DbId;
use hrms_db::models::audit::CreateAuditLog;
use hrms_db::repositories::AuditLogRepo;
use hrms_db::DbPool;
use serde_json::Value;

use crate::middleware::auth::AuthUser;

/// Append one entry to the audit hash chain, attributed to `actor` and the
/// address their request came from.
pub async fn record(
    pool: &DbPool,
    actor: &AuthUser,
    action: &str,
    entity_type: &str,
    entity_id: Option<DbId>,
    details: Option<Value>,
) {
    let entry = CreateAuditLog {
        user_id: Some(actor.user_id),
        action: action.to_string(),
        entity_type: entity_type.to_string(),
        entity_id,
        details_json: details.as_ref().map(redact_sensitive_fields),
        ip_address: actor.ip_address.clone(),
    };

    if let Err(e) = AuditLogRepo::append(pool, &entry).await {
        tracing::warn!(
            error = %e,
            action,
            entity_type,
            entity_id,
            "Failed to write audit log entry"
        );
    }
}
