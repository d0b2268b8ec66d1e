//! Audit log entity models and DTOs.
//!
//! Audit logs have no `updated_at` field (immutable records).

use hrms_core::audit::{canonical_entry, compute_integrity_hash};
use hrms_core::pagination::PageRequest;
use hrms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details_json: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub integrity_hash: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending an audit log entry. The timestamp and integrity hash
/// are assigned by [`AuditLogRepo::append`](crate::repositories::AuditLogRepo::append).
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details_json: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}

/// Filter parameters for querying audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub user_id: Option<DbId>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

impl AuditQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Result of an audit log integrity verification.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityCheckResult {
    /// Number of entries verified.
    pub verified_entries: i64,
    /// Whether the entire chain is valid.
    pub chain_valid: bool,
    /// ID of the first entry where the chain breaks, if any.
    pub first_break: Option<DbId>,
}

/// Recompute the hash chain over `entries` (ordered by id ascending) and
/// report the first entry whose stored hash does not match.
pub fn verify_chain(entries: &[AuditLog]) -> IntegrityCheckResult {
    let mut prev: Option<&str> = None;
    for entry in entries {
        let data = canonical_entry(
            entry.created_at,
            entry.user_id,
            &entry.action,
            &entry.entity_type,
            entry.entity_id,
        );
        let expected = compute_integrity_hash(prev, &data);
        if entry.integrity_hash.as_deref() != Some(expected.as_str()) {
            return IntegrityCheckResult {
                verified_entries: entries.len() as i64,
                chain_valid: false,
                first_break: Some(entry.id),
            };
        }
        prev = entry.integrity_hash.as_deref();
    }
    IntegrityCheckResult {
        verified_entries: entries.len() as i64,
        chain_valid: true,
        first_break: None,
    }
}
