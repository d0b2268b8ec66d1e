//! Audit logging constants and utility functions.
//!
//! Entries form a hash chain: each entry's integrity hash covers its own
//! canonical content plus the previous entry's hash.

use crate::hashing;
use crate::types::{DbId, Timestamp};

/// Known action types for audit log entries.
pub mod actions {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const APPROVE: &str = "approve";
    pub const REJECT: &str = "reject";
    pub const PROCESS: &str = "process";
    pub const STATUS_CHANGE: &str = "status_change";
    pub const LOGIN: &str = "login";
    pub const UPLOAD: &str = "upload";
}

/// Entity type names recorded in `audit_logs.entity_type`.
pub mod entities {
    pub const USER: &str = "user";
    pub const EMPLOYEE: &str = "employee";
    pub const ATTENDANCE: &str = "attendance";
    pub const LEAVE_REQUEST: &str = "leave_request";
    pub const SEPARATION_REQUEST: &str = "separation_request";
    pub const TRAINING: &str = "training";
    pub const TRAINING_REQUEST: &str = "training_request";
    pub const SALARY: &str = "salary";
    pub const DOCUMENT: &str = "document";
    pub const ASSET: &str = "asset";
    pub const JOB_POSTING: &str = "job_posting";
    pub const CANDIDATE: &str = "candidate";
}

/// Known seed value for the first entry in the hash chain.
const CHAIN_SEED: &str = "HRMS_AUDIT_CHAIN_SEED_V1";

/// Canonical string for an entry's hashed content.
pub fn canonical_entry(
    timestamp: Timestamp,
    user_id: Option<DbId>,
    action: &str,
    entity_type: &str,
    entity_id: Option<DbId>,
) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        timestamp.to_rfc3339(),
        user_id.map_or(String::new(), |id| id.to_string()),
        action,
        entity_type,
        entity_id.map_or(String::new(), |id| id.to_string()),
    )
}

/// SHA-256 integrity hash chained to `prev_hash` (or the seed for the first entry).
pub fn compute_integrity_hash(prev_hash: Option<&str>, entry_data: &str) -> String {
    let prev = prev_hash.unwrap_or(CHAIN_SEED);
    hashing::sha256_hex(format!("{prev}|{entry_data}").as_bytes())
}

/// Keys whose values never reach the audit log.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "authorization",
    "credential",
];

/// Replace the value of any key containing a [`SENSITIVE_FIELDS`] entry
/// with `"[REDACTED]"`, recursively.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
