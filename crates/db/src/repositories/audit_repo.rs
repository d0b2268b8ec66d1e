//! Repository for the append-only `audit_logs` table.

use chrono::{SubsecRound, Utc};
use hrms_core::audit::{canonical_entry, compute_integrity_hash};
use hrms_core::pagination::PageRequest;
use sqlx::{PgExecutor, PgPool};

use crate::filter::Filter;
use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "id, user_id, action, entity_type, entity_id, details_json, \
                       ip_address, integrity_hash, created_at";

/// Advisory lock key serialising writers of the hash chain.
const CHAIN_LOCK_KEY: i64 = 0x4852_4d53_4155_4454;

/// Provides append and query operations for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append an entry to the hash chain.
    ///
    /// The previous hash is read and the new row inserted under a
    /// transaction-scoped advisory lock so concurrent writers cannot fork
    /// the chain. The timestamp is truncated to microseconds so the value
    /// hashed here is exactly the value PostgreSQL stores.
    pub async fn append(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CHAIN_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let prev_hash = Self::find_last_hash(&mut *tx).await?;

        let created_at = Utc::now().trunc_subsecs(6);
        let data = canonical_entry(
            created_at,
            entry.user_id,
            &entry.action,
            &entry.entity_type,
            entry.entity_id,
        );
        let integrity_hash = compute_integrity_hash(prev_hash.as_deref(), &data);

        let query = format!(
            "INSERT INTO audit_logs
                (user_id, action, entity_type, entity_id, details_json, ip_address,
                 integrity_hash, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let log = sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.details_json)
            .bind(&entry.ip_address)
            .bind(&integrity_hash)
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(log)
    }

    /// Query audit logs with filtering and pagination, newest first.
    pub async fn query(
        pool: &PgPool,
        params: &AuditQuery,
        page: PageRequest,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let filter = build_audit_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, AuditLog>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count audit logs matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let filter = build_audit_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM audit_logs {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Find the integrity hash of the most recent audit log entry.
    pub async fn find_last_hash<'e, E>(executor: E) -> Result<Option<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT integrity_hash FROM audit_logs ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(executor)
        .await
        .map(|opt| opt.flatten())
    }

    /// Every entry ordered by id ASC for sequential hash chain checking.
    pub async fn fetch_chain(pool: &PgPool) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audit_logs ORDER BY id ASC");
        sqlx::query_as::<_, AuditLog>(&query).fetch_all(pool).await
    }
}

/// Build the filter for `AuditQuery` parameters.
fn build_audit_filter(params: &AuditQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("user_id", params.user_id)
        .eq_text("action", params.action.as_deref())
        .eq_text("entity_type", params.entity_type.as_deref())
        .eq_id("entity_id", params.entity_id)
        .since("created_at", params.from)
        .until("created_at", params.to);
    filter
}
