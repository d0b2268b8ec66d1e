//! Repository for the `separation_requests` table.

use hrms_core::pagination::PageRequest;
use hrms_core::separation::STATUS_PENDING;
use hrms_core::types::DbId;
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::common::StatsQuery;
use crate::models::separation::{CreateSeparationRequest, SeparationQuery, SeparationRequest};

const COLUMNS: &str = "id, employee_id, separation_type, reason, notice_date, \
                       last_working_day, status, processed_by, processed_at, remarks, \
                       created_at, updated_at";

pub struct SeparationRequestRepo;

impl SeparationRequestRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSeparationRequest,
    ) -> Result<SeparationRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO separation_requests
                (employee_id, separation_type, reason, notice_date, last_working_day, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SeparationRequest>(&query)
            .bind(input.employee_id)
            .bind(&input.separation_type)
            .bind(&input.reason)
            .bind(input.notice_date)
            .bind(input.last_working_day)
            .bind(STATUS_PENDING)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SeparationRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM separation_requests WHERE id = $1");
        sqlx::query_as::<_, SeparationRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &SeparationQuery,
        page: PageRequest,
    ) -> Result<Vec<SeparationRequest>, sqlx::Error> {
        let filter = build_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM separation_requests {} \
             ORDER BY last_working_day DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, SeparationRequest>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &SeparationQuery) -> Result<i64, sqlx::Error> {
        let filter = build_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM separation_requests {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Rewrite the editable fields of a request that is still pending.
    pub async fn update_pending(
        pool: &PgPool,
        id: DbId,
        input: &CreateSeparationRequest,
    ) -> Result<Option<SeparationRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE separation_requests SET
                separation_type = $2,
                reason = $3,
                notice_date = $4,
                last_working_day = $5
             WHERE id = $1 AND status = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SeparationRequest>(&query)
            .bind(id)
            .bind(&input.separation_type)
            .bind(&input.reason)
            .bind(input.notice_date)
            .bind(input.last_working_day)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Move a request from `from` to `to`, recording who acted. Remarks are
    /// only overwritten when new ones are supplied.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        actor: DbId,
        remarks: Option<&str>,
    ) -> Result<Option<SeparationRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE separation_requests SET
                status = $3,
                processed_by = $4,
                processed_at = NOW(),
                remarks = COALESCE($5, remarks)
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SeparationRequest>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(actor)
            .bind(remarks)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM separation_requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_status(
        pool: &PgPool,
        scope: &StatsQuery,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let filter = build_stats_filter(scope);
        let query = format!(
            "SELECT status, COUNT(*)::BIGINT FROM separation_requests {} GROUP BY status",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, i64)>(&query))
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_type(
        pool: &PgPool,
        scope: &StatsQuery,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let filter = build_stats_filter(scope);
        let query = format!(
            "SELECT separation_type, COUNT(*)::BIGINT FROM separation_requests {} \
             GROUP BY separation_type",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, i64)>(&query))
            .fetch_all(pool)
            .await
    }
}

fn build_filter(params: &SeparationQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("employee_id", params.employee_id)
        .eq_text("status", params.status.as_deref())
        .eq_text("separation_type", params.separation_type.as_deref())
        .date_from("last_working_day", params.from)
        .date_to("last_working_day", params.to);
    filter
}

fn build_stats_filter(scope: &StatsQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("employee_id", scope.employee_id)
        .date_from("last_working_day", scope.from)
        .date_to("last_working_day", scope.to);
    filter
}
