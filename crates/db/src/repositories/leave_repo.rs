//! Repository for the `leave_requests` table.

use hrms_core::leave::STATUS_PENDING;
use hrms_core::pagination::PageRequest;
use hrms_core::types::DbId;
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::common::StatsQuery;
use crate::models::leave::{CreateLeaveRequest, LeaveQuery, LeaveRequest};

const COLUMNS: &str = "id, employee_id, leave_type, start_date, end_date, days, reason, \
                       status, reviewed_by, reviewed_at, review_comment, created_at, updated_at";

pub struct LeaveRequestRepo;

impl LeaveRequestRepo {
    /// Insert a new pending request. `days` is derived by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLeaveRequest,
        days: Option<i32>,
    ) -> Result<LeaveRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO leave_requests
                (employee_id, leave_type, start_date, end_date, days, reason, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(input.employee_id)
            .bind(&input.leave_type)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(days)
            .bind(&input.reason)
            .bind(STATUS_PENDING)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LeaveRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leave_requests WHERE id = $1");
        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &LeaveQuery,
        page: PageRequest,
    ) -> Result<Vec<LeaveRequest>, sqlx::Error> {
        let filter = build_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM leave_requests {} \
             ORDER BY start_date DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, LeaveRequest>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &LeaveQuery) -> Result<i64, sqlx::Error> {
        let filter = build_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM leave_requests {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Rewrite the editable fields of a request that is still pending.
    ///
    /// Returns `None` if the row is missing or no longer pending.
    pub async fn update_pending(
        pool: &PgPool,
        id: DbId,
        input: &CreateLeaveRequest,
        days: Option<i32>,
    ) -> Result<Option<LeaveRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE leave_requests SET
                leave_type = $2,
                start_date = $3,
                end_date = $4,
                days = $5,
                reason = $6
             WHERE id = $1 AND status = $7
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(id)
            .bind(&input.leave_type)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(days)
            .bind(&input.reason)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Move a request from `from` to `to`, recording the reviewer.
    ///
    /// The status guard makes concurrent reviews race safely: only one
    /// succeeds, the others get `None`.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        reviewer: DbId,
        comment: Option<&str>,
    ) -> Result<Option<LeaveRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE leave_requests SET
                status = $3,
                reviewed_by = $4,
                reviewed_at = NOW(),
                review_comment = $5
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(reviewer)
            .bind(comment)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = $1")
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
            "SELECT status, COUNT(*)::BIGINT FROM leave_requests {} GROUP BY status",
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
            "SELECT leave_type, COUNT(*)::BIGINT FROM leave_requests {} GROUP BY leave_type",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, i64)>(&query))
            .fetch_all(pool)
            .await
    }

    /// Total days across requests with the given status.
    pub async fn sum_days(
        pool: &PgPool,
        scope: &StatsQuery,
        status: &str,
    ) -> Result<i64, sqlx::Error> {
        let mut filter = build_stats_filter(scope);
        filter.eq_text("status", Some(status));
        let query = format!(
            "SELECT COALESCE(SUM(days), 0)::BIGINT FROM leave_requests {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }
}

fn build_filter(params: &LeaveQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("employee_id", params.employee_id)
        .eq_text("status", params.status.as_deref())
        .eq_text("leave_type", params.leave_type.as_deref())
        .date_from("start_date", params.from)
        .date_to("start_date", params.to);
    filter
}

fn build_stats_filter(scope: &StatsQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("employee_id", scope.employee_id)
        .date_from("start_date", scope.from)
        .date_to("start_date", scope.to);
    filter
}
