//! Repository for the `attendance` table.

use hrms_core::pagination::PageRequest;
use hrms_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::attendance::{Attendance, AttendanceQuery, CreateAttendance};
use crate::models::common::StatsQuery;

const COLUMNS: &str = "id, employee_id, date, check_in, check_out, status, work_hours, \
                       notes, checked_by, created_at, updated_at";

pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Insert a validated record. `work_hours` is derived by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAttendance,
        work_hours: Option<f64>,
        checked_by: Option<DbId>,
    ) -> Result<Attendance, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance
                (employee_id, date, check_in, check_out, status, work_hours, notes, checked_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(input.employee_id)
            .bind(input.date)
            .bind(input.check_in)
            .bind(input.check_out)
            .bind(&input.status)
            .bind(work_hours)
            .bind(&input.notes)
            .bind(checked_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Attendance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendance WHERE id = $1");
        sqlx::query_as::<_, Attendance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List records matching the filter, most recent day first.
    pub async fn list(
        pool: &PgPool,
        params: &AttendanceQuery,
        page: PageRequest,
    ) -> Result<Vec<Attendance>, sqlx::Error> {
        let filter = build_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM attendance {} \
             ORDER BY date DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, Attendance>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &AttendanceQuery) -> Result<i64, sqlx::Error> {
        let filter = build_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM attendance {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Overwrite the record with the merged, validated values.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateAttendance,
        work_hours: Option<f64>,
        checked_by: Option<DbId>,
    ) -> Result<Option<Attendance>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance SET
                employee_id = $2,
                date = $3,
                check_in = $4,
                check_out = $5,
                status = $6,
                work_hours = $7,
                notes = $8,
                checked_by = COALESCE($9, checked_by)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(id)
            .bind(input.employee_id)
            .bind(input.date)
            .bind(input.check_in)
            .bind(input.check_out)
            .bind(&input.status)
            .bind(work_hours)
            .bind(&input.notes)
            .bind(checked_by)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `(status, count)` within the stats scope.
    pub async fn count_by_status(
        pool: &PgPool,
        scope: &StatsQuery,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let filter = build_stats_filter(scope);
        let query = format!(
            "SELECT status, COUNT(*)::BIGINT FROM attendance {} GROUP BY status",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, i64)>(&query))
            .fetch_all(pool)
            .await
    }

    /// `(YYYY-MM, status, count)` within the stats scope.
    pub async fn count_by_month(
        pool: &PgPool,
        scope: &StatsQuery,
    ) -> Result<Vec<(String, String, i64)>, sqlx::Error> {
        let filter = build_stats_filter(scope);
        let query = format!(
            "SELECT to_char(date, 'YYYY-MM') AS month, status, COUNT(*)::BIGINT \
             FROM attendance {} GROUP BY month, status",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, String, i64)>(&query))
            .fetch_all(pool)
            .await
    }

    /// `(status, count)` for a single day across all employees.
    pub async fn count_for_day(
        pool: &PgPool,
        day: Date,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*)::BIGINT FROM attendance WHERE date = $1 GROUP BY status",
        )
        .bind(day)
        .fetch_all(pool)
        .await
    }
}

fn build_filter(params: &AttendanceQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("employee_id", params.employee_id)
        .eq_text("status", params.status.as_deref())
        .date_from("date", params.from)
        .date_to("date", params.to);
    filter
}

fn build_stats_filter(scope: &StatsQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("employee_id", scope.employee_id)
        .date_from("date", scope.from)
        .date_to("date", scope.to);
    filter
}
