//! Repositories for the `trainings` and `training_requests` tables.

use hrms_core::pagination::PageRequest;
use hrms_core::training::{REQUEST_APPROVED, REQUEST_PENDING, STATUS_SCHEDULED};
use hrms_core::types::DbId;
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::common::StatsQuery;
use crate::models::training::{
    CreateTraining, CreateTrainingRequest, Training, TrainingQuery, TrainingRequest,
    TrainingRequestQuery,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "id, title, description, trainer, start_date, end_date, location, \
                       capacity, status, created_at, updated_at";

const REQUEST_COLUMNS: &str = "id, employee_id, training_id, status, notes, reviewed_by, \
                               reviewed_at, created_at, updated_at";

// ---------------------------------------------------------------------------
// TrainingRepo
// ---------------------------------------------------------------------------

pub struct TrainingRepo;

impl TrainingRepo {
    /// Insert a training session. `status` defaults to `scheduled`.
    pub async fn create(pool: &PgPool, input: &CreateTraining) -> Result<Training, sqlx::Error> {
        let query = format!(
            "INSERT INTO trainings
                (title, description, trainer, start_date, end_date, location, capacity, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Training>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.trainer)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location)
            .bind(input.capacity)
            .bind(input.status.as_deref().unwrap_or(STATUS_SCHEDULED))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Training>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trainings WHERE id = $1");
        sqlx::query_as::<_, Training>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &TrainingQuery,
        page: PageRequest,
    ) -> Result<Vec<Training>, sqlx::Error> {
        let filter = build_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM trainings {} \
             ORDER BY start_date DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, Training>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &TrainingQuery) -> Result<i64, sqlx::Error> {
        let filter = build_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM trainings {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateTraining,
    ) -> Result<Option<Training>, sqlx::Error> {
        let query = format!(
            "UPDATE trainings SET
                title = $2,
                description = $3,
                trainer = $4,
                start_date = $5,
                end_date = $6,
                location = $7,
                capacity = $8,
                status = COALESCE($9, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Training>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.trainer)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location)
            .bind(input.capacity)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trainings WHERE id = $1")
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
            "SELECT status, COUNT(*)::BIGINT FROM trainings {} GROUP BY status",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, i64)>(&query))
            .fetch_all(pool)
            .await
    }

    /// `(YYYY-MM, status, count)` keyed on the session's start month.
    pub async fn count_by_month(
        pool: &PgPool,
        scope: &StatsQuery,
    ) -> Result<Vec<(String, String, i64)>, sqlx::Error> {
        let filter = build_stats_filter(scope);
        let query = format!(
            "SELECT to_char(start_date, 'YYYY-MM') AS month, status, COUNT(*)::BIGINT \
             FROM trainings {} GROUP BY month, status",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, String, i64)>(&query))
            .fetch_all(pool)
            .await
    }
}

fn build_filter(params: &TrainingQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_text("status", params.status.as_deref())
        .search(&["title", "trainer"], params.search.as_deref())
        .date_from("start_date", params.from)
        .date_to("start_date", params.to);
    filter
}

fn build_stats_filter(scope: &StatsQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .date_from("start_date", scope.from)
        .date_to("start_date", scope.to);
    filter
}

// ---------------------------------------------------------------------------
// TrainingRequestRepo
// ---------------------------------------------------------------------------

pub struct TrainingRequestRepo;

impl TrainingRequestRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTrainingRequest,
    ) -> Result<TrainingRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO training_requests (employee_id, training_id, status, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, TrainingRequest>(&query)
            .bind(input.employee_id)
            .bind(input.training_id)
            .bind(REQUEST_PENDING)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TrainingRequest>, sqlx::Error> {
        let query = format!("SELECT {REQUEST_COLUMNS} FROM training_requests WHERE id = $1");
        sqlx::query_as::<_, TrainingRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &TrainingRequestQuery,
        page: PageRequest,
    ) -> Result<Vec<TrainingRequest>, sqlx::Error> {
        let filter = build_request_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM training_requests {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, TrainingRequest>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &TrainingRequestQuery) -> Result<i64, sqlx::Error> {
        let filter = build_request_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM training_requests {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    pub async fn update_notes(
        pool: &PgPool,
        id: DbId,
        notes: Option<&str>,
    ) -> Result<Option<TrainingRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE training_requests SET notes = $2 WHERE id = $1 RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, TrainingRequest>(&query)
            .bind(id)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Move a request from `from` to `to`, recording the reviewer.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        reviewer: DbId,
    ) -> Result<Option<TrainingRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE training_requests SET
                status = $3,
                reviewed_by = $4,
                reviewed_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, TrainingRequest>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(reviewer)
            .fetch_optional(pool)
            .await
    }

    /// Number of approved seats on a training session.
    pub async fn count_approved(pool: &PgPool, training_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM training_requests \
             WHERE training_id = $1 AND status = $2",
        )
        .bind(training_id)
        .bind(REQUEST_APPROVED)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM training_requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_status(
        pool: &PgPool,
        scope: &StatsQuery,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let mut filter = Filter::new();
        filter.eq_id("employee_id", scope.employee_id);
        let query = format!(
            "SELECT status, COUNT(*)::BIGINT FROM training_requests {} GROUP BY status",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, i64)>(&query))
            .fetch_all(pool)
            .await
    }
}

fn build_request_filter(params: &TrainingRequestQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("employee_id", params.employee_id)
        .eq_id("training_id", params.training_id)
        .eq_text("status", params.status.as_deref());
    filter
}
