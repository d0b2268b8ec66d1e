//! Repositories for the `job_postings` and `candidates` tables.

use hrms_core::pagination::PageRequest;
use hrms_core::recruitment::{CANDIDATE_APPLIED, POSTING_OPEN};
use hrms_core::types::DbId;
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::recruitment::{
    Candidate, CandidateQuery, CreateCandidate, CreateJobPosting, JobPosting, JobPostingQuery,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const POSTING_COLUMNS: &str = "id, title, department, description, employment_type, openings, \
                               status, closing_date, created_at, updated_at";

const CANDIDATE_COLUMNS: &str = "id, job_posting_id, full_name, email, phone, resume_path, \
                                 status, notes, created_at, updated_at";

// ---------------------------------------------------------------------------
// JobPostingRepo
// ---------------------------------------------------------------------------

pub struct JobPostingRepo;

impl JobPostingRepo {
    /// Insert a posting. `openings` defaults to 1 and `status` to `open`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateJobPosting,
    ) -> Result<JobPosting, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_postings
                (title, department, description, employment_type, openings, status, closing_date)
             VALUES ($1, $2, $3, $4, COALESCE($5, 1), $6, $7)
             RETURNING {POSTING_COLUMNS}"
        );
        sqlx::query_as::<_, JobPosting>(&query)
            .bind(&input.title)
            .bind(&input.department)
            .bind(&input.description)
            .bind(&input.employment_type)
            .bind(input.openings)
            .bind(input.status.as_deref().unwrap_or(POSTING_OPEN))
            .bind(input.closing_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<JobPosting>, sqlx::Error> {
        let query = format!("SELECT {POSTING_COLUMNS} FROM job_postings WHERE id = $1");
        sqlx::query_as::<_, JobPosting>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &JobPostingQuery,
        page: PageRequest,
    ) -> Result<Vec<JobPosting>, sqlx::Error> {
        let filter = build_posting_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {POSTING_COLUMNS} FROM job_postings {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, JobPosting>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &JobPostingQuery) -> Result<i64, sqlx::Error> {
        let filter = build_posting_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM job_postings {}",
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
        input: &CreateJobPosting,
    ) -> Result<Option<JobPosting>, sqlx::Error> {
        let query = format!(
            "UPDATE job_postings SET
                title = $2,
                department = $3,
                description = $4,
                employment_type = $5,
                openings = COALESCE($6, openings),
                status = COALESCE($7, status),
                closing_date = $8
             WHERE id = $1
             RETURNING {POSTING_COLUMNS}"
        );
        sqlx::query_as::<_, JobPosting>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.department)
            .bind(&input.description)
            .bind(&input.employment_type)
            .bind(input.openings)
            .bind(&input.status)
            .bind(input.closing_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn build_posting_filter(params: &JobPostingQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_text("status", params.status.as_deref())
        .eq_text("department", params.department.as_deref())
        .eq_text("employment_type", params.employment_type.as_deref())
        .search(&["title", "description"], params.search.as_deref());
    filter
}

// ---------------------------------------------------------------------------
// CandidateRepo
// ---------------------------------------------------------------------------

pub struct CandidateRepo;

impl CandidateRepo {
    /// Insert an application at the `applied` stage.
    pub async fn create(pool: &PgPool, input: &CreateCandidate) -> Result<Candidate, sqlx::Error> {
        let query = format!(
            "INSERT INTO candidates
                (job_posting_id, full_name, email, phone, resume_path, status, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {CANDIDATE_COLUMNS}"
        );
        sqlx::query_as::<_, Candidate>(&query)
            .bind(input.job_posting_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.resume_path)
            .bind(CANDIDATE_APPLIED)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Candidate>, sqlx::Error> {
        let query = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1");
        sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &CandidateQuery,
        page: PageRequest,
    ) -> Result<Vec<Candidate>, sqlx::Error> {
        let filter = build_candidate_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, Candidate>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &CandidateQuery) -> Result<i64, sqlx::Error> {
        let filter = build_candidate_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM candidates {}",
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
        input: &CreateCandidate,
    ) -> Result<Option<Candidate>, sqlx::Error> {
        let query = format!(
            "UPDATE candidates SET
                full_name = $2,
                email = $3,
                phone = $4,
                resume_path = $5,
                notes = $6
             WHERE id = $1
             RETURNING {CANDIDATE_COLUMNS}"
        );
        sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.resume_path)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Move a candidate from `from` to `to`. Notes are only overwritten
    /// when new ones are supplied.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        notes: Option<&str>,
    ) -> Result<Option<Candidate>, sqlx::Error> {
        let query = format!(
            "UPDATE candidates SET
                status = $3,
                notes = COALESCE($4, notes)
             WHERE id = $1 AND status = $2
             RETURNING {CANDIDATE_COLUMNS}"
        );
        sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `(status, count)` over the pipeline of one posting, or all postings.
    pub async fn count_by_status(
        pool: &PgPool,
        job_posting_id: Option<DbId>,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let mut filter = Filter::new();
        filter.eq_id("job_posting_id", job_posting_id);
        let query = format!(
            "SELECT status, COUNT(*)::BIGINT FROM candidates {} GROUP BY status",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, i64)>(&query))
            .fetch_all(pool)
            .await
    }
}

fn build_candidate_filter(params: &CandidateQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("job_posting_id", params.job_posting_id)
        .eq_text("status", params.status.as_deref())
        .search(&["full_name", "email"], params.search.as_deref());
    filter
}
