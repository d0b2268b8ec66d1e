//! Cross-table counts for the dashboard summary.

use sqlx::PgPool;

/// Items waiting for an HR decision, plus open job postings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct WorkQueueCounts {
    pub pending_leave_requests: i64,
    pub pending_separation_requests: i64,
    pub pending_training_requests: i64,
    pub open_job_postings: i64,
}

pub struct DashboardRepo;

impl DashboardRepo {
    /// All work-queue counts in a single round trip.
    pub async fn work_queue(pool: &PgPool) -> Result<WorkQueueCounts, sqlx::Error> {
        sqlx::query_as::<_, WorkQueueCounts>(
            "SELECT \
               (SELECT COUNT(*) FROM leave_requests WHERE status = 'pending')::BIGINT \
                 AS pending_leave_requests, \
               (SELECT COUNT(*) FROM separation_requests WHERE status = 'pending')::BIGINT \
                 AS pending_separation_requests, \
               (SELECT COUNT(*) FROM training_requests WHERE status = 'pending')::BIGINT \
                 AS pending_training_requests, \
               (SELECT COUNT(*) FROM job_postings WHERE status = 'open')::BIGINT \
                 AS open_job_postings",
        )
        .fetch_one(pool)
        .await
    }
}
