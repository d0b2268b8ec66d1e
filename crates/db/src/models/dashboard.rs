//! Dashboard summary payload.

use hrms_core::stats::StatusCounts;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub employees: StatusCounts,
    pub total_employees: i64,
    /// Attendance counts for the current day.
    pub attendance_today: StatusCounts,
    pub pending_leave_requests: i64,
    pub pending_separation_requests: i64,
    pub pending_training_requests: i64,
    pub open_job_postings: i64,
    pub assets: StatusCounts,
}
