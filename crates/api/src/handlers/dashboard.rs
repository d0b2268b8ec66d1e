//! Handler for `GET /dashboard/summary`.

use axum::extract::State;
use chrono::Utc;
use hrms_core::stats::{total, zero_filled};
use hrms_core::{asset, attendance, employee};
use hrms_db::models::dashboard::DashboardSummary;
use hrms_db::repositories::{AssetRepo, AttendanceRepo, DashboardRepo, EmployeeRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireHr;
use crate::response::{ok, JsonResponse};
use crate::state::AppState;

/// GET /api/v1/dashboard/summary
///
/// Headcount, today's attendance (UTC date), HR work queues and asset
/// counts in one payload.
pub async fn summary(
    State(state): State<AppState>,
    RequireHr(_user): RequireHr,
) -> AppResult<JsonResponse<DashboardSummary>> {
    let today = Utc::now().date_naive();

    let (employees, attendance_today, queue, assets) = tokio::try_join!(
        EmployeeRepo::count_by_status(&state.pool, None),
        AttendanceRepo::count_for_day(&state.pool, today),
        DashboardRepo::work_queue(&state.pool),
        AssetRepo::count_by_status(&state.pool),
    )?;

    let employees = zero_filled(employee::VALID_STATUSES, employees);
    Ok(ok(DashboardSummary {
        total_employees: total(&employees),
        employees,
        attendance_today: zero_filled(attendance::VALID_STATUSES, attendance_today),
        pending_leave_requests: queue.pending_leave_requests,
        pending_separation_requests: queue.pending_separation_requests,
        pending_training_requests: queue.pending_training_requests,
        open_job_postings: queue.open_job_postings,
        assets: zero_filled(asset::VALID_STATUSES, assets),
    }))
}
