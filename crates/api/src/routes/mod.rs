pub mod admin;
pub mod assets;
pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod employees;
pub mod health;
pub mod leave_requests;
pub mod recruitment;
pub mod salaries;
pub mod separation_requests;
pub mod trainings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update
/// /admin/users/{id}/deactivate                     deactivate (POST)
/// /admin/audit-logs                                list (admin only)
/// /admin/audit-logs/integrity-check                verify hash chain
///
/// /employees                                       list, create
/// /employees/stats                                 headcount by status/department
/// /employees/{id}                                  get, update, delete
/// /employees/{id}/photo                            upload photo (multipart)
///
/// /attendance                                      list, create
/// /attendance/stats                                summary + monthly
/// /attendance/{id}                                 get, update, delete
///
/// /leave-requests                                  list, create
/// /leave-requests/stats                            by status/type
/// /leave-requests/{id}                             get, update, delete
/// /leave-requests/{id}/approve                     approve (POST)
/// /leave-requests/{id}/reject                      reject (POST)
///
/// /separation-requests                             list, create
/// /separation-requests/stats                       by status/type
/// /separation-requests/{id}                        get, update, delete
/// /separation-requests/{id}/approve                approve (POST)
/// /separation-requests/{id}/reject                 reject (POST)
/// /separation-requests/{id}/process                process (POST)
///
/// /trainings                                       list, create
/// /trainings/stats                                 by status + monthly
/// /trainings/{id}                                  get, update, delete
///
/// /training-requests                               list, create
/// /training-requests/{id}                          get, update, delete
/// /training-requests/{id}/approve                  approve (POST)
/// /training-requests/{id}/reject                   reject (POST)
/// /training-requests/{id}/complete                 complete (POST)
///
/// /salaries                                        list, create
/// /salaries/stats                                  counts + net per status
/// /salaries/{id}                                   get, update, delete
/// /salaries/{id}/pay                               mark paid (POST)
/// /salaries/{id}/cancel                            cancel (POST)
///
/// /documents                                       list, upload (multipart)
/// /documents/{id}                                  get, update, delete
///
/// /assets                                          list, create
/// /assets/stats                                    by status/category
/// /assets/{id}                                     get, update, delete
///
/// /job-postings                                    list, create
/// /job-postings/{id}                               get, update, delete
///
/// /candidates                                      list, create
/// /candidates/stats                                pipeline counts
/// /candidates/{id}                                 get, update, delete
/// /candidates/{id}/status                          pipeline transition (PUT)
///
/// /dashboard/summary                               summary widgets
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, current user).
        .nest("/auth", auth::router())
        // Admin routes (user management + audit trail).
        .nest("/admin", admin::router())
        // People.
        .nest("/employees", employees::router())
        .nest("/attendance", attendance::router())
        .nest("/leave-requests", leave_requests::router())
        .nest("/separation-requests", separation_requests::router())
        // Learning.
        .nest("/trainings", trainings::router())
        .nest("/training-requests", trainings::requests_router())
        // Payroll.
        .nest("/salaries", salaries::router())
        // Files and equipment.
        .nest("/documents", documents::router())
        .nest("/assets", assets::router())
        // Recruitment.
        .nest("/job-postings", recruitment::postings_router())
        .nest("/candidates", recruitment::candidates_router())
        // Summary widgets.
        .nest("/dashboard", dashboard::router())
}
