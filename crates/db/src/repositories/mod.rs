//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod asset_repo;
pub mod attendance_repo;
pub mod audit_repo;
pub mod dashboard_repo;
pub mod document_repo;
pub mod employee_repo;
pub mod leave_repo;
pub mod recruitment_repo;
pub mod salary_repo;
pub mod separation_repo;
pub mod training_repo;
pub mod user_repo;

pub use asset_repo::AssetRepo;
pub use attendance_repo::AttendanceRepo;
pub use audit_repo::AuditLogRepo;
pub use dashboard_repo::DashboardRepo;
pub use document_repo::DocumentRepo;
pub use employee_repo::EmployeeRepo;
pub use leave_repo::LeaveRequestRepo;
pub use recruitment_repo::{CandidateRepo, JobPostingRepo};
pub use salary_repo::SalaryRepo;
pub use separation_repo::SeparationRequestRepo;
pub use training_repo::{TrainingRepo, TrainingRequestRepo};
pub use user_repo::UserRepo;
