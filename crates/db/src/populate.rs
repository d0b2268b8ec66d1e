//! Population of referenced records.
//!
//! After the primary read, every referenced id (employees, users, trainings,
//! job postings) is collected and fetched in one `= ANY($1)` query per
//! table. The projections are then attached to the rows as `*Detail`
//! values. Dangling references resolve to `None`.

use std::collections::{BTreeSet, HashMap};

use hrms_core::types::DbId;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::models::asset::{Asset, AssetDetail};
use crate::models::attendance::{Attendance, AttendanceDetail};
use crate::models::common::{EmployeeSummary, JobPostingSummary, TrainingSummary, UserSummary};
use crate::models::document::{Document, DocumentDetail};
use crate::models::employee::{Employee, EmployeeDetail};
use crate::models::leave::{LeaveRequest, LeaveRequestDetail};
use crate::models::recruitment::{Candidate, CandidateDetail};
use crate::models::salary::{Salary, SalaryDetail};
use crate::models::separation::{SeparationRequest, SeparationRequestDetail};
use crate::models::training::{TrainingRequest, TrainingRequestDetail};

// ---------------------------------------------------------------------------
// Reference loading
// ---------------------------------------------------------------------------

/// Ids referenced by a batch of rows, grouped by target table.
#[derive(Debug, Default)]
struct RefIds {
    employees: BTreeSet<DbId>,
    users: BTreeSet<DbId>,
    trainings: BTreeSet<DbId>,
    job_postings: BTreeSet<DbId>,
}

/// Projections fetched for a batch, keyed by id.
#[derive(Debug, Default)]
struct Refs {
    employees: HashMap<DbId, EmployeeSummary>,
    users: HashMap<DbId, UserSummary>,
    trainings: HashMap<DbId, TrainingSummary>,
    job_postings: HashMap<DbId, JobPostingSummary>,
}

impl Refs {
    async fn load(pool: &PgPool, ids: RefIds) -> Result<Self, sqlx::Error> {
        Ok(Self {
            employees: fetch_by_ids(
                pool,
                "SELECT id, employee_code, first_name, last_name, department \
                 FROM employees WHERE id = ANY($1)",
                ids.employees,
                |e: &EmployeeSummary| e.id,
            )
            .await?,
            users: fetch_by_ids(
                pool,
                "SELECT id, username FROM users WHERE id = ANY($1)",
                ids.users,
                |u: &UserSummary| u.id,
            )
            .await?,
            trainings: fetch_by_ids(
                pool,
                "SELECT id, title, start_date FROM trainings WHERE id = ANY($1)",
                ids.trainings,
                |t: &TrainingSummary| t.id,
            )
            .await?,
            job_postings: fetch_by_ids(
                pool,
                "SELECT id, title, department FROM job_postings WHERE id = ANY($1)",
                ids.job_postings,
                |p: &JobPostingSummary| p.id,
            )
            .await?,
        })
    }

    fn employee(&self, id: Option<DbId>) -> Option<EmployeeSummary> {
        id.and_then(|id| self.employees.get(&id).cloned())
    }

    fn user(&self, id: Option<DbId>) -> Option<UserSummary> {
        id.and_then(|id| self.users.get(&id).cloned())
    }

    fn training(&self, id: DbId) -> Option<TrainingSummary> {
        self.trainings.get(&id).cloned()
    }

    fn job_posting(&self, id: DbId) -> Option<JobPostingSummary> {
        self.job_postings.get(&id).cloned()
    }
}

async fn fetch_by_ids<T>(
    pool: &PgPool,
    query: &str,
    ids: BTreeSet<DbId>,
    key: fn(&T) -> DbId,
) -> Result<HashMap<DbId, T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let ids: Vec<DbId> = ids.into_iter().collect();
    let rows = sqlx::query_as::<_, T>(query)
        .bind(&ids)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|row| (key(&row), row)).collect())
}

// ---------------------------------------------------------------------------
// Per-resource population
// ---------------------------------------------------------------------------

pub async fn employees(
    pool: &PgPool,
    rows: Vec<Employee>,
) -> Result<Vec<EmployeeDetail>, sqlx::Error> {
    let ids = RefIds {
        users: rows.iter().filter_map(|r| r.user_id).collect(),
        ..Default::default()
    };
    let refs = Refs::load(pool, ids).await?;
    Ok(rows
        .into_iter()
        .map(|employee| EmployeeDetail {
            user: refs.user(employee.user_id),
            employee,
        })
        .collect())
}

pub async fn employee(pool: &PgPool, row: Employee) -> Result<EmployeeDetail, sqlx::Error> {
    employees(pool, vec![row]).await?.pop().ok_or(sqlx::Error::RowNotFound)
}

pub async fn attendance_records(
    pool: &PgPool,
    rows: Vec<Attendance>,
) -> Result<Vec<AttendanceDetail>, sqlx::Error> {
    let ids = RefIds {
        employees: rows.iter().map(|r| r.employee_id).collect(),
        users: rows.iter().filter_map(|r| r.checked_by).collect(),
        ..Default::default()
    };
    let refs = Refs::load(pool, ids).await?;
    Ok(rows
        .into_iter()
        .map(|attendance| AttendanceDetail {
            employee: refs.employee(Some(attendance.employee_id)),
            checked_by_user: refs.user(attendance.checked_by),
            attendance,
        })
        .collect())
}

pub async fn attendance(pool: &PgPool, row: Attendance) -> Result<AttendanceDetail, sqlx::Error> {
    attendance_records(pool, vec![row])
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn leave_requests(
    pool: &PgPool,
    rows: Vec<LeaveRequest>,
) -> Result<Vec<LeaveRequestDetail>, sqlx::Error> {
    let ids = RefIds {
        employees: rows.iter().map(|r| r.employee_id).collect(),
        users: rows.iter().filter_map(|r| r.reviewed_by).collect(),
        ..Default::default()
    };
    let refs = Refs::load(pool, ids).await?;
    Ok(rows
        .into_iter()
        .map(|leave_request| LeaveRequestDetail {
            employee: refs.employee(Some(leave_request.employee_id)),
            reviewer: refs.user(leave_request.reviewed_by),
            leave_request,
        })
        .collect())
}

pub async fn leave_request(
    pool: &PgPool,
    row: LeaveRequest,
) -> Result<LeaveRequestDetail, sqlx::Error> {
    leave_requests(pool, vec![row])
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn separation_requests(
    pool: &PgPool,
    rows: Vec<SeparationRequest>,
) -> Result<Vec<SeparationRequestDetail>, sqlx::Error> {
    let ids = RefIds {
        employees: rows.iter().map(|r| r.employee_id).collect(),
        users: rows.iter().filter_map(|r| r.processed_by).collect(),
        ..Default::default()
    };
    let refs = Refs::load(pool, ids).await?;
    Ok(rows
        .into_iter()
        .map(|separation_request| SeparationRequestDetail {
            employee: refs.employee(Some(separation_request.employee_id)),
            processor: refs.user(separation_request.processed_by),
            separation_request,
        })
        .collect())
}

pub async fn separation_request(
    pool: &PgPool,
    row: SeparationRequest,
) -> Result<SeparationRequestDetail, sqlx::Error> {
    separation_requests(pool, vec![row])
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn training_requests(
    pool: &PgPool,
    rows: Vec<TrainingRequest>,
) -> Result<Vec<TrainingRequestDetail>, sqlx::Error> {
    let ids = RefIds {
        employees: rows.iter().map(|r| r.employee_id).collect(),
        users: rows.iter().filter_map(|r| r.reviewed_by).collect(),
        trainings: rows.iter().map(|r| r.training_id).collect(),
        ..Default::default()
    };
    let refs = Refs::load(pool, ids).await?;
    Ok(rows
        .into_iter()
        .map(|training_request| TrainingRequestDetail {
            employee: refs.employee(Some(training_request.employee_id)),
            training: refs.training(training_request.training_id),
            reviewer: refs.user(training_request.reviewed_by),
            training_request,
        })
        .collect())
}

pub async fn training_request(
    pool: &PgPool,
    row: TrainingRequest,
) -> Result<TrainingRequestDetail, sqlx::Error> {
    training_requests(pool, vec![row])
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn salaries(pool: &PgPool, rows: Vec<Salary>) -> Result<Vec<SalaryDetail>, sqlx::Error> {
    let ids = RefIds {
        employees: rows.iter().map(|r| r.employee_id).collect(),
        users: rows.iter().filter_map(|r| r.processed_by).collect(),
        ..Default::default()
    };
    let refs = Refs::load(pool, ids).await?;
    Ok(rows
        .into_iter()
        .map(|salary| SalaryDetail {
            employee: refs.employee(Some(salary.employee_id)),
            processor: refs.user(salary.processed_by),
            salary,
        })
        .collect())
}

pub async fn salary(pool: &PgPool, row: Salary) -> Result<SalaryDetail, sqlx::Error> {
    salaries(pool, vec![row]).await?.pop().ok_or(sqlx::Error::RowNotFound)
}

pub async fn documents(
    pool: &PgPool,
    rows: Vec<Document>,
) -> Result<Vec<DocumentDetail>, sqlx::Error> {
    let ids = RefIds {
        employees: rows.iter().map(|r| r.employee_id).collect(),
        users: rows.iter().filter_map(|r| r.uploaded_by).collect(),
        ..Default::default()
    };
    let refs = Refs::load(pool, ids).await?;
    Ok(rows
        .into_iter()
        .map(|document| DocumentDetail {
            employee: refs.employee(Some(document.employee_id)),
            uploader: refs.user(document.uploaded_by),
            document,
        })
        .collect())
}

pub async fn document(pool: &PgPool, row: Document) -> Result<DocumentDetail, sqlx::Error> {
    documents(pool, vec![row]).await?.pop().ok_or(sqlx::Error::RowNotFound)
}

pub async fn assets(pool: &PgPool, rows: Vec<Asset>) -> Result<Vec<AssetDetail>, sqlx::Error> {
    let ids = RefIds {
        employees: rows.iter().filter_map(|r| r.assigned_to).collect(),
        ..Default::default()
    };
    let refs = Refs::load(pool, ids).await?;
    Ok(rows
        .into_iter()
        .map(|asset| AssetDetail {
            assigned_employee: refs.employee(asset.assigned_to),
            asset,
        })
        .collect())
}

pub async fn asset(pool: &PgPool, row: Asset) -> Result<AssetDetail, sqlx::Error> {
    assets(pool, vec![row]).await?.pop().ok_or(sqlx::Error::RowNotFound)
}

pub async fn candidates(
    pool: &PgPool,
    rows: Vec<Candidate>,
) -> Result<Vec<CandidateDetail>, sqlx::Error> {
    let ids = RefIds {
        job_postings: rows.iter().map(|r| r.job_posting_id).collect(),
        ..Default::default()
    };
    let refs = Refs::load(pool, ids).await?;
    Ok(rows
        .into_iter()
        .map(|candidate| CandidateDetail {
            job_posting: refs.job_posting(candidate.job_posting_id),
            candidate,
        })
        .collect())
}

pub async fn candidate(pool: &PgPool, row: Candidate) -> Result<CandidateDetail, sqlx::Error> {
    candidates(pool, vec![row])
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)
}
