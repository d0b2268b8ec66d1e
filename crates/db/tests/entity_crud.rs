//! Repository integration tests against a real database:
//! - CRUD round trips with derived columns
//! - Unique and foreign key violations
//! - Status-guarded transitions
//! - Filters, ordering and pagination

use std::str::FromStr;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime, Utc};
use hrms_core::asset::reconcile_assignment;
use hrms_core::leave::{STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};
use hrms_core::pagination::PageRequest;
use hrms_core::payroll::{PAYMENT_CANCELLED, PAYMENT_PAID, PAYMENT_PENDING};
use hrms_db::models::asset::CreateAsset;
use hrms_db::models::attendance::CreateAttendance;
use hrms_db::models::common::StatsQuery;
use hrms_db::models::employee::{CreateEmployee, EmployeeQuery};
use hrms_db::models::leave::{CreateLeaveRequest, LeaveQuery};
use hrms_db::models::salary::CreateSalary;
use hrms_db::models::user::CreateUser;
use hrms_db::populate;
use hrms_db::repositories::{
    AssetRepo, AttendanceRepo, DashboardRepo, EmployeeRepo, LeaveRequestRepo, SalaryRepo,
    UserRepo,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_employee(code: &str, email: &str, department: &str) -> CreateEmployee {
    CreateEmployee {
        employee_code: Some(code.to_string()),
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        email: Some(email.to_string()),
        department: Some(department.to_string()),
        position: Some("Engineer".to_string()),
        hire_date: Some(date(2022, 3, 1)),
        ..Default::default()
    }
}

fn new_leave(employee_id: i64, start: NaiveDate, end: NaiveDate) -> CreateLeaveRequest {
    CreateLeaveRequest {
        employee_id: Some(employee_id),
        leave_type: Some("annual".to_string()),
        start_date: Some(start),
        end_date: Some(end),
        reason: Some("Family trip".to_string()),
    }
}

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$placeholder".to_string(),
            role: "hr".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn db_code(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|e| e.code())
        .map(|c| c.into_owned())
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_employee_create_defaults_to_active(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "g@example.com", "Engineering"))
        .await
        .unwrap();
    assert_eq!(employee.status, "active");
    assert_eq!(employee.employee_code, "ENG-0001");

    let found = EmployeeRepo::find_by_id(&pool, employee.id).await.unwrap().unwrap();
    assert_eq!(found.email, "g@example.com");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_employee_code_is_unique_violation(pool: PgPool) {
    EmployeeRepo::create(&pool, &new_employee("ENG-0001", "a@example.com", "Engineering"))
        .await
        .unwrap();
    let err = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "b@example.com", "Engineering"))
        .await
        .unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23505"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_employee_with_history_cannot_be_deleted(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "a@example.com", "Engineering"))
        .await
        .unwrap();
    LeaveRequestRepo::create(&pool, &new_leave(employee.id, date(2024, 5, 1), date(2024, 5, 3)), Some(3))
        .await
        .unwrap();

    let err = EmployeeRepo::delete(&pool, employee.id).await.unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23503"));
    assert!(EmployeeRepo::find_by_id(&pool, employee.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_missing_employee_returns_false(pool: PgPool) {
    assert!(!EmployeeRepo::delete(&pool, 999_999).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_employee_filters_and_pagination(pool: PgPool) {
    for i in 0..5 {
        EmployeeRepo::create(
            &pool,
            &new_employee(&format!("ENG-000{i}"), &format!("e{i}@example.com"), "Engineering"),
        )
        .await
        .unwrap();
    }
    EmployeeRepo::create(&pool, &new_employee("OPS-0001", "ops@example.com", "Operations"))
        .await
        .unwrap();

    let params = EmployeeQuery {
        department: Some("Engineering".to_string()),
        ..Default::default()
    };
    let page = PageRequest::new(Some(2), Some(2));
    let rows = EmployeeRepo::list(&pool, &params, page).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(EmployeeRepo::count(&pool, &params).await.unwrap(), 5);

    let search = EmployeeQuery {
        search: Some("ops@".to_string()),
        ..Default::default()
    };
    let rows = EmployeeRepo::list(&pool, &search, PageRequest::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].department, "Operations");
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_one_attendance_record_per_day(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "a@example.com", "Engineering"))
        .await
        .unwrap();
    let input = CreateAttendance {
        employee_id: Some(employee.id),
        date: Some(date(2024, 4, 2)),
        check_in: NaiveTime::from_hms_opt(9, 0, 0),
        check_out: NaiveTime::from_hms_opt(17, 30, 0),
        status: Some("present".to_string()),
        notes: None,
    };
    let record = AttendanceRepo::create(&pool, &input, input.work_hours(), None)
        .await
        .unwrap();
    assert_eq!(record.work_hours, Some(8.5));

    let err = AttendanceRepo::create(&pool, &input, input.work_hours(), None)
        .await
        .unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23505"));

    let detail = populate::attendance(&pool, record).await.unwrap();
    assert_eq!(detail.employee.unwrap().employee_code, "ENG-0001");
}

// ---------------------------------------------------------------------------
// Leave requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_leave_review_only_succeeds_once(pool: PgPool) {
    let reviewer = seed_user(&pool, "hr.lead").await;
    let employee = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "a@example.com", "Engineering"))
        .await
        .unwrap();
    let leave = LeaveRequestRepo::create(&pool, &new_leave(employee.id, date(2024, 5, 1), date(2024, 5, 3)), Some(3))
        .await
        .unwrap();
    assert_eq!(leave.status, STATUS_PENDING);

    let approved = LeaveRequestRepo::review(&pool, leave.id, STATUS_PENDING, STATUS_APPROVED, reviewer, Some("ok"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, STATUS_APPROVED);
    assert_eq!(approved.reviewed_by, Some(reviewer));
    assert!(approved.reviewed_at.is_some());

    let second = LeaveRequestRepo::review(&pool, leave.id, STATUS_PENDING, STATUS_REJECTED, reviewer, None)
        .await
        .unwrap();
    assert!(second.is_none());

    let edited = LeaveRequestRepo::update_pending(
        &pool,
        leave.id,
        &new_leave(employee.id, date(2024, 5, 1), date(2024, 5, 1)),
        Some(1),
    )
    .await
    .unwrap();
    assert!(edited.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_leave_list_orders_newest_first(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "a@example.com", "Engineering"))
        .await
        .unwrap();
    for (start, end) in [
        (date(2024, 1, 10), date(2024, 1, 11)),
        (date(2024, 3, 10), date(2024, 3, 12)),
        (date(2024, 2, 10), date(2024, 2, 10)),
    ] {
        LeaveRequestRepo::create(&pool, &new_leave(employee.id, start, end), Some(1))
            .await
            .unwrap_or_else(|_| panic!("insert {start}"));
    }

    let rows = LeaveRequestRepo::list(&pool, &LeaveQuery::default(), PageRequest::default())
        .await
        .unwrap();
    let starts: Vec<NaiveDate> = rows.iter().map(|r| r.start_date).collect();
    assert_eq!(starts, vec![date(2024, 3, 10), date(2024, 2, 10), date(2024, 1, 10)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_leave_range_check_constraint(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "a@example.com", "Engineering"))
        .await
        .unwrap();
    let err = LeaveRequestRepo::create(&pool, &new_leave(employee.id, date(2024, 5, 3), date(2024, 5, 1)), Some(1))
        .await
        .unwrap_err();
    assert_eq!(db_code(&err).as_deref(), Some("23514"));
}

// ---------------------------------------------------------------------------
// Salaries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_salary_pay_and_totals(pool: PgPool) {
    let processor = seed_user(&pool, "payroll").await;
    let employee = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "a@example.com", "Engineering"))
        .await
        .unwrap();
    let input = CreateSalary {
        employee_id: Some(employee.id),
        pay_period: Some(date(2024, 3, 17)),
        basic_salary: Some(Decimal::from(5000)),
        bonus: Some(Decimal::from(500)),
        deductions: Some(Decimal::from(200)),
        notes: None,
    };
    let salary = SalaryRepo::create(&pool, &input, input.pay_period(), input.net_salary())
        .await
        .unwrap();
    assert_eq!(salary.pay_period, date(2024, 3, 1));
    assert_eq!(salary.net_salary, Decimal::from(5300));
    assert_eq!(salary.payment_status, PAYMENT_PENDING);

    let dup = SalaryRepo::create(&pool, &input, input.pay_period(), input.net_salary())
        .await
        .unwrap_err();
    assert_eq!(db_code(&dup).as_deref(), Some("23505"));

    let paid = SalaryRepo::transition(&pool, salary.id, PAYMENT_PENDING, PAYMENT_PAID, processor, Some(date(2024, 3, 31)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.payment_date, Some(date(2024, 3, 31)));
    assert_eq!(paid.processed_by, Some(processor));

    let cancel = SalaryRepo::transition(&pool, salary.id, PAYMENT_PENDING, PAYMENT_CANCELLED, processor, None)
        .await
        .unwrap();
    assert!(cancel.is_none());

    let scope = StatsQuery {
        employee_id: None,
        from: None,
        to: None,
    };
    let totals = SalaryRepo::totals_by_status(&pool, &scope).await.unwrap();
    assert_eq!(
        totals,
        vec![(PAYMENT_PAID.to_string(), 1, Decimal::from_str("5300.00").unwrap())]
    );
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_asset_assignment_is_reconciled(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "a@example.com", "Engineering"))
        .await
        .unwrap();
    let input = CreateAsset {
        name: Some("ThinkPad".to_string()),
        serial_number: Some("SN-1".to_string()),
        category: Some("laptop".to_string()),
        assigned_to: Some(employee.id),
        ..Default::default()
    };
    let assignment = reconcile_assignment(
        input.assigned_to,
        input.assigned_at,
        input.status_or_default(),
        Utc::now(),
    );
    let asset = AssetRepo::create(&pool, &input, &assignment).await.unwrap();
    assert_eq!(asset.status, "assigned");
    assert!(asset.assigned_at.is_some());

    let detail = populate::asset(&pool, asset).await.unwrap();
    assert_eq!(detail.assigned_employee.unwrap().id, employee.id);

    let err = EmployeeRepo::delete(&pool, employee.id).await.unwrap_err();
    assert_matches!(db_code(&err).as_deref(), Some("23503"));
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_work_queue_counts_pending_items(pool: PgPool) {
    let empty = DashboardRepo::work_queue(&pool).await.unwrap();
    assert_eq!(empty.pending_leave_requests, 0);
    assert_eq!(empty.open_job_postings, 0);

    let employee = EmployeeRepo::create(&pool, &new_employee("ENG-0001", "a@example.com", "Engineering"))
        .await
        .unwrap();
    LeaveRequestRepo::create(&pool, &new_leave(employee.id, date(2024, 5, 1), date(2024, 5, 3)), Some(3))
        .await
        .unwrap();

    let counts = DashboardRepo::work_queue(&pool).await.unwrap();
    assert_eq!(counts.pending_leave_requests, 1);
    assert_eq!(counts.pending_separation_requests, 0);
}
