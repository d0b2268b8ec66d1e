//! Repository for the `employees` table.

use hrms_core::employee::STATUS_ACTIVE;
use hrms_core::pagination::PageRequest;
use hrms_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::employee::{CreateEmployee, Employee, EmployeeQuery};

const COLUMNS: &str = "id, user_id, employee_code, first_name, last_name, email, phone, \
                       department, position, hire_date, date_of_birth, status, address, \
                       emergency_contact, photo_path, created_at, updated_at";

/// Provides CRUD operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a validated employee. `status` defaults to `active`.
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees
                (user_id, employee_code, first_name, last_name, email, phone, department,
                 position, hire_date, date_of_birth, status, address, emergency_contact)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(input.user_id)
            .bind(&input.employee_code)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.department)
            .bind(&input.position)
            .bind(input.hire_date)
            .bind(input.date_of_birth)
            .bind(input.status.as_deref().unwrap_or(STATUS_ACTIVE))
            .bind(input.address.as_ref().map(Json))
            .bind(input.emergency_contact.as_ref().map(Json))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the employee record linked to a user account.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE user_id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List employees matching the filter, most recent hires first.
    pub async fn list(
        pool: &PgPool,
        params: &EmployeeQuery,
        page: PageRequest,
    ) -> Result<Vec<Employee>, sqlx::Error> {
        let filter = build_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM employees {} \
             ORDER BY hire_date DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, Employee>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &EmployeeQuery) -> Result<i64, sqlx::Error> {
        let filter = build_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM employees {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Overwrite every editable column with the merged, validated record.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateEmployee,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET
                user_id = $2,
                employee_code = $3,
                first_name = $4,
                last_name = $5,
                email = $6,
                phone = $7,
                department = $8,
                position = $9,
                hire_date = $10,
                date_of_birth = $11,
                status = COALESCE($12, status),
                address = $13,
                emergency_contact = $14
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(input.user_id)
            .bind(&input.employee_code)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.department)
            .bind(&input.position)
            .bind(input.hire_date)
            .bind(input.date_of_birth)
            .bind(&input.status)
            .bind(input.address.as_ref().map(Json))
            .bind(input.emergency_contact.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("UPDATE employees SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Point the employee at a newly stored photo, returning the updated row.
    pub async fn set_photo(
        pool: &PgPool,
        id: DbId,
        photo_path: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query =
            format!("UPDATE employees SET photo_path = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(photo_path)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an employee. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while other records reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `(status, count)` over employees in one department, or all.
    pub async fn count_by_status(
        pool: &PgPool,
        department: Option<&str>,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let mut filter = Filter::new();
        filter.eq_text("department", department);
        let query = format!(
            "SELECT status, COUNT(*)::BIGINT FROM employees {} GROUP BY status",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, i64)>(&query))
            .fetch_all(pool)
            .await
    }

    /// `(department, count)` over all employees.
    pub async fn count_by_department(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT department, COUNT(*)::BIGINT FROM employees \
             GROUP BY department ORDER BY department",
        )
        .fetch_all(pool)
        .await
    }
}

fn build_filter(params: &EmployeeQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_text("department", params.department.as_deref())
        .eq_text("status", params.status.as_deref())
        .search(
            &["first_name", "last_name", "employee_code", "email"],
            params.search.as_deref(),
        )
        .date_from("hire_date", params.from)
        .date_to("hire_date", params.to);
    filter
}
