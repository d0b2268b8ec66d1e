//! Repository for the `salaries` table.

use hrms_core::pagination::PageRequest;
use hrms_core::payroll::PAYMENT_PENDING;
use hrms_core::types::{Date, DbId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::filter::Filter;
use crate::models::common::StatsQuery;
use crate::models::salary::{CreateSalary, Salary, SalaryQuery};

const COLUMNS: &str = "id, employee_id, pay_period, basic_salary, bonus, deductions, \
                       net_salary, payment_status, payment_date, processed_by, notes, \
                       created_at, updated_at";

pub struct SalaryRepo;

impl SalaryRepo {
    /// Insert a pending salary. `pay_period` and `net_salary` are derived by
    /// the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSalary,
        pay_period: Option<Date>,
        net_salary: Option<Decimal>,
    ) -> Result<Salary, sqlx::Error> {
        let query = format!(
            "INSERT INTO salaries
                (employee_id, pay_period, basic_salary, bonus, deductions, net_salary,
                 payment_status, notes)
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, 0), $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Salary>(&query)
            .bind(input.employee_id)
            .bind(pay_period)
            .bind(input.basic_salary)
            .bind(input.bonus)
            .bind(input.deductions)
            .bind(net_salary)
            .bind(PAYMENT_PENDING)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Salary>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM salaries WHERE id = $1");
        sqlx::query_as::<_, Salary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &SalaryQuery,
        page: PageRequest,
    ) -> Result<Vec<Salary>, sqlx::Error> {
        let filter = build_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM salaries {} \
             ORDER BY pay_period DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, Salary>(&query))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &SalaryQuery) -> Result<i64, sqlx::Error> {
        let filter = build_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM salaries {}",
            filter.where_clause()
        );
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Rewrite the components of a salary that has not been paid yet.
    pub async fn update_pending(
        pool: &PgPool,
        id: DbId,
        input: &CreateSalary,
        pay_period: Option<Date>,
        net_salary: Option<Decimal>,
    ) -> Result<Option<Salary>, sqlx::Error> {
        let query = format!(
            "UPDATE salaries SET
                pay_period = $2,
                basic_salary = $3,
                bonus = COALESCE($4, 0),
                deductions = COALESCE($5, 0),
                net_salary = $6,
                notes = $7
             WHERE id = $1 AND payment_status = $8
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Salary>(&query)
            .bind(id)
            .bind(pay_period)
            .bind(input.basic_salary)
            .bind(input.bonus)
            .bind(input.deductions)
            .bind(net_salary)
            .bind(&input.notes)
            .bind(PAYMENT_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Move a salary from `from` to `to`. `payment_date` is only written
    /// when supplied.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        processed_by: DbId,
        payment_date: Option<Date>,
    ) -> Result<Option<Salary>, sqlx::Error> {
        let query = format!(
            "UPDATE salaries SET
                payment_status = $3,
                processed_by = $4,
                payment_date = COALESCE($5, payment_date)
             WHERE id = $1 AND payment_status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Salary>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(processed_by)
            .bind(payment_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM salaries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `(payment_status, count, sum of net_salary)` within the stats scope.
    pub async fn totals_by_status(
        pool: &PgPool,
        scope: &StatsQuery,
    ) -> Result<Vec<(String, i64, Decimal)>, sqlx::Error> {
        let mut filter = Filter::new();
        filter
            .eq_id("employee_id", scope.employee_id)
            .date_from("pay_period", scope.from)
            .date_to("pay_period", scope.to);
        let query = format!(
            "SELECT payment_status, COUNT(*)::BIGINT, COALESCE(SUM(net_salary), 0) \
             FROM salaries {} GROUP BY payment_status",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, (String, i64, Decimal)>(&query))
            .fetch_all(pool)
            .await
    }
}

fn build_filter(params: &SalaryQuery) -> Filter {
    let mut filter = Filter::new();
    filter
        .eq_id("employee_id", params.employee_id)
        .eq_text("payment_status", params.payment_status.as_deref())
        .date_from("pay_period", params.from)
        .date_to("pay_period", params.to);
    filter
}
