//! Salary entity model and DTOs.
//!
//! Money columns are `NUMERIC(12,2)` mapped to [`Decimal`]; `net_salary` is
//! derived from the components on every write.

use std::collections::BTreeMap;

use hrms_core::pagination::PageRequest;
use hrms_core::payroll::{net_salary, normalize_pay_period};
use hrms_core::stats::StatusCounts;
use hrms_core::types::{nullable, Date, DbId, Timestamp};
use hrms_core::validation::{cross_field_error, validate_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::common::{EmployeeSummary, UserSummary};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Salary {
    pub id: DbId,
    pub employee_id: DbId,
    /// First day of the month the salary covers.
    pub pay_period: Date,
    pub basic_salary: Decimal,
    pub bonus: Decimal,
    pub deductions: Decimal,
    pub net_salary: Decimal,
    pub payment_status: String,
    pub payment_date: Option<Date>,
    pub processed_by: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryDetail {
    #[serde(flatten)]
    pub salary: Salary,
    pub employee: Option<EmployeeSummary>,
    pub processor: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "check_net", skip_on_field_errors = false))]
pub struct CreateSalary {
    #[validate(required)]
    pub employee_id: Option<DbId>,
    #[validate(required)]
    pub pay_period: Option<Date>,
    #[validate(required, custom(function = "validate_money"))]
    pub basic_salary: Option<Decimal>,
    #[validate(custom(function = "validate_money"))]
    pub bonus: Option<Decimal>,
    #[validate(custom(function = "validate_money"))]
    pub deductions: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CreateSalary {
    pub fn net_salary(&self) -> Option<Decimal> {
        Some(net_salary(self.basic_salary?, self.bonus, self.deductions))
    }

    pub fn pay_period(&self) -> Option<Date> {
        self.pay_period.map(normalize_pay_period)
    }
}

fn check_net(input: &CreateSalary) -> Result<(), ValidationError> {
    if input.net_salary().is_some_and(|net| net < Decimal::ZERO) {
        return Err(cross_field_error(
            "deductions",
            "must not exceed basic_salary plus bonus",
        ));
    }
    Ok(())
}

/// Editable fields of a pending salary. `payment_status`, `payment_date`
/// and `processed_by` change only through the pay/cancel transitions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSalary {
    pub pay_period: Option<Date>,
    pub basic_salary: Option<Decimal>,
    pub bonus: Option<Decimal>,
    pub deductions: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl UpdateSalary {
    pub fn apply_to(self, current: &Salary) -> CreateSalary {
        CreateSalary {
            employee_id: Some(current.employee_id),
            pay_period: Some(self.pay_period.unwrap_or(current.pay_period)),
            basic_salary: Some(self.basic_salary.unwrap_or(current.basic_salary)),
            bonus: Some(self.bonus.unwrap_or(current.bonus)),
            deductions: Some(self.deductions.unwrap_or(current.deductions)),
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
        }
    }
}

/// Body of the mark-paid transition; `payment_date` defaults to today.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PaySalary {
    pub payment_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalaryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub employee_id: Option<DbId>,
    pub payment_status: Option<String>,
    /// Inclusive range on `pay_period`.
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl SalaryQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryStats {
    pub by_status: StatusCounts,
    /// Sum of `net_salary` per payment status.
    pub net_by_status: BTreeMap<String, Decimal>,
    pub total: i64,
    pub total_net: Decimal,
}
