//! Employee entity model and DTOs.
//!
//! `address` and `emergency_contact` are nested objects stored as JSONB and
//! validated field by field, so errors come back as `address.city` etc.

use hrms_core::employee::validate_status;
use hrms_core::pagination::PageRequest;
use hrms_core::types::{nullable, Date, DbId, Timestamp};
use hrms_core::validation::{
    cross_field_error, validate_employee_code, validate_phone, validate_postal_code,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::common::UserSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(required, length(min = 1, max = 200))]
    pub street: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(custom(function = "validate_postal_code"))]
    pub postal_code: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmergencyContact {
    #[validate(required, length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(required, length(min = 1, max = 50))]
    pub relationship: Option<String>,
    #[validate(required, custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    pub hire_date: Date,
    pub date_of_birth: Option<Date>,
    pub status: String,
    pub address: Option<Json<Address>>,
    pub emergency_contact: Option<Json<EmergencyContact>>,
    pub photo_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Employee with its linked user account resolved.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub user: Option<UserSummary>,
}

/// DTO for creating an employee. `status` defaults to `active`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "check_employee_dates", skip_on_field_errors = false))]
pub struct CreateEmployee {
    pub user_id: Option<DbId>,
    #[validate(required, custom(function = "validate_employee_code"))]
    pub employee_code: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub department: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub position: Option<String>,
    #[validate(required)]
    pub hire_date: Option<Date>,
    pub date_of_birth: Option<Date>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    #[validate(nested)]
    pub address: Option<Address>,
    #[validate(nested)]
    pub emergency_contact: Option<EmergencyContact>,
}

fn check_employee_dates(input: &CreateEmployee) -> Result<(), ValidationError> {
    if let (Some(born), Some(hired)) = (input.date_of_birth, input.hire_date) {
        if born >= hired {
            return Err(cross_field_error(
                "date_of_birth",
                "must be before hire_date",
            ));
        }
    }
    Ok(())
}

/// DTO for updating an employee. Absent keys keep the stored value;
/// `null` clears the optional fields that accept it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployee {
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: Option<Option<DbId>>,
    pub employee_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<Date>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_of_birth: Option<Option<Date>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<Address>>,
    #[serde(default, deserialize_with = "nullable")]
    pub emergency_contact: Option<Option<EmergencyContact>>,
}

impl UpdateEmployee {
    /// Merge onto the stored row, producing the full record to validate.
    pub fn apply_to(self, current: &Employee) -> CreateEmployee {
        CreateEmployee {
            user_id: self.user_id.unwrap_or(current.user_id),
            employee_code: Some(self.employee_code.unwrap_or_else(|| current.employee_code.clone())),
            first_name: Some(self.first_name.unwrap_or_else(|| current.first_name.clone())),
            last_name: Some(self.last_name.unwrap_or_else(|| current.last_name.clone())),
            email: Some(self.email.unwrap_or_else(|| current.email.clone())),
            phone: self.phone.unwrap_or_else(|| current.phone.clone()),
            department: Some(self.department.unwrap_or_else(|| current.department.clone())),
            position: Some(self.position.unwrap_or_else(|| current.position.clone())),
            hire_date: Some(self.hire_date.unwrap_or(current.hire_date)),
            date_of_birth: self.date_of_birth.unwrap_or(current.date_of_birth),
            status: Some(self.status.unwrap_or_else(|| current.status.clone())),
            address: self
                .address
                .unwrap_or_else(|| current.address.as_ref().map(|a| a.0.clone())),
            emergency_contact: self
                .emergency_contact
                .unwrap_or_else(|| current.emergency_contact.as_ref().map(|c| c.0.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub department: Option<String>,
    pub status: Option<String>,
    /// Matches first name, last name, employee code or e-mail.
    pub search: Option<String>,
    /// Inclusive range on `hire_date`.
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl EmployeeQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
