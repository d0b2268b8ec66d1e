use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hrms_core::error::CoreError;
use hrms_core::validation::FieldError;
use serde::Serialize;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the standard error envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `hrms_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A malformed request (unparseable body, broken multipart stream).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message for the log.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// `{ success: false, message, error, errors? }`
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

struct Classified {
    status: StatusCode,
    code: &'static str,
    message: String,
    errors: Option<Vec<FieldError>>,
}

impl Classified {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            errors: None,
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let classified = match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(&err),
            AppError::BadRequest(msg) => Classified::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Classified::internal()
            }
        };

        let body = ErrorBody {
            success: false,
            message: classified.message,
            error: classified.code,
            errors: classified.errors,
        };

        (classified.status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: CoreError) -> Classified {
    match err {
        CoreError::NotFound { entity, id } => Classified::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Classified::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
        }
        CoreError::InvalidFields(errors) => Classified {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: "Validation failed".to_string(),
            errors: Some(errors),
        },
        CoreError::Conflict(msg) => Classified::new(StatusCode::BAD_REQUEST, "CONFLICT", msg),
        CoreError::Unauthorized(msg) => {
            Classified::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
        }
        CoreError::Forbidden(msg) => Classified::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg),
        CoreError::Configuration(msg) => {
            tracing::error!(error = %msg, "Configuration error");
            Classified::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                "Server is not configured to handle this request",
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            Classified::internal()
        }
    }
}

/// Classify a sqlx error into the response envelope.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (`23505`) map to a 400 conflict naming the duplicate.
/// - Foreign key violations (`23503`) on insert/update map to a 400
///   validation error on the referencing column; on delete they map to a
///   400 conflict because the row is still referenced.
/// - Check violations (`23514`) map to a 400 validation error.
/// - Out-of-range (`22003`) and malformed (`22P02`) values map to a 400
///   validation error.
/// - Everything else maps to 500 with a redacted message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => {
            Classified::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => Classified::new(
                StatusCode::BAD_REQUEST,
                "CONFLICT",
                duplicate_message(db_err.constraint().unwrap_or_default()),
            ),
            Some("23503") if db_err.message().starts_with("update or delete") => {
                Classified::new(
                    StatusCode::BAD_REQUEST,
                    "CONFLICT",
                    format!(
                        "Cannot delete {}: it is still referenced by other records",
                        singular(first_quoted(db_err.message()).unwrap_or("records"))
                    ),
                )
            }
            Some("23503") => {
                let field = referencing_column(
                    db_err.table().unwrap_or_default(),
                    db_err.constraint().unwrap_or_default(),
                );
                Classified {
                    status: StatusCode::BAD_REQUEST,
                    code: "VALIDATION_ERROR",
                    message: "Validation failed".to_string(),
                    errors: Some(vec![FieldError::new(
                        field,
                        "references a record that does not exist",
                    )]),
                }
            }
            Some("23514") => Classified::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!(
                    "Value violates constraint {}",
                    db_err.constraint().unwrap_or("unknown")
                ),
            ),
            Some("22003") | Some("22P02") => Classified::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Value is out of range or malformed",
            ),
            _ => {
                tracing::error!(error = %db_err, "Database error");
                Classified::internal()
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            Classified::internal()
        }
    }
}

/// Human message for a unique constraint, keyed by the `uq_` names the
/// migrations declare.
fn duplicate_message(constraint: &str) -> String {
    let message = match constraint {
        "uq_users_username" => "Username already exists",
        "uq_users_email" => "User email already exists",
        "uq_employees_employee_code" => "Employee code already exists",
        "uq_employees_email" => "Employee email already exists",
        "uq_employees_user_id" => "User account is already linked to another employee",
        "uq_attendance_employee_date" => {
            "Attendance for this employee on this date already exists"
        }
        "uq_training_requests_employee_training" => {
            "Training request for this employee and training already exists"
        }
        "uq_salaries_employee_period" => {
            "Salary for this employee and pay period already exists"
        }
        "uq_assets_serial_number" => "Asset serial number already exists",
        "uq_candidates_posting_email" => {
            "Candidate with this email already applied to this job posting"
        }
        _ => "Record already exists",
    };
    message.to_string()
}

/// PostgreSQL names unnamed foreign keys `<table>_<column>_fkey`.
fn referencing_column(table: &str, constraint: &str) -> String {
    constraint
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix("_fkey"))
        .unwrap_or("reference")
        .to_string()
}

/// The first `"..."` segment of a PostgreSQL message, which for delete-side
/// foreign key violations names the table being deleted from.
fn first_quoted(message: &str) -> Option<&str> {
    let start = message.find('"')? + 1;
    let len = message[start..].find('"')?;
    Some(&message[start..start + len])
}

fn singular(table: &str) -> String {
    let name = match table.strip_suffix("ies") {
        Some(stem) => format!("{stem}y"),
        None => table.strip_suffix('s').unwrap_or(table).to_string(),
    };
    name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fk_column_is_recovered_from_constraint_name() {
        assert_eq!(
            referencing_column("leave_requests", "leave_requests_employee_id_fkey"),
            "employee_id"
        );
        assert_eq!(referencing_column("assets", "custom_fk"), "reference");
    }

    #[test]
    fn deleted_table_is_read_from_message() {
        let msg = "update or delete on table \"employees\" violates foreign key \
                   constraint \"leave_requests_employee_id_fkey\" on table \"leave_requests\"";
        assert_eq!(first_quoted(msg), Some("employees"));
        assert_eq!(first_quoted("no quotes"), None);
    }

    #[test]
    fn table_names_read_as_singular_nouns() {
        assert_eq!(singular("employees"), "employee");
        assert_eq!(singular("job_postings"), "job posting");
        assert_eq!(singular("attendance"), "attendance");
        assert_eq!(singular("salaries"), "salary");
    }

    #[test]
    fn unknown_constraint_has_generic_message() {
        assert_eq!(duplicate_message("uq_nope"), "Record already exists");
        assert_eq!(
            duplicate_message("uq_assets_serial_number"),
            "Asset serial number already exists"
        );
    }
}
