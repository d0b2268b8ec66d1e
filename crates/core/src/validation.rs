//! Field-level validation plumbing.
//!
//! Request DTOs declare their rules with `validator` derive attributes. This
//! module supplies the custom rule functions those attributes reference
//! (enumeration membership, string patterns, money bounds, cross-field
//! checks) and flattens a [`ValidationErrors`] tree into a flat, sorted list
//! of [`FieldError`]s so every problem is reported in one response.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Key `validator` uses for struct-level (schema) errors.
const SCHEMA_KEY: &str = "__all__";

/// Param name carrying the target field of a cross-field error.
const FIELD_PARAM: &str = "field";

static EMPLOYEE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,5}-?\d{3,6}$").expect("valid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{6,19}$").expect("valid regex"));

static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]{1,9}$").expect("valid regex"));

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path to the field, e.g. `address.city`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Flatten a `validator` error tree into field errors sorted by path.
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    walk(errors, None, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn walk(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let field: &str = field.as_ref();
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    let name = if field == SCHEMA_KEY {
                        err.params
                            .get(FIELD_PARAM)
                            .and_then(|v| v.as_str())
                            .unwrap_or("body")
                            .to_string()
                    } else {
                        field.to_string()
                    };
                    let path = join_path(prefix, &name);
                    let message = describe(err);
                    out.push(FieldError::new(path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                let path = join_path(prefix, field);
                walk(inner, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    let path = join_path(prefix, &format!("{field}[{idx}]"));
                    walk(inner, Some(&path), out);
                }
            }
        }
    }
}

fn join_path(prefix: Option<&str>, field: &str) -> String {
    match prefix {
        Some(p) => format!("{p}.{field}"),
        None => field.to_string(),
    }
}

/// Human-readable message for a rule failure without an explicit message.
fn describe(err: &ValidationError) -> String {
    if let Some(msg) = &err.message {
        return msg.to_string();
    }
    match err.code.as_ref() {
        "required" => "is required".to_string(),
        "email" => "must be a valid email address".to_string(),
        "length" => match (err.params.get("min"), err.params.get("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(min), None) => format!("length must be at least {min}"),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "has an invalid length".to_string(),
        },
        "range" => match (err.params.get("min"), err.params.get("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "is out of range".to_string(),
        },
        other => format!("failed rule '{other}'"),
    }
}

// ---------------------------------------------------------------------------
// Rule helpers
// ---------------------------------------------------------------------------

/// Build a rule error with a custom message.
pub fn rule_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Build a struct-level error attributed to `field`.
pub fn cross_field_error(field: &'static str, message: &'static str) -> ValidationError {
    let mut err = rule_error("cross_field", message);
    err.add_param(Cow::Borrowed(FIELD_PARAM), &field);
    err
}

/// Check that `value` is one of `allowed`.
pub fn one_of(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(rule_error(
            "one_of",
            format!("must be one of: {}", allowed.join(", ")),
        ))
    }
}

/// Employee codes look like `ENG-0042` or `HR123`.
pub fn validate_employee_code(value: &str) -> Result<(), ValidationError> {
    if EMPLOYEE_CODE_RE.is_match(value) {
        Ok(())
    } else {
        Err(rule_error(
            "pattern",
            "must be 2-5 uppercase letters, an optional dash, then 3-6 digits",
        ))
    }
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(value) {
        Ok(())
    } else {
        Err(rule_error("pattern", "must be a valid phone number"))
    }
}

pub fn validate_postal_code(value: &str) -> Result<(), ValidationError> {
    if POSTAL_CODE_RE.is_match(value) {
        Ok(())
    } else {
        Err(rule_error("pattern", "must be a valid postal code"))
    }
}

/// Largest amount a `NUMERIC(12,2)` money column holds, in cents.
const MAX_MONEY_CENTS: i64 = 999_999_999_999;

/// Money amounts: zero or positive, at most two decimal places, and small
/// enough for a `NUMERIC(12,2)` column.
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(rule_error("range", "must not be negative"));
    }
    if value.normalize().scale() > 2 {
        return Err(rule_error("scale", "must have at most 2 decimal places"));
    }
    if *value > Decimal::new(MAX_MONEY_CENTS, 2) {
        return Err(rule_error("range", "must not exceed 9999999999.99"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Contact {
        #[validate(required, length(min = 1))]
        name: Option<String>,
        #[validate(custom(function = "validate_phone"))]
        phone: Option<String>,
    }

    #[derive(Debug, Validate)]
    #[validate(schema(function = "check_range", skip_on_field_errors = false))]
    struct Form {
        #[validate(required)]
        title: Option<String>,
        #[validate(email)]
        email: Option<String>,
        #[validate(nested)]
        contact: Option<Contact>,
        start: i32,
        end: i32,
    }

    fn check_range(form: &Form) -> Result<(), ValidationError> {
        if form.end < form.start {
            return Err(cross_field_error("end", "must not be before start"));
        }
        Ok(())
    }

    #[test]
    fn collects_every_error_not_just_the_first() {
        let form = Form {
            title: None,
            email: Some("not-an-email".into()),
            contact: Some(Contact {
                name: None,
                phone: Some("abc".into()),
            }),
            start: 5,
            end: 1,
        };
        let errors = collect_field_errors(&form.validate().unwrap_err());
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["contact.name", "contact.phone", "email", "end", "title"]
        );
    }

    #[test]
    fn required_message_is_readable() {
        let form = Form {
            title: None,
            email: None,
            contact: None,
            start: 1,
            end: 2,
        };
        let errors = collect_field_errors(&form.validate().unwrap_err());
        assert_eq!(errors, vec![FieldError::new("title", "is required")]);
    }

    #[test]
    fn one_of_lists_allowed_values() {
        let err = one_of("maybe", &["yes", "no"]).unwrap_err();
        assert_eq!(err.message.unwrap(), "must be one of: yes, no");
        assert!(one_of("yes", &["yes", "no"]).is_ok());
    }

    #[test]
    fn employee_code_pattern() {
        assert!(validate_employee_code("ENG-0042").is_ok());
        assert!(validate_employee_code("HR123").is_ok());
        assert!(validate_employee_code("eng-0042").is_err());
        assert!(validate_employee_code("E-1").is_err());
    }

    #[test]
    fn phone_and_postal_patterns() {
        assert!(validate_phone("+1 (555) 010-2030").is_ok());
        assert!(validate_phone("12").is_err());
        assert!(validate_postal_code("SW1A 1AA").is_ok());
        assert!(validate_postal_code("!!").is_err());
    }

    #[test]
    fn negative_money_is_rejected() {
        assert!(validate_money(&Decimal::new(-1, 2)).is_err());
        assert!(validate_money(&Decimal::ZERO).is_ok());
        assert!(validate_money(&Decimal::new(500, 0)).is_ok());
    }

    #[test]
    fn money_is_limited_to_cents() {
        assert!(validate_money(&Decimal::new(10050, 2)).is_ok());
        assert!(validate_money(&Decimal::new(1_005_000, 4)).is_ok());
        let err = validate_money(&Decimal::new(100_005, 3)).unwrap_err();
        assert_eq!(err.code, "scale");
    }

    #[test]
    fn money_must_fit_the_column() {
        assert!(validate_money(&Decimal::new(999_999_999_999, 2)).is_ok());
        let err = validate_money(&Decimal::new(99_999_999_999, 0)).unwrap_err();
        assert_eq!(err.code, "range");
    }
}
