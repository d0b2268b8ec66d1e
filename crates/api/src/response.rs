//! Shared response envelope types for API handlers.
//!
//! Every successful response is `{ "success": true, "data": ... }`, with
//! `message` on acknowledgements and `pagination` on list endpoints. Errors
//! use the matching shape produced by [`crate::error::AppError`].

use axum::http::StatusCode;
use axum::Json;
use hrms_core::pagination::{PageRequest, Pagination};
use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            pagination: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// A page of records plus `{page, limit, total, pages}`.
    pub fn page(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            pagination: Some(Pagination::new(request, total)),
            ..Self::ok(data)
        }
    }
}

/// `Json(ApiResponse)` shorthand for handler signatures.
pub type JsonResponse<T> = Json<ApiResponse<T>>;

/// 201 Created with the new record.
pub type Created<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn ok<T: Serialize>(data: T) -> JsonResponse<T> {
    Json(ApiResponse::ok(data))
}

pub fn created<T: Serialize>(data: T, message: &str) -> Created<T> {
    (
        StatusCode::CREATED,
        Json(ApiResponse::with_message(data, message)),
    )
}

/// Acknowledgement without a payload, e.g. after a delete.
pub fn ack(message: &str) -> JsonResponse<Option<()>> {
    Json(ApiResponse::with_message(None, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_envelope_carries_pagination() {
        let body = serde_json::to_value(ApiResponse::page(
            vec![1, 2],
            PageRequest::new(Some(1), Some(2)),
            5,
        ))
        .unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(
            body["pagination"],
            json!({ "page": 1, "limit": 2, "total": 5, "pages": 3 })
        );
        assert!(body.get("message").is_none());
    }

    #[test]
    fn ack_has_null_data() {
        let Json(body) = ack("Employee deleted");
        let body = serde_json::to_value(body).unwrap();
        assert_eq!(body["data"], serde_json::Value::Null);
        assert_eq!(body["message"], "Employee deleted");
    }
}
