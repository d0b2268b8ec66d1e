//! Employee document model and DTOs.
//!
//! The file itself lives under the upload directory; the row keeps its
//! stored path plus the metadata captured at upload time.

use hrms_core::document::validate_type;
use hrms_core::pagination::PageRequest;
use hrms_core::types::{nullable, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::common::{EmployeeSummary, UserSummary};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub employee_id: DbId,
    pub title: String,
    pub document_type: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentDetail {
    #[serde(flatten)]
    pub document: Document,
    pub employee: Option<EmployeeSummary>,
    pub uploader: Option<UserSummary>,
}

/// Metadata fields sent alongside the uploaded file.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateDocument {
    #[validate(required)]
    pub employee_id: Option<DbId>,
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(required, custom(function = "validate_type"))]
    pub document_type: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// The stored file backing a document.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub document_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl UpdateDocument {
    pub fn apply_to(self, current: &Document) -> CreateDocument {
        CreateDocument {
            employee_id: Some(current.employee_id),
            title: Some(self.title.unwrap_or_else(|| current.title.clone())),
            document_type: Some(
                self.document_type
                    .unwrap_or_else(|| current.document_type.clone()),
            ),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub employee_id: Option<DbId>,
    pub document_type: Option<String>,
    /// Matches title or original file name.
    pub search: Option<String>,
}

impl DocumentQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
