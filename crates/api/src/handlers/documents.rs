//! Handlers for the `/documents` resource.
//!
//! Creation is a multipart upload: a `file` part plus the text fields
//! `employee_id`, `title`, `document_type` and optional `description`.
//! The metadata is validated before anything is written to disk.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use hrms_core::audit::{actions, entities};
use hrms_core::error::CoreError;
use hrms_core::types::DbId;
use hrms_core::validation::{collect_field_errors, FieldError};
use hrms_db::models::document::{CreateDocument, DocumentDetail, DocumentQuery, UpdateDocument};
use hrms_db::populate;
use hrms_db::repositories::DocumentRepo;
use serde_json::json;
use validator::Validate;

use super::not_found;
use crate::audit;
use crate::error::AppResult;
use crate::extract::{self, JsonBody, Query};
use crate::middleware::rbac::{RequireAuth, RequireHr};
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;
use crate::upload::{read_multipart, remove_stored, store_image, MultipartForm};

/// Upload subdirectory for document files.
const DOCUMENT_DIR: &str = "documents";

/// Build and validate the metadata DTO from the text parts of the form.
///
/// An unparseable `employee_id` is reported alongside every other field
/// error rather than on its own.
fn metadata_from_form(form: &MultipartForm) -> Result<CreateDocument, CoreError> {
    let mut errors = Vec::new();
    let employee_id = match form.field("employee_id").map(|raw| raw.trim().parse::<DbId>()) {
        Some(Ok(id)) => Some(id),
        Some(Err(_)) => {
            errors.push(FieldError::new("employee_id", "must be an integer"));
            None
        }
        None => None,
    };
    let employee_id_unparsed = !errors.is_empty();

    let input = CreateDocument {
        employee_id,
        title: form.field("title").map(str::to_string),
        document_type: form.field("document_type").map(str::to_string),
        description: form.field("description").map(str::to_string),
    };

    if let Err(validation) = input.validate() {
        errors.extend(
            collect_field_errors(&validation)
                .into_iter()
                .filter(|e| !(employee_id_unparsed && e.field == "employee_id")),
        );
    }
    if errors.is_empty() {
        return Ok(input);
    }
    errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    Err(CoreError::InvalidFields(errors))
}

/// POST /api/v1/documents
pub async fn upload_document(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    multipart: Multipart,
) -> AppResult<Created<DocumentDetail>> {
    let form = read_multipart(multipart).await?;
    let input = metadata_from_form(&form)?;
    let file = form.require_file()?;

    let stored = store_image(&state.config.upload_dir, DOCUMENT_DIR, "doc", file).await?;
    let document = match DocumentRepo::create(&state.pool, &input, &stored, user.user_id).await {
        Ok(document) => document,
        Err(e) => {
            remove_stored(&state.config.upload_dir, &stored.file_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        document_id = document.id,
        employee_id = document.employee_id,
        size = document.size_bytes,
        "Document uploaded"
    );
    audit::record(
        &state.pool,
        &user,
        actions::UPLOAD,
        entities::DOCUMENT,
        Some(document.id),
        Some(json!({
            "employee_id": document.employee_id,
            "document_type": document.document_type,
            "file_name": document.file_name,
        })),
    )
    .await;

    let detail = populate::document(&state.pool, document).await?;
    Ok(created(detail, "Document uploaded"))
}

/// GET /api/v1/documents
///
/// Filters: `employee_id`, `document_type`, `search` (title, file name).
pub async fn list_documents(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<DocumentQuery>,
) -> AppResult<JsonResponse<Vec<DocumentDetail>>> {
    let page = params.page_request();
    let rows = DocumentRepo::list(&state.pool, &params, page).await?;
    let total = DocumentRepo::count(&state.pool, &params).await?;
    let data = populate::documents(&state.pool, rows).await?;
    Ok(Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<DocumentDetail>> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Document", id))?;
    Ok(ok(populate::document(&state.pool, document).await?))
}

/// PUT /api/v1/documents/{id}
///
/// Metadata only; the stored file is replaced by uploading a new document.
pub async fn update_document(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateDocument>,
) -> AppResult<JsonResponse<DocumentDetail>> {
    let current = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Document", id))?;

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let document = DocumentRepo::update(&state.pool, id, &merged)
        .await?
        .ok_or_else(|| not_found("Document", id))?;

    tracing::info!(document_id = id, user_id = user.user_id, "Document updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::DOCUMENT,
        Some(id),
        None,
    )
    .await;

    Ok(ok(populate::document(&state.pool, document).await?))
}

/// DELETE /api/v1/documents/{id}
///
/// Removes the row, then the stored file.
pub async fn delete_document(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Document", id))?;
    if !DocumentRepo::delete(&state.pool, id).await? {
        return Err(not_found("Document", id));
    }
    remove_stored(&state.config.upload_dir, &document.file_path).await;

    tracing::info!(document_id = id, user_id = user.user_id, "Document deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::DOCUMENT,
        Some(id),
        Some(json!({ "file_name": document.file_name })),
    )
    .await;

    Ok(ack("Document deleted"))
}
