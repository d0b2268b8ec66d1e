//! Multipart parsing and image storage for photo and document uploads.

use std::collections::HashMap;
use std::path::Path;

use axum::body::Bytes;
use axum::extract::Multipart;
use hrms_core::upload::{sanitize_original_name, stored_file_name, validate_image};
use hrms_db::models::document::StoredFile;

use crate::error::{AppError, AppResult};

/// Name of the multipart part carrying the file.
pub const FILE_FIELD: &str = "file";

/// The file part of a multipart request.
#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A parsed multipart form: at most one file plus plain text fields.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl MultipartForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// The file part, or a validation error when it is missing.
    pub fn require_file(&self) -> AppResult<&UploadedFile> {
        self.file.as_ref().ok_or_else(|| {
            AppError::Core(hrms_core::error::CoreError::Validation(format!(
                "Multipart field '{FILE_FIELD}' is required"
            )))
        })
    }
}

/// Drain a multipart stream into memory.
pub async fn read_multipart(mut multipart: Multipart) -> AppResult<MultipartForm> {
    let mut form = MultipartForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == FILE_FIELD {
            let original_name = sanitize_original_name(field.file_name().unwrap_or_default());
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            form.file = Some(UploadedFile {
                original_name,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            form.fields.insert(name, value);
        }
    }
    Ok(form)
}

/// Validate an image and write it to `<upload_dir>/<subdir>/<generated name>`.
///
/// The returned `file_path` is relative to the upload root, which is also
/// the path under `/uploads` the file is served from.
pub async fn store_image(
    upload_dir: &Path,
    subdir: &str,
    prefix: &str,
    file: &UploadedFile,
) -> AppResult<StoredFile> {
    let ext = validate_image(file.content_type.as_deref(), file.bytes.len())?;
    let generated = stored_file_name(prefix, ext);

    let dir = upload_dir.join(subdir);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create {}: {e}", dir.display())))?;

    let target = dir.join(&generated);
    tokio::fs::write(&target, &file.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write {}: {e}", target.display())))?;

    tracing::debug!(path = %target.display(), size = file.bytes.len(), "Stored upload");

    Ok(StoredFile {
        file_name: file.original_name.clone(),
        file_path: format!("{subdir}/{generated}"),
        mime_type: file
            .content_type
            .clone()
            .unwrap_or_default(),
        size_bytes: file.bytes.len() as i64,
    })
}

/// Remove a stored file, logging instead of failing when it is already gone.
pub async fn remove_stored(upload_dir: &Path, relative_path: &str) {
    let path = upload_dir.join(relative_path);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(len: usize) -> UploadedFile {
        UploadedFile {
            original_name: "scan.png".into(),
            content_type: Some("image/png".into()),
            bytes: Bytes::from(vec![0u8; len]),
        }
    }

    #[tokio::test]
    async fn stores_under_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let stored = store_image(dir.path(), "documents", "doc", &png(16)).await.unwrap();
        assert!(stored.file_path.starts_with("documents/doc-"));
        assert!(stored.file_path.ends_with(".png"));
        assert_eq!(stored.size_bytes, 16);
        assert!(dir.path().join(&stored.file_path).exists());

        remove_stored(dir.path(), &stored.file_path).await;
        assert!(!dir.path().join(&stored.file_path).exists());
    }

    #[tokio::test]
    async fn rejects_non_images_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let file = UploadedFile {
            content_type: Some("text/plain".into()),
            ..png(4)
        };
        assert!(store_image(dir.path(), "photos", "photo", &file).await.is_err());
        assert!(!dir.path().join("photos").exists());
    }
}
