//! Upload constraints for image attachments (employee photos, documents).

use crate::error::CoreError;

/// Maximum accepted upload size (5 MB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Accepted MIME types and the extension stored files get.
pub const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// File extension for an accepted MIME type.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
        .map(|(_, ext)| *ext)
}

/// Reject anything that is not an allowed image or is larger than
/// [`MAX_UPLOAD_BYTES`]. Empty files are rejected too.
pub fn validate_image(content_type: Option<&str>, size: usize) -> Result<&'static str, CoreError> {
    let content_type = content_type
        .ok_or_else(|| CoreError::Validation("Uploaded file has no content type".into()))?;
    let ext = extension_for(content_type).ok_or_else(|| {
        CoreError::Validation(format!(
            "Unsupported file type '{content_type}'. Allowed: {}",
            ALLOWED_IMAGE_TYPES
                .iter()
                .map(|(mime, _)| *mime)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;
    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "File exceeds the {} MB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    Ok(ext)
}

/// Generated storage name: `<prefix>-<uuid>.<ext>`.
pub fn stored_file_name(prefix: &str, ext: &str) -> String {
    format!("{prefix}-{}.{ext}", uuid::Uuid::new_v4().simple())
}

/// Strip any directory components and unsafe characters from a
/// client-supplied file name, keeping it for display only.
pub fn sanitize_original_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.chars().take(255).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn png_is_accepted() {
        assert_eq!(validate_image(Some("image/png"), 1024).unwrap(), "png");
    }

    #[test]
    fn parameters_in_content_type_are_ignored() {
        assert_eq!(extension_for("image/JPEG; charset=binary"), Some("jpg"));
    }

    #[test]
    fn non_image_is_rejected() {
        assert_matches!(
            validate_image(Some("application/pdf"), 10),
            Err(CoreError::Validation(msg)) if msg.contains("Unsupported")
        );
    }

    #[test]
    fn oversize_is_rejected() {
        assert!(validate_image(Some("image/png"), MAX_UPLOAD_BYTES).is_ok());
        assert_matches!(
            validate_image(Some("image/png"), MAX_UPLOAD_BYTES + 1),
            Err(CoreError::Validation(msg)) if msg.contains("5 MB")
        );
    }

    #[test]
    fn missing_content_type_is_rejected() {
        assert!(validate_image(None, 10).is_err());
    }

    #[test]
    fn stored_names_are_unique() {
        let a = stored_file_name("doc", "png");
        let b = stored_file_name("doc", "png");
        assert_ne!(a, b);
        assert!(a.starts_with("doc-") && a.ends_with(".png"));
    }

    #[test]
    fn original_names_lose_paths() {
        assert_eq!(sanitize_original_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_original_name("C:\\tmp\\scan 1.png"), "scan 1.png");
        assert_eq!(sanitize_original_name("///"), "upload");
    }
}
