//! HTTP-level tests for employee photos and document uploads.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_employee, delete_auth, get, get_auth, post_multipart_auth, token_with_role,
};
use hrms_core::roles::ROLE_HR;
use hrms_core::upload::MAX_UPLOAD_BYTES;
use sqlx::PgPool;

/// The 8-byte PNG signature; contents are not decoded.
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n";

#[sqlx::test(migrations = "../db/migrations")]
async fn photo_is_stored_and_served(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;
    let id = create_employee(&test, &token, "IMG-500").await;

    let response = post_multipart_auth(
        test.app(),
        &format!("/api/v1/employees/{id}/photo"),
        "file",
        "me.png",
        "image/png",
        PNG_BYTES,
        &[],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let path = json["data"]["photo_path"].as_str().unwrap().to_string();
    assert!(path.starts_with("photos/photo-") && path.ends_with(".png"));
    assert!(test.config.upload_dir.join(&path).exists());

    let response = get(test.app(), &format!("/uploads/{path}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = get_auth(test.app(), &format!("/uploads/{path}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Deleting the employee removes the stored photo.
    let response = delete_auth(test.app(), &format!("/api/v1/employees/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!test.config.upload_dir.join(&path).exists());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_images_are_rejected(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;
    let id = create_employee(&test, &token, "IMG-501").await;

    let response = post_multipart_auth(
        test.app(),
        &format!("/api/v1/employees/{id}/photo"),
        "file",
        "cv.pdf",
        "application/pdf",
        b"%PDF-1.7",
        &[],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "VALIDATION_ERROR");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Unsupported file type 'application/pdf'"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn oversize_images_are_rejected(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;
    let id = create_employee(&test, &token, "IMG-502").await;

    let too_big = vec![0u8; MAX_UPLOAD_BYTES + 1];
    let response = post_multipart_auth(
        test.app(),
        &format!("/api/v1/employees/{id}/photo"),
        "file",
        "huge.jpg",
        "image/jpeg",
        &too_big,
        &[],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "File exceeds the 5 MB limit"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn document_upload_with_metadata(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;
    let employee_id = create_employee(&test, &token, "IMG-503").await;
    let employee_field = employee_id.to_string();

    let response = post_multipart_auth(
        test.app(),
        "/api/v1/documents",
        "file",
        "../../contract scan.png",
        "image/png",
        PNG_BYTES,
        &[
            ("employee_id", employee_field.as_str()),
            ("title", "Employment contract"),
            ("document_type", "contract"),
        ],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Document uploaded");
    assert_eq!(json["data"]["file_name"], "contract scan.png");
    assert_eq!(json["data"]["mime_type"], "image/png");
    assert_eq!(json["data"]["size_bytes"], PNG_BYTES.len());
    assert!(json["data"]["file_path"]
        .as_str()
        .unwrap()
        .starts_with("documents/doc-"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn document_metadata_is_validated(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;

    let response = post_multipart_auth(
        test.app(),
        "/api/v1/documents",
        "file",
        "scan.png",
        "image/png",
        PNG_BYTES,
        &[("employee_id", "abc")],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["document_type", "employee_id", "title"]);
    assert_eq!(json["errors"][1]["message"], "must be an integer");
}
