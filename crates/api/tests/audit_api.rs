//! HTTP-level tests for the audit trail and its hash chain.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_employee, create_user, get_auth, post_json_forwarded, token_with_role,
    TEST_PASSWORD,
};
use serde_json::json;
use hrms_core::roles::{ROLE_ADMIN, ROLE_HR};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn mutations_are_audited(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let admin = create_user(&pool, "auditor", ROLE_ADMIN).await;
    let token = test.token_for(&admin);
    let id = create_employee(&test, &token, "AUD-600").await;

    let response = get_auth(
        test.app(),
        "/api/v1/admin/audit-logs?entity_type=employee",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 1);
    let entry = &json["data"][0];
    assert_eq!(entry["action"], "create");
    assert_eq!(entry["entity_id"], id);
    assert_eq!(entry["user_id"], admin.id);
    assert_eq!(entry["integrity_hash"].as_str().unwrap().len(), 64);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_entry_records_client_address(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let admin = create_user(&pool, "gatekeeper", ROLE_ADMIN).await;

    let response = post_json_forwarded(
        test.app(),
        "/api/v1/auth/login",
        json!({ "username": "gatekeeper", "password": TEST_PASSWORD }),
        "198.51.100.23, 10.0.0.2",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = test.token_for(&admin);
    let response = get_auth(test.app(), "/api/v1/admin/audit-logs?action=login", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["user_id"], admin.id);
    assert_eq!(json["data"][0]["ip_address"], "198.51.100.23");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn audit_logs_are_admin_only(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;

    let response = get_auth(test.app(), "/api/v1/admin/audit-logs", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn integrity_check_detects_tampering(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_ADMIN).await;
    for code in ["AUD-601", "AUD-602", "AUD-603"] {
        create_employee(&test, &token, code).await;
    }

    let uri = "/api/v1/admin/audit-logs/integrity-check";
    let json = body_json(get_auth(test.app(), uri, &token).await).await;
    assert_eq!(json["data"]["chain_valid"], true);
    assert_eq!(json["data"]["verified_entries"], 3);
    assert!(json["data"]["first_break"].is_null());

    let tampered: i64 = sqlx::query_scalar(
        "UPDATE audit_logs SET action = 'delete'
         WHERE id = (SELECT id FROM audit_logs ORDER BY id LIMIT 1 OFFSET 1)
         RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let json = body_json(get_auth(test.app(), uri, &token).await).await;
    assert_eq!(json["data"]["chain_valid"], false);
    assert_eq!(json["data"]["first_break"], tampered);
}
