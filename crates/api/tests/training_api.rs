//! HTTP-level tests for training sessions and enrolment requests.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_employee, get_auth, post_auth, post_json_auth, token_with_role};
use hrms_core::roles::ROLE_HR;
use serde_json::json;
use sqlx::PgPool;

async fn create_training(test: &common::TestApp, token: &str, capacity: i32) -> i64 {
    let response = post_json_auth(
        test.app(),
        "/api/v1/trainings",
        json!({
            "title": "Rust 101",
            "trainer": "Ferris",
            "start_date": "2024-09-02",
            "end_date": "2024-09-04",
            "capacity": capacity
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "scheduled");
    json["data"]["id"].as_i64().unwrap()
}

async fn request_seat(test: &common::TestApp, token: &str, employee_id: i64, training_id: i64) -> i64 {
    let response = post_json_auth(
        test.app(),
        "/api/v1/training-requests",
        json!({ "employee_id": employee_id, "training_id": training_id }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn approvals_stop_at_capacity(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;
    let training_id = create_training(&test, &token, 1).await;
    let first = create_employee(&test, &token, "TRN-400").await;
    let second = create_employee(&test, &token, "TRN-401").await;

    let first_request = request_seat(&test, &token, first, training_id).await;
    let second_request = request_seat(&test, &token, second, training_id).await;

    let response = post_auth(
        test.app(),
        &format!("/api/v1/training-requests/{first_request}/approve"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_auth(
        test.app(),
        &format!("/api/v1/training-requests/{second_request}/approve"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "CONFLICT");
    assert_eq!(
        json["message"],
        "Training 'Rust 101' is full (1/1 seats approved)"
    );

    // Completing an approved request is allowed; completing twice is not.
    let uri = format!("/api/v1/training-requests/{first_request}/complete");
    assert_eq!(post_auth(test.app(), &uri, &token).await.status(), StatusCode::OK);
    assert_eq!(
        post_auth(test.app(), &uri, &token).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn one_request_per_employee_and_training(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;
    let training_id = create_training(&test, &token, 10).await;
    let employee_id = create_employee(&test, &token, "TRN-402").await;
    request_seat(&test, &token, employee_id, training_id).await;

    let response = post_json_auth(
        test.app(),
        "/api/v1/training-requests",
        json!({ "employee_id": employee_id, "training_id": training_id }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Training request for this employee and training already exists"
    );

    let response = get_auth(test.app(), "/api/v1/trainings/stats", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["requests_by_status"]["pending"], 1);
}
