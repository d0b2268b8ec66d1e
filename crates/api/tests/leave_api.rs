//! HTTP-level tests for leave and separation request workflows.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_employee, create_user, get_auth, post_auth, post_json_auth, put_json_auth,
    token_with_role,
};
use hrms_core::roles::{ROLE_EMPLOYEE, ROLE_HR};
use serde_json::json;
use sqlx::PgPool;

fn leave_body(employee_id: i64) -> serde_json::Value {
    json!({
        "employee_id": employee_id,
        "leave_type": "annual",
        "start_date": "2024-05-06",
        "end_date": "2024-05-10",
        "reason": "Family holiday"
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn leave_request_lifecycle(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let hr = create_user(&pool, "hr.reviewer", ROLE_HR).await;
    let token = test.token_for(&hr);
    let employee_id = create_employee(&test, &token, "FIN-200").await;

    let response =
        post_json_auth(test.app(), "/api/v1/leave-requests", leave_body(employee_id), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["days"], 5);
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        test.app(),
        &format!("/api/v1/leave-requests/{id}/approve"),
        json!({ "comment": "Enjoy" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "approved");
    assert_eq!(json["data"]["review_comment"], "Enjoy");
    assert_eq!(json["data"]["reviewed_by"], hr.id);
    assert!(json["data"]["reviewed_at"].is_string());

    // A decided request cannot be decided again.
    let response = post_auth(
        test.app(),
        &format!("/api/v1/leave-requests/{id}/reject"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "CONFLICT");
    assert_eq!(
        json["message"],
        "Leave request cannot move from 'approved' to 'rejected'"
    );

    // Nor edited.
    let response = put_json_auth(
        test.app(),
        &format!("/api/v1/leave-requests/{id}"),
        json!({ "reason": "Changed my mind" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn end_before_start_is_reported_on_end_date(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;
    let employee_id = create_employee(&test, &token, "FIN-201").await;

    let mut body = leave_body(employee_id);
    body["end_date"] = json!("2024-05-01");
    let response = post_json_auth(test.app(), "/api/v1/leave-requests", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "end_date");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn employees_file_leave_only_for_themselves(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let hr_token = token_with_role(&test, &pool, ROLE_HR).await;
    let staff = create_user(&pool, "staff.member", ROLE_EMPLOYEE).await;
    let staff_token = test.token_for(&staff);

    let own_id = create_employee(&test, &hr_token, "FIN-202").await;
    let other_id = create_employee(&test, &hr_token, "FIN-203").await;
    let response = put_json_auth(
        test.app(),
        &format!("/api/v1/employees/{own_id}"),
        json!({ "user_id": staff.id }),
        &hr_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        test.app(),
        "/api/v1/leave-requests",
        leave_body(other_id),
        &staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        test.app(),
        "/api/v1/leave-requests",
        leave_body(own_id),
        &staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Approval stays with HR.
    let response = post_auth(
        test.app(),
        &format!("/api/v1/leave-requests/{id}/approve"),
        &staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn leave_stats_sum_approved_days(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;
    let employee_id = create_employee(&test, &token, "FIN-204").await;

    let response =
        post_json_auth(test.app(), "/api/v1/leave-requests", leave_body(employee_id), &token).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    post_auth(
        test.app(),
        &format!("/api/v1/leave-requests/{id}/approve"),
        &token,
    )
    .await;

    let mut pending = leave_body(employee_id);
    pending["leave_type"] = json!("sick");
    pending["start_date"] = json!("2024-06-03");
    pending["end_date"] = json!("2024-06-03");
    post_json_auth(test.app(), "/api/v1/leave-requests", pending, &token).await;

    let response = get_auth(test.app(), "/api/v1/leave-requests/stats", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["by_status"]["approved"], 1);
    assert_eq!(json["data"]["by_status"]["pending"], 1);
    assert_eq!(json["data"]["by_type"]["sick"], 1);
    assert_eq!(json["data"]["approved_days"], 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn processing_a_separation_terminates_the_employee(pool: PgPool) {
    let test = common::build_test_app(pool.clone());
    let token = token_with_role(&test, &pool, ROLE_HR).await;
    let employee_id = create_employee(&test, &token, "FIN-205").await;

    let response = post_json_auth(
        test.app(),
        "/api/v1/separation-requests",
        json!({
            "employee_id": employee_id,
            "separation_type": "resignation",
            "reason": "Relocating",
            "notice_date": "2024-07-01",
            "last_working_day": "2024-07-31"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Processing requires approval first.
    let response = post_auth(
        test.app(),
        &format!("/api/v1/separation-requests/{id}/process"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_auth(
        test.app(),
        &format!("/api/v1/separation-requests/{id}/approve"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        test.app(),
        &format!("/api/v1/separation-requests/{id}/process"),
        json!({ "comment": "Exit interview done" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "processed");

    let response = get_auth(
        test.app(),
        &format!("/api/v1/employees/{employee_id}"),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["status"], "terminated");
}
