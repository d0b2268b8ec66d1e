//! HTTP-level tests for login, token checks, role gates and account lockout.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, get, get_auth, post_auth, post_json, post_json_auth, TEST_PASSWORD,
};
use hrms_core::roles::{ROLE_ADMIN, ROLE_EMPLOYEE, ROLE_HR};
use hrms_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

async fn login(test: &common::TestApp, username: &str, password: &str) -> axum::response::Response {
    post_json(
        test.app(),
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_success_returns_token_and_user(pool: PgPool) {
    let user = create_user(&pool, "hr.lead", ROLE_HR).await;
    let test = common::build_test_app(pool);

    let response = login(&test, "hr.lead", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["expires_in"], 3600);
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["role"], "hr");
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_password_and_unknown_user_look_the_same(pool: PgPool) {
    create_user(&pool, "someone", ROLE_EMPLOYEE).await;
    let test = common::build_test_app(pool);

    let wrong = login(&test, "someone", "not-the-password-1").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong = body_json(wrong).await;

    let ghost = login(&test, "ghost", "whatever-123").await;
    assert_eq!(ghost.status(), StatusCode::UNAUTHORIZED);
    let ghost = body_json(ghost).await;

    assert_eq!(wrong["message"], ghost["message"]);
    assert_eq!(wrong["error"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deactivated_account_cannot_log_in(pool: PgPool) {
    let user = create_user(&pool, "leaver", ROLE_EMPLOYEE).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let test = common::build_test_app(pool);

    let response = login(&test, "leaver", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn five_failures_lock_the_account(pool: PgPool) {
    create_user(&pool, "guesser", ROLE_EMPLOYEE).await;
    let test = common::build_test_app(pool.clone());

    for _ in 0..5 {
        let response = login(&test, "guesser", "bad-guess-000").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let response = login(&test, "guesser", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let user = UserRepo::find_by_username(&pool, "guesser")
        .await
        .unwrap()
        .unwrap();
    assert!(user.locked_until.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn successful_login_resets_failure_counter(pool: PgPool) {
    create_user(&pool, "forgetful", ROLE_EMPLOYEE).await;
    let test = common::build_test_app(pool.clone());

    for _ in 0..3 {
        login(&test, "forgetful", "bad-guess-000").await;
    }
    let response = login(&test, "forgetful", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = UserRepo::find_by_username(&pool, "forgetful")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.failed_login_count, 0);
    assert!(user.last_login_at.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_without_token_is_401(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = get(test.app(), "/api/v1/employees").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(test.app(), "/api/v1/employees", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_returns_current_user(pool: PgPool) {
    let user = create_user(&pool, "self.check", ROLE_EMPLOYEE).await;
    let test = common::build_test_app(pool);
    let token = test.token_for(&user);

    let response = get_auth(test.app(), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["username"], "self.check");
    assert!(json["data"]["employee"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn role_gates_are_enforced(pool: PgPool) {
    let employee = create_user(&pool, "plain.staff", ROLE_EMPLOYEE).await;
    let hr = create_user(&pool, "hr.staff", ROLE_HR).await;
    let test = common::build_test_app(pool);
    let employee_token = test.token_for(&employee);
    let hr_token = test.token_for(&hr);

    // Employees cannot create employees.
    let response = post_json_auth(
        test.app(),
        "/api/v1/employees",
        common::employee_body("ENG-001", "x@corp.test"),
        &employee_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "FORBIDDEN");

    // HR cannot manage user accounts.
    let response = get_auth(test.app(), "/api/v1/admin/users", &hr_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Salary data is HR-only.
    let response = get_auth(test.app(), "/api/v1/salaries", &employee_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reads are open to any authenticated user.
    let response = get_auth(test.app(), "/api/v1/employees", &employee_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_user_management(pool: PgPool) {
    let admin = create_user(&pool, "root.admin", ROLE_ADMIN).await;
    let test = common::build_test_app(pool);
    let token = test.token_for(&admin);

    // Weak passwords are reported on the password field.
    let response = post_json_auth(
        test.app(),
        "/api/v1/admin/users",
        json!({
            "username": "weakling",
            "email": "weak@test.com",
            "password": "onlyletters",
            "role": "employee"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "VALIDATION_ERROR");
    assert_eq!(json["errors"][0]["field"], "password");

    let response = post_json_auth(
        test.app(),
        "/api/v1/admin/users",
        json!({
            "username": "new.hire",
            "email": "new.hire@test.com",
            "password": "welcome-2024",
            "role": "employee"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let new_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Duplicate usernames are a conflict.
    let response = post_json_auth(
        test.app(),
        "/api/v1/admin/users",
        json!({
            "username": "new.hire",
            "email": "other@test.com",
            "password": "welcome-2024",
            "role": "employee"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "CONFLICT");
    assert_eq!(json["message"], "Username already exists");

    // Admins cannot deactivate themselves.
    let response = post_auth(
        test.app(),
        &format!("/api/v1/admin/users/{}/deactivate", admin.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_auth(
        test.app(),
        &format!("/api/v1/admin/users/{new_id}/deactivate"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_active"], false);
}
