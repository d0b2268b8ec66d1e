#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use hrms_api::auth::jwt::{generate_access_token, JwtConfig};
use hrms_api::auth::password::hash_password;
use hrms_api::config::{LogFormat, ServerConfig};
use hrms_api::router::build_app_router;
use hrms_api::state::AppState;
use hrms_db::models::user::{CreateUser, User};
use hrms_db::repositories::UserRepo;

/// Password given to every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "Sup3r-secret!";

/// Build a test `ServerConfig` with safe defaults and the given upload root.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: Some("integration-test-secret".to_string()),
            access_token_expiry_mins: 60,
        },
    }
}

/// A router plus the config it was built with. Holds the temporary upload
/// directory so it lives as long as the test.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    _uploads: tempfile::TempDir,
}

impl TestApp {
    /// A fresh clone of the router for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Issue an access token for `user` signed with this app's secret.
    pub fn token_for(&self, user: &User) -> String {
        generate_access_token(user.id, &user.role, &self.config.jwt).unwrap()
    }
}

/// Build the full application router (the same middleware stack
/// production uses) around the given database pool.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let config = test_config(uploads.path());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    TestApp {
        router: build_app_router(state, &config),
        config,
        _uploads: uploads,
    }
}

/// Create a user directly in the database with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap()
}

/// Create a user with `role` and return a bearer token for it.
pub async fn token_with_role(test: &TestApp, pool: &PgPool, role: &str) -> String {
    let user = create_user(pool, &format!("{role}.user"), role).await;
    test.token_for(&user)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    builder(method, uri, token)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// POST a JSON body as if relayed by a proxy for `forwarded_for`.
pub async fn post_json_forwarded(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    forwarded_for: &str,
) -> Response {
    let mut request = json_request(Method::POST, uri, None, &body);
    request
        .headers_mut()
        .insert("x-forwarded-for", forwarded_for.parse().unwrap());
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, &body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), &body)).await
}

/// POST without a body, as used by the approve/reject style actions.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        builder(Method::POST, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        builder(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Send a single-file `multipart/form-data` request with optional extra
/// text fields.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    file_field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
    fields: &[(&str, &str)],
    token: &str,
) -> Response {
    const BOUNDARY: &str = "hrms-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{file_field}\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = builder(Method::POST, uri, Some(token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A minimal valid employee payload.
pub fn employee_body(code: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "employee_code": code,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "department": "Engineering",
        "position": "Engineer",
        "hire_date": "2023-01-09"
    })
}

/// Create an employee through the API and return its id.
pub async fn create_employee(test: &TestApp, token: &str, code: &str) -> i64 {
    let email = format!("{}@corp.test", code.to_lowercase());
    let response = post_json_auth(
        test.app(),
        "/api/v1/employees",
        employee_body(code, &email),
        token,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
