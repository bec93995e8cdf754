use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use campus_erp::campus_erp_config::{CorsConfig, JwtConfig};
use campus_erp::campus_erp_core::hash_password;
use campus_erp::router::init_router;
use campus_erp::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "password123";

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        db: pool,
        jwt_config: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry: 3600,
        },
        cors_config: CorsConfig::from_list("http://localhost:3000"),
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

pub fn generate_unique_username() -> String {
    format!("user_{}", &Uuid::new_v4().simple().to_string()[..12])
}

/// Inserts a user whose password is [`TEST_PASSWORD`].
pub async fn create_test_user(pool: &PgPool, role: &str) -> TestUser {
    let username = generate_unique_username();
    let id: Uuid = sqlx::query_scalar(
        r#"INSERT INTO users (username, email, password, first_name, last_name, role)
           VALUES ($1, $2, $3, 'Test', 'User', $4)
           RETURNING id"#,
    )
    .bind(&username)
    .bind(format!("{}@test.edu", username))
    .bind(hash_password(TEST_PASSWORD).unwrap())
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username,
        password: TEST_PASSWORD.to_string(),
    }
}

/// Sends one request and returns the status with the decoded JSON body.
/// Empty bodies come back as `Value::Null`, plain-text ones as a string.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub async fn login(app: &Router, user: &TestUser) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": user.username, "password": user.password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// A fresh user of `role` plus their token.
pub async fn authenticated(app: &Router, pool: &PgPool, role: &str) -> (TestUser, String) {
    let user = create_test_user(pool, role).await;
    let token = login(app, &user).await;
    (user, token)
}

#[allow(dead_code)]
pub async fn create_department(app: &Router, token: &str, code: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/departments",
        Some(token),
        Some(json!({ "name": format!("Department {}", code), "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[allow(dead_code)]
pub async fn create_faculty_profile(app: &Router, pool: &PgPool, token: &str) -> Value {
    let user = create_test_user(pool, "faculty").await;
    let (status, body) = send(
        app,
        Method::POST,
        "/api/faculty-profiles",
        Some(token),
        Some(json!({
            "user_id": user.id,
            "position": "Professor",
            "office_location": "B-12",
            "phone": "555-0100",
            "joining_date": "2020-09-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}
