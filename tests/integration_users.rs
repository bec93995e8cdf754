mod common;

use axum::http::{Method, StatusCode};
use common::{authenticated, send, setup_test_app};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_creates_user_without_exposing_password(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "admin").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(&token),
        Some(json!({
            "username": "jdoe",
            "email": "jdoe@uni.edu",
            "password": "correct-horse",
            "first_name": "Jane",
            "last_name": "Doe",
            "role": "student"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["role"], "student");
    assert!(body.get("password").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "jdoe", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Jane Doe");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_admin_is_forbidden(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "faculty").await;

    let (status, body) = send(&app, Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("admin"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_users_require_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(&app, Method::GET, "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_filter_users_by_role(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "admin").await;
    common::create_test_user(&pool, "student").await;
    common::create_test_user(&pool, "student").await;

    let (status, body) = send(&app, Method::GET, "/api/users?role=student", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|u| u["role"] == "student")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_email_is_unprocessable(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "admin").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(&token),
        Some(json!({
            "username": "bad",
            "email": "not-an-email",
            "password": "long-enough",
            "role": "staff"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
