mod common;

use axum::Router;
use axum::http::{Method, StatusCode};
use common::{authenticated, create_test_user, send, setup_test_app};
use serde_json::{Value, json};
use sqlx::PgPool;

async fn create_resource(app: &Router, token: &str, copies: i32) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/library-resources",
        Some(token),
        Some(json!({
            "title": "The Rust Programming Language",
            "author": "Klabnik",
            "resource_type": "BOOK",
            "location": "Shelf R",
            "available_copies": copies,
            "total_copies": copies
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

async fn get_resource(app: &Router, token: &str, id: &Value) -> Value {
    let (status, body) = send(
        app,
        Method::GET,
        &format!("/api/library-resources/{}", id.as_str().unwrap()),
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_borrow_and_return_adjust_copies(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "staff").await;
    let reader = create_test_user(&pool, "student").await;
    let book = create_resource(&app, &token, 1).await;
    assert_eq!(book["availability_status"], "Available");

    let (status, borrowing) = send(
        &app,
        Method::POST,
        "/api/library-borrowings",
        Some(&token),
        Some(json!({
            "resource_id": book["id"],
            "user_id": reader.id,
            "borrow_date": "2025-02-01",
            "due_date": "2025-02-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", borrowing);
    assert_eq!(borrowing["user_name"], "Test User");
    assert!(borrowing["return_date"].is_null());

    let shelf = get_resource(&app, &token, &book["id"]).await;
    assert_eq!(shelf["available_copies"], 0);
    assert_eq!(shelf["availability_status"], "Checked Out");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/library-borrowings",
        Some(&token),
        Some(json!({
            "resource_id": book["id"],
            "user_id": reader.id,
            "due_date": "2099-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No copies of this resource are available");

    let (status, returned) = send(
        &app,
        Method::PATCH,
        &format!("/api/library-borrowings/{}", borrowing["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({ "return_date": "2025-02-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", returned);
    assert_eq!(returned["return_date"], "2025-02-10");

    let shelf = get_resource(&app, &token, &book["id"]).await;
    assert_eq!(shelf["available_copies"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_available_filter_and_user_filter(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "staff").await;
    let reader = create_test_user(&pool, "student").await;
    let other = create_test_user(&pool, "student").await;
    let single = create_resource(&app, &token, 1).await;
    create_resource(&app, &token, 2).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/library-borrowings",
        Some(&token),
        Some(json!({
            "resource_id": single["id"],
            "user_id": reader.id,
            "due_date": "2099-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, available) = send(
        &app,
        Method::GET,
        "/api/library-resources?available=true",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(available["meta"]["total"], 1);

    let (_, mine) = send(
        &app,
        Method::GET,
        &format!("/api/library-borrowings?user={}", reader.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(mine["meta"]["total"], 1);

    let (_, theirs) = send(
        &app,
        Method::GET,
        &format!("/api/library-borrowings?user={}", other.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(theirs["meta"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_more_available_than_total_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "staff").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/library-resources",
        Some(&token),
        Some(json!({
            "title": "Overstocked",
            "author": "Nobody",
            "resource_type": "JOURNAL",
            "location": "",
            "available_copies": 5,
            "total_copies": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

async fn open_borrowing(
    app: &Router,
    token: &str,
    resource_id: &Value,
    user_id: uuid::Uuid,
) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/library-borrowings",
        Some(token),
        Some(json!({
            "resource_id": resource_id,
            "user_id": user_id,
            "due_date": "2099-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_returns_give_back_one_copy(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "staff").await;
    let reader = create_test_user(&pool, "student").await;

    for _ in 0..10 {
        let book = create_resource(&app, &token, 3).await;
        let first = open_borrowing(&app, &token, &book["id"], reader.id).await;
        open_borrowing(&app, &token, &book["id"], reader.id).await;

        let uri = format!("/api/library-borrowings/{}", first["id"].as_str().unwrap());
        let body = json!({ "return_date": "2025-02-10" });
        let (a, b) = tokio::join!(
            send(&app, Method::PATCH, &uri, Some(&token), Some(body.clone())),
            send(&app, Method::PATCH, &uri, Some(&token), Some(body.clone())),
        );
        assert_eq!(a.0, StatusCode::OK, "{}", a.1);
        assert_eq!(b.0, StatusCode::OK, "{}", b.1);

        let shelf = get_resource(&app, &token, &book["id"]).await;
        assert_eq!(shelf["available_copies"], 2);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resource_update_does_not_undo_concurrent_borrow(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "staff").await;
    let reader = create_test_user(&pool, "student").await;
    let book = create_resource(&app, &token, 20).await;
    let uri = format!("/api/library-resources/{}", book["id"].as_str().unwrap());

    for round in 0..10 {
        let (borrowed, moved) = tokio::join!(
            open_borrowing(&app, &token, &book["id"], reader.id),
            send(
                &app,
                Method::PATCH,
                &uri,
                Some(&token),
                Some(json!({ "location": format!("Shelf {}", round) })),
            ),
        );
        assert!(borrowed["return_date"].is_null());
        assert_eq!(moved.0, StatusCode::OK, "{}", moved.1);
    }

    let shelf = get_resource(&app, &token, &book["id"]).await;
    assert_eq!(shelf["available_copies"], 10);
    assert_eq!(shelf["location"], "Shelf 9");
}
