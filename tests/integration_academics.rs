mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use campus_erp::router::app;
use common::{authenticated, create_department, send, setup_test_app, test_state};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_department_crud(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (head, token) = authenticated(&app, &pool, "faculty").await;

    let created = create_department(&app, &token, "CS").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created["head_name"].is_null());

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/departments/{}", id),
        Some(&token),
        Some(json!({ "head_id": head.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["head_name"], "Test User");
    assert_eq!(body["code"], "CS");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/departments/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/departments/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Department not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_department_code(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "staff").await;
    create_department(&app, &token, "MATH").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/departments",
        Some(&token),
        Some(json!({ "name": "Maths again", "code": "MATH" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A department with this code already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_trailing_slash_is_normalized(pool: PgPool) {
    let router = setup_test_app(pool.clone());
    let (_, token) = authenticated(&router, &pool, "staff").await;
    create_department(&router, &token, "BIO").await;

    let service = app(test_state(pool), None);
    let request = Request::builder()
        .uri("/api/departments/")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = service.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_courses_filter_by_department_and_paginate(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "staff").await;
    let cs = create_department(&app, &token, "CS").await;
    let ee = create_department(&app, &token, "EE").await;

    for (code, department) in [("CS101", &cs), ("CS102", &cs), ("CS201", &cs), ("EE101", &ee)] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/courses",
            Some(&token),
            Some(json!({
                "code": code,
                "name": format!("Course {}", code),
                "department_id": department["id"],
                "credits": 3
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/courses?department=CS&limit=2&page=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["has_more"], false);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["department_name"], "Department CS");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_validation_and_prerequisites(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "staff").await;
    let cs = create_department(&app, &token, "CS").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&token),
        Some(json!({
            "code": "CS000",
            "name": "Nothing",
            "department_id": cs["id"],
            "credits": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, intro) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&token),
        Some(json!({
            "code": "CS101",
            "name": "Intro",
            "department_id": cs["id"],
            "credits": 3
        })),
    )
    .await;
    let (status, advanced) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&token),
        Some(json!({
            "code": "CS201",
            "name": "Data Structures",
            "department_id": cs["id"],
            "credits": 4,
            "prerequisites": [intro["id"]]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(advanced["prerequisites"], json!([intro["id"]]));

    let (_, intro_again) = send(
        &app,
        Method::GET,
        &format!("/api/courses/{}", intro["id"].as_str().unwrap()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(intro_again["prerequisites"], json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_semester_requires_existing_year(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = authenticated(&app, &pool, "staff").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/semesters",
        Some(&token),
        Some(json!({
            "academic_year_id": uuid::Uuid::new_v4(),
            "name": "FALL",
            "start_date": "2024-09-01",
            "end_date": "2024-12-20"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
