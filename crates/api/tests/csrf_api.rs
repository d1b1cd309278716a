//! CSRF enforcement on cookie-authenticated writes.

mod common;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, register_and_login, Session};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

/// POST a project with the session cookies and an optional CSRF header.
async fn post_project(pool: &PgPool, session: &Session, header: Option<&str>) -> axum::http::Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/projects")
        .header(COOKIE, session.cookie_header())
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = header {
        builder = builder.header("x-csrftoken", token);
    }
    let request = builder
        .body(Body::from(json!({ "name": "Saga" }).to_string()))
        .unwrap();
    build_test_app(pool.clone()).oneshot(request).await.unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn write_without_csrf_header_is_403(pool: PgPool) {
    let session = register_and_login(&pool, "ada").await;

    let response = post_project(&pool, &session, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("CSRF Failed"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn write_with_mismatched_csrf_header_is_403(pool: PgPool) {
    let session = register_and_login(&pool, "ada").await;

    let response = post_project(&pool, &session, Some("not-the-cookie-value")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn write_with_matching_csrf_header_succeeds(pool: PgPool) {
    let session = register_and_login(&pool, "ada").await;

    let response = post_project(&pool, &session, Some(&session.csrf_token)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reads_are_not_csrf_checked(pool: PgPool) {
    let session = register_and_login(&pool, "ada").await;

    let request = Request::builder()
        .uri("/api/projects/")
        .header(COOKIE, session.cookie_header())
        .body(Body::empty())
        .unwrap();
    let response = build_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn anonymous_write_fails_authentication_not_csrf(pool: PgPool) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/projects")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "Saga" }).to_string()))
        .unwrap();
    let response = build_test_app(pool).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["error"],
        "Authentication credentials were not provided."
    );
}
