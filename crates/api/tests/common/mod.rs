#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use inkwell_api::config::{ServerConfig, SessionConfig};
use inkwell_api::router::build_app_router;
use inkwell_api::state::AppState;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        session: SessionConfig {
            ttl_hours: 336,
            cookie_secure: false,
        },
        password_min_length: 8,
    }
}

/// Build the full application router, middleware included, on `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A logged-in browser: the cookies to send and the CSRF token to echo.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub session_token: String,
    pub csrf_token: String,
}

impl Session {
    pub fn cookie_header(&self) -> String {
        format!(
            "sessionid={}; csrftoken={}",
            self.session_token, self.csrf_token
        )
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    session: Option<&Session>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder
            .header(COOKIE, session.cookie_header())
            .header("x-csrftoken", &session.csrf_token);
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// POST a body verbatim, for payloads that are not valid JSON.
pub async fn post_raw_auth(app: Router, uri: &str, body: &str, session: &Session) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(COOKIE, session.cookie_header())
        .header("x-csrftoken", &session.csrf_token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn get_auth(app: Router, uri: &str, session: &Session) -> Response<Body> {
    send(app, Method::GET, uri, Some(session), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, session: &Session) -> Response<Body> {
    send(app, Method::POST, uri, Some(session), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, session: &Session) -> Response<Body> {
    send(app, Method::PUT, uri, Some(session), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, session: &Session) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(session), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, session: &Session) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(session), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Value of cookie `name` from the response's `Set-Cookie` headers.
pub fn set_cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Register `username` through the API and assert it succeeded.
pub async fn register(pool: &PgPool, username: &str) -> Value {
    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
    });
    let response = post_json(build_test_app(pool.clone()), "/accounts/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Register, fetch a CSRF token and log in; returns the browser session.
pub async fn register_and_login(pool: &PgPool, username: &str) -> Session {
    register(pool, username).await;

    let response = get(build_test_app(pool.clone()), "/accounts/csrf").await;
    assert_eq!(response.status(), StatusCode::OK);
    let csrf_token = body_json(response).await["csrfToken"]
        .as_str()
        .unwrap()
        .to_string();

    let body = json!({ "username": username, "password": TEST_PASSWORD });
    let response = post_json(build_test_app(pool.clone()), "/accounts/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let session_token = set_cookie_value(&response, "sessionid").expect("login sets sessionid");
    let json = body_json(response).await;

    Session {
        user_id: json["user"]["id"].as_i64().unwrap(),
        username: username.to_string(),
        session_token,
        csrf_token,
    }
}

/// Create an entity and return its JSON, asserting 201.
pub async fn create(pool: &PgPool, session: &Session, plural: &str, body: Value) -> Value {
    let uri = format!("/api/{plural}/");
    let response = post_json_auth(build_test_app(pool.clone()), &uri, body, session).await;
    assert_eq!(response.status(), StatusCode::CREATED, "creating {plural}");
    body_json(response).await
}
