//! Handlers for the `/accounts` resource (CSRF bootstrap, register, login,
//! logout, current user).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use inkwell_core::error::CoreError;
use inkwell_db::models::session::CreateSession;
use inkwell_db::models::user::{CreateUser, UserInfo};
use inkwell_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session::{
    csrf_cookie, expired_session_cookie, generate_csrf_token, generate_session_token,
    read_cookie, session_cookie, CSRF_COOKIE,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /accounts/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required, length(min = 1, max = 150))]
    pub username: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

/// Request body for `POST /accounts/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

/// Body returned by register and login.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub success: bool,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct CsrfResponse {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /accounts/csrf
///
/// Set the `csrftoken` cookie (reusing an existing one) and return its value.
pub async fn csrf(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let token = read_cookie(&headers, CSRF_COOKIE).unwrap_or_else(generate_csrf_token);
    let cookie = csrf_cookie(&token, state.config.session.cookie_secure);
    (
        [(SET_COOKIE, cookie)],
        Json(CsrfResponse { csrf_token: token }),
    )
}

/// POST /accounts/register
///
/// Create an account. Does not log the new user in.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    input.validate()?;
    let (Some(username), Some(email), Some(password)) =
        (input.username, input.email, input.password)
    else {
        return Err(AppError::validation("This field is required."));
    };

    validate_password_strength(&password, state.config.password_min_length)
        .map_err(AppError::validation)?;

    if UserRepo::exists(&state.pool, &username, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with that username or email already exists.".into(),
        )));
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            success: true,
            user: UserInfo::from(&user),
        }),
    ))
}

/// POST /accounts/login
///
/// Check credentials and start a session carried by the `sessionid` cookie.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let (Some(username), Some(password)) = (input.username, input.password) else {
        return Err(AppError::validation("This field is required."));
    };

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected");
        return Err(invalid());
    }

    let (token, token_hash) = generate_session_token();
    let ttl = chrono::Duration::hours(state.config.session.ttl_hours);
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            token_hash,
            expires_at: Utc::now() + ttl,
            user_agent,
        },
    )
    .await?;
    UserRepo::record_login(&state.pool, user.id).await?;

    let purged = SessionRepo::cleanup_expired(&state.pool).await?;
    tracing::info!(user_id = user.id, purged_sessions = purged, "User logged in");

    let cookie = session_cookie(
        &token,
        ttl.num_seconds(),
        state.config.session.cookie_secure,
    );
    Ok((
        [(SET_COOKIE, cookie)],
        Json(AccountResponse {
            success: true,
            user: UserInfo::from(&user),
        }),
    ))
}

/// POST /accounts/logout
///
/// End the current session and clear its cookie.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    SessionRepo::delete_by_hash(&state.pool, &auth.session_hash).await?;
    tracing::info!(user_id = auth.user_id, "User logged out");

    let cookie = expired_session_cookie(state.config.session.cookie_secure);
    Ok(([(SET_COOKIE, cookie)], Json(SuccessResponse { success: true })))
}

/// GET /accounts/user
pub async fn current_user(auth: AuthUser) -> Json<UserInfo> {
    Json(auth.info)
}
