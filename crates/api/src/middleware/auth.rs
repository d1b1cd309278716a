//! Session-cookie authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use inkwell_core::error::CoreError;
use inkwell_core::types::UserId;
use inkwell_db::models::user::UserInfo;
use inkwell_db::repositories::{SessionRepo, UserRepo};

use crate::auth::session::{hash_session_token, read_cookie, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// The user behind the request's `sessionid` cookie.
///
/// Every entity handler takes this as its first extractor; the user id is
/// then passed explicitly into each repository call. A missing, unknown or
/// expired session is a 403, never a 401.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    /// Public profile, inlined as `author` on owned entities.
    pub info: UserInfo,
    /// SHA-256 of the session token, so logout can drop exactly this session.
    pub session_hash: String,
}

fn not_authenticated() -> AppError {
    AppError::Core(CoreError::Forbidden(
        "Authentication credentials were not provided.".into(),
    ))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, SESSION_COOKIE).ok_or_else(not_authenticated)?;
        let session_hash = hash_session_token(&token);

        let session = SessionRepo::find_active(&state.pool, &session_hash)
            .await?
            .ok_or_else(not_authenticated)?;

        let user = UserRepo::find_by_id(&state.pool, session.user_id)
            .await?
            .ok_or_else(not_authenticated)?;

        Ok(AuthUser {
            user_id: user.id,
            info: UserInfo::from(&user),
            session_hash,
        })
    }
}
