//! Handlers for the read-only `/api/users` directory.

use axum::extract::State;
use axum::Json;
use inkwell_db::models::user::UserInfo;
use inkwell_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/users
pub async fn list(State(state): State<AppState>, _auth: AuthUser) -> AppResult<Json<Vec<UserInfo>>> {
    let users = UserRepo::list_info(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    axum::extract::Path(raw): axum::extract::Path<String>,
) -> AppResult<Json<UserInfo>> {
    let id: i64 = raw
        .parse()
        .map_err(|_| AppError::not_found("User", &raw))?;
    let user = UserRepo::find_info(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(user))
}
