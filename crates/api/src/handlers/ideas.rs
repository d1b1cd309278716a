//! Handlers for the `/api/ideas` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_db::models::idea::{CreateIdea, UpdateIdea};
use inkwell_db::repositories::IdeaRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{IdeaView, Projector};
use crate::references::ensure_ref;
use crate::state::AppState;

/// GET /api/ideas
///
/// Newest first.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<IdeaView>>> {
    let rows = IdeaRepo::list(&state.pool, auth.user_id).await?;
    let projector = Projector::new(&state.pool, &auth);
    let items: Vec<IdeaView> = rows.into_iter().map(|idea| projector.idea(idea)).collect();
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed ideas");
    Ok(Json(items))
}

/// POST /api/ideas
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateIdea>,
) -> AppResult<(StatusCode, Json<IdeaView>)> {
    input.validate()?;
    let mut conn = state.pool.acquire().await?;
    ensure_ref(&mut conn, EntityKind::Project, auth.user_id, "project", input.project).await?;
    drop(conn);

    let idea = IdeaRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(idea_id = %idea.id, kind = %idea.idea_type, user_id = auth.user_id, "Idea created");
    Ok((StatusCode::CREATED, Json(Projector::new(&state.pool, &auth).idea(idea))))
}

/// GET /api/ideas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<IdeaView>> {
    let idea = IdeaRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Idea", id))?;
    Ok(Json(Projector::new(&state.pool, &auth).idea(idea)))
}

/// PUT /api/ideas/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateIdea>,
) -> AppResult<Json<IdeaView>> {
    input.validate()?;
    let mut conn = state.pool.acquire().await?;
    ensure_ref(&mut conn, EntityKind::Project, auth.user_id, "project", input.project).await?;
    drop(conn);

    let idea = IdeaRepo::replace(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Idea", id))?;
    tracing::info!(idea_id = %id, user_id = auth.user_id, "Idea replaced");
    Ok(Json(Projector::new(&state.pool, &auth).idea(idea)))
}

/// PATCH /api/ideas/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateIdea>,
) -> AppResult<Json<IdeaView>> {
    input.validate()?;
    let mut conn = state.pool.acquire().await?;
    ensure_ref(&mut conn, EntityKind::Project, auth.user_id, "project", input.project.flatten()).await?;
    drop(conn);

    let idea = IdeaRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Idea", id))?;
    tracing::info!(idea_id = %id, user_id = auth.user_id, "Idea updated");
    Ok(Json(Projector::new(&state.pool, &auth).idea(idea)))
}

/// DELETE /api/ideas/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if IdeaRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(idea_id = %id, user_id = auth.user_id, "Idea deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Idea", id))
    }
}
