//! Handlers for the `/api/stories` resource.
//!
//! A story's `events` list is stored in a link table; its chapters are
//! written through `/api/chapters` and only read here.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_core::validation::dedup_ids;
use inkwell_db::models::story::{CreateStory, Story, UpdateStory};
use inkwell_db::repositories::{Link, LinkRepo, StoryRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{single, Projector, StoryView};
use crate::references::{ensure_ref, ensure_visible};
use crate::state::AppState;

async fn view(state: &AppState, auth: &AuthUser, story: Story) -> AppResult<StoryView> {
    let id = story.id;
    let views = Projector::new(&state.pool, auth).stories(vec![story]).await?;
    single(views, "Story", id)
}

/// GET /api/stories
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<StoryView>>> {
    let rows = StoryRepo::list(&state.pool, auth.user_id).await?;
    let items = Projector::new(&state.pool, &auth).stories(rows).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed stories");
    Ok(Json(items))
}

/// POST /api/stories
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateStory>,
) -> AppResult<(StatusCode, Json<StoryView>)> {
    input.validate()?;
    let events = dedup_ids(input.events.as_deref().unwrap_or_default());

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_visible(&mut tx, EntityKind::Event, auth.user_id, "events", &events).await?;
    let story = StoryRepo::create(&mut tx, auth.user_id, &input).await?;
    LinkRepo::replace(&mut tx, Link::StoryEvents, story.id, &events).await?;
    tx.commit().await?;

    tracing::info!(story_id = %story.id, user_id = auth.user_id, "Story created");
    Ok((StatusCode::CREATED, Json(view(&state, &auth, story).await?)))
}

/// GET /api/stories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<StoryView>> {
    let story = StoryRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Story", id))?;
    Ok(Json(view(&state, &auth, story).await?))
}

/// PUT /api/stories/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateStory>,
) -> AppResult<Json<StoryView>> {
    input.validate()?;
    let events = dedup_ids(input.events.as_deref().unwrap_or_default());

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_visible(&mut tx, EntityKind::Event, auth.user_id, "events", &events).await?;
    let story = StoryRepo::replace(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Story", id))?;
    LinkRepo::replace(&mut tx, Link::StoryEvents, id, &events).await?;
    tx.commit().await?;

    tracing::info!(story_id = %id, user_id = auth.user_id, "Story replaced");
    Ok(Json(view(&state, &auth, story).await?))
}

/// PATCH /api/stories/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateStory>,
) -> AppResult<Json<StoryView>> {
    input.validate()?;
    let events = input
        .events
        .as_ref()
        .map(|ids| dedup_ids(ids.as_deref().unwrap_or_default()));

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project.flatten()).await?;
    if let Some(events) = &events {
        ensure_visible(&mut tx, EntityKind::Event, auth.user_id, "events", events).await?;
    }
    let story = StoryRepo::update(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Story", id))?;
    if let Some(events) = &events {
        LinkRepo::replace(&mut tx, Link::StoryEvents, id, events).await?;
    }
    tx.commit().await?;

    tracing::info!(story_id = %id, user_id = auth.user_id, "Story updated");
    Ok(Json(view(&state, &auth, story).await?))
}

/// DELETE /api/stories/{id}
///
/// Chapters go with the story.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if StoryRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(story_id = %id, user_id = auth.user_id, "Story deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Story", id))
    }
}
