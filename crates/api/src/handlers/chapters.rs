//! Handlers for the `/api/chapters` resource.
//!
//! Chapters carry no author of their own: they are reachable exactly when
//! their story is, so every write re-checks the target story.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_core::validation::dedup_ids;
use inkwell_db::models::chapter::{Chapter, CreateChapter, UpdateChapter};
use inkwell_db::repositories::{ChapterRepo, Link, LinkRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{single, ChapterView, Projector};
use crate::references::{ensure_ref, ensure_visible};
use crate::state::AppState;

async fn view(state: &AppState, auth: &AuthUser, chapter: Chapter) -> AppResult<ChapterView> {
    let id = chapter.id;
    let views = Projector::new(&state.pool, auth).chapters(vec![chapter]).await?;
    single(views, "Chapter", id)
}

/// GET /api/chapters
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<ChapterView>>> {
    let rows = ChapterRepo::list(&state.pool, auth.user_id).await?;
    let items = Projector::new(&state.pool, &auth).chapters(rows).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed chapters");
    Ok(Json(items))
}

/// POST /api/chapters
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateChapter>,
) -> AppResult<(StatusCode, Json<ChapterView>)> {
    input.validate()?;
    let scenes = dedup_ids(input.included_scenes.as_deref().unwrap_or_default());

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Story, auth.user_id, "story", input.story).await?;
    ensure_visible(&mut tx, EntityKind::Scene, auth.user_id, "included_scenes", &scenes).await?;
    let chapter = ChapterRepo::create(&mut tx, &input).await?;
    LinkRepo::replace(&mut tx, Link::ChapterScenes, chapter.id, &scenes).await?;
    tx.commit().await?;

    tracing::info!(
        chapter_id = %chapter.id,
        story_id = %chapter.story_id,
        user_id = auth.user_id,
        "Chapter created"
    );
    Ok((StatusCode::CREATED, Json(view(&state, &auth, chapter).await?)))
}

/// GET /api/chapters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<ChapterView>> {
    let chapter = ChapterRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter", id))?;
    Ok(Json(view(&state, &auth, chapter).await?))
}

/// PUT /api/chapters/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateChapter>,
) -> AppResult<Json<ChapterView>> {
    input.validate()?;
    let scenes = dedup_ids(input.included_scenes.as_deref().unwrap_or_default());

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Story, auth.user_id, "story", input.story).await?;
    ensure_visible(&mut tx, EntityKind::Scene, auth.user_id, "included_scenes", &scenes).await?;
    let chapter = ChapterRepo::replace(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter", id))?;
    LinkRepo::replace(&mut tx, Link::ChapterScenes, id, &scenes).await?;
    tx.commit().await?;

    tracing::info!(chapter_id = %id, user_id = auth.user_id, "Chapter replaced");
    Ok(Json(view(&state, &auth, chapter).await?))
}

/// PATCH /api/chapters/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateChapter>,
) -> AppResult<Json<ChapterView>> {
    input.validate()?;
    let scenes = input
        .included_scenes
        .as_ref()
        .map(|ids| dedup_ids(ids.as_deref().unwrap_or_default()));

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Story, auth.user_id, "story", input.story).await?;
    if let Some(scenes) = &scenes {
        ensure_visible(&mut tx, EntityKind::Scene, auth.user_id, "included_scenes", scenes)
            .await?;
    }
    let chapter = ChapterRepo::update(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter", id))?;
    if let Some(scenes) = &scenes {
        LinkRepo::replace(&mut tx, Link::ChapterScenes, id, scenes).await?;
    }
    tx.commit().await?;

    tracing::info!(chapter_id = %id, user_id = auth.user_id, "Chapter updated");
    Ok(Json(view(&state, &auth, chapter).await?))
}

/// DELETE /api/chapters/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if ChapterRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(chapter_id = %id, user_id = auth.user_id, "Chapter deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Chapter", id))
    }
}
