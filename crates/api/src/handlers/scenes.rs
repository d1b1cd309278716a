//! Handlers for the `/api/scenes` resource.
//!
//! A scene links characters, items and two separate event lists: events
//! shown on the page and events only told about.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_db::models::scene::{CreateScene, Scene, UpdateScene};
use inkwell_db::repositories::{Link, SceneRepo};
use validator::Validate;

use super::{check_links, write_links, LinkField};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{single, Projector, SceneView};
use crate::references::ensure_ref;
use crate::state::AppState;

async fn view(state: &AppState, auth: &AuthUser, scene: Scene) -> AppResult<SceneView> {
    let id = scene.id;
    let views = Projector::new(&state.pool, auth).scenes(vec![scene]).await?;
    single(views, "Scene", id)
}

fn link_fields(input: &CreateScene) -> [LinkField; 4] {
    [
        LinkField::full(Link::SceneCharacters, "characters", input.characters.as_deref()),
        LinkField::full(Link::SceneItems, "items", input.items.as_deref()),
        LinkField::full(Link::SceneShownEvents, "shown_events", input.shown_events.as_deref()),
        LinkField::full(Link::SceneToldEvents, "told_events", input.told_events.as_deref()),
    ]
}

fn partial_link_fields(input: &UpdateScene) -> Vec<LinkField> {
    [
        LinkField::partial(Link::SceneCharacters, "characters", &input.characters),
        LinkField::partial(Link::SceneItems, "items", &input.items),
        LinkField::partial(Link::SceneShownEvents, "shown_events", &input.shown_events),
        LinkField::partial(Link::SceneToldEvents, "told_events", &input.told_events),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// GET /api/scenes
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<SceneView>>> {
    let rows = SceneRepo::list(&state.pool, auth.user_id).await?;
    let items = Projector::new(&state.pool, &auth).scenes(rows).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed scenes");
    Ok(Json(items))
}

/// POST /api/scenes
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateScene>,
) -> AppResult<(StatusCode, Json<SceneView>)> {
    input.validate()?;
    let links = link_fields(&input);

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_ref(&mut tx, EntityKind::Place, auth.user_id, "place", input.place).await?;
    check_links(&mut tx, auth.user_id, &links).await?;
    let scene = SceneRepo::create(&mut tx, auth.user_id, &input).await?;
    write_links(&mut tx, scene.id, &links).await?;
    tx.commit().await?;

    tracing::info!(scene_id = %scene.id, user_id = auth.user_id, "Scene created");
    Ok((StatusCode::CREATED, Json(view(&state, &auth, scene).await?)))
}

/// GET /api/scenes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<SceneView>> {
    let scene = SceneRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Scene", id))?;
    Ok(Json(view(&state, &auth, scene).await?))
}

/// PUT /api/scenes/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateScene>,
) -> AppResult<Json<SceneView>> {
    input.validate()?;
    let links = link_fields(&input);

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_ref(&mut tx, EntityKind::Place, auth.user_id, "place", input.place).await?;
    check_links(&mut tx, auth.user_id, &links).await?;
    let scene = SceneRepo::replace(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Scene", id))?;
    write_links(&mut tx, id, &links).await?;
    tx.commit().await?;

    tracing::info!(scene_id = %id, user_id = auth.user_id, "Scene replaced");
    Ok(Json(view(&state, &auth, scene).await?))
}

/// PATCH /api/scenes/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateScene>,
) -> AppResult<Json<SceneView>> {
    input.validate()?;
    let links = partial_link_fields(&input);

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project.flatten()).await?;
    ensure_ref(&mut tx, EntityKind::Place, auth.user_id, "place", input.place.flatten()).await?;
    check_links(&mut tx, auth.user_id, &links).await?;
    let scene = SceneRepo::update(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Scene", id))?;
    write_links(&mut tx, id, &links).await?;
    tx.commit().await?;

    tracing::info!(scene_id = %id, user_id = auth.user_id, "Scene updated");
    Ok(Json(view(&state, &auth, scene).await?))
}

/// DELETE /api/scenes/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if SceneRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(scene_id = %id, user_id = auth.user_id, "Scene deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Scene", id))
    }
}
