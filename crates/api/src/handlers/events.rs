//! Handlers for the `/api/events` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_db::models::event::{CreateEvent, Event, UpdateEvent};
use inkwell_db::repositories::{EventRepo, Link};
use validator::Validate;

use super::{check_links, write_links, LinkField};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{single, EventView, Projector};
use crate::references::ensure_ref;
use crate::state::AppState;

async fn view(state: &AppState, auth: &AuthUser, event: Event) -> AppResult<EventView> {
    let id = event.id;
    let views = Projector::new(&state.pool, auth).events(vec![event]).await?;
    single(views, "Event", id)
}

fn link_fields(input: &CreateEvent) -> [LinkField; 2] {
    [
        LinkField::full(Link::EventCharacters, "characters", input.characters.as_deref()),
        LinkField::full(Link::EventItems, "items", input.items.as_deref()),
    ]
}

fn partial_link_fields(input: &UpdateEvent) -> Vec<LinkField> {
    [
        LinkField::partial(Link::EventCharacters, "characters", &input.characters),
        LinkField::partial(Link::EventItems, "items", &input.items),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// GET /api/events
///
/// Ordered by `time_order`.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<EventView>>> {
    let rows = EventRepo::list(&state.pool, auth.user_id).await?;
    let items = Projector::new(&state.pool, &auth).events(rows).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed events");
    Ok(Json(items))
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateEvent>,
) -> AppResult<(StatusCode, Json<EventView>)> {
    input.validate()?;
    let links = link_fields(&input);

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_ref(&mut tx, EntityKind::Place, auth.user_id, "place", input.place).await?;
    check_links(&mut tx, auth.user_id, &links).await?;
    let event = EventRepo::create(&mut tx, auth.user_id, &input).await?;
    write_links(&mut tx, event.id, &links).await?;
    tx.commit().await?;

    tracing::info!(event_id = %event.id, user_id = auth.user_id, "Event created");
    Ok((StatusCode::CREATED, Json(view(&state, &auth, event).await?)))
}

/// GET /api/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<EventView>> {
    let event = EventRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    Ok(Json(view(&state, &auth, event).await?))
}

/// PUT /api/events/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateEvent>,
) -> AppResult<Json<EventView>> {
    input.validate()?;
    let links = link_fields(&input);

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_ref(&mut tx, EntityKind::Place, auth.user_id, "place", input.place).await?;
    check_links(&mut tx, auth.user_id, &links).await?;
    let event = EventRepo::replace(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    write_links(&mut tx, id, &links).await?;
    tx.commit().await?;

    tracing::info!(event_id = %id, user_id = auth.user_id, "Event replaced");
    Ok(Json(view(&state, &auth, event).await?))
}

/// PATCH /api/events/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateEvent>,
) -> AppResult<Json<EventView>> {
    input.validate()?;
    let links = partial_link_fields(&input);

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project.flatten()).await?;
    ensure_ref(&mut tx, EntityKind::Place, auth.user_id, "place", input.place.flatten()).await?;
    check_links(&mut tx, auth.user_id, &links).await?;
    let event = EventRepo::update(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    write_links(&mut tx, id, &links).await?;
    tx.commit().await?;

    tracing::info!(event_id = %id, user_id = auth.user_id, "Event updated");
    Ok(Json(view(&state, &auth, event).await?))
}

/// DELETE /api/events/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if EventRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(event_id = %id, user_id = auth.user_id, "Event deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Event", id))
    }
}
