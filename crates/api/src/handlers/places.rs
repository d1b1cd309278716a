//! Handlers for the `/api/places` resource.
//!
//! Places form a forest through `parent`. Writes that move a place re-read
//! the caller's edges inside the transaction and refuse any cycle.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_core::place_tree::PlaceForest;
use inkwell_core::types::{EntityId, UserId};
use inkwell_db::models::place::{CreatePlace, Place, UpdatePlace};
use inkwell_db::repositories::PlaceRepo;
use sqlx::PgConnection;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{single, PlaceView, Projector};
use crate::references::ensure_ref;
use crate::state::AppState;

async fn view(state: &AppState, auth: &AuthUser, place: Place) -> AppResult<PlaceView> {
    let id = place.id;
    let views = Projector::new(&state.pool, auth).places(vec![place]).await?;
    single(views, "Place", id)
}

/// Check that `parent` is a visible place and that hanging `place` under it
/// keeps the hierarchy acyclic.
async fn ensure_parent(
    conn: &mut PgConnection,
    owner: UserId,
    place: Option<EntityId>,
    parent: Option<EntityId>,
) -> AppResult<()> {
    let Some(parent) = parent else {
        return Ok(());
    };
    ensure_ref(&mut *conn, EntityKind::Place, owner, "parent", Some(parent)).await?;
    if place.is_some() {
        let forest = PlaceForest::new(PlaceRepo::edges(&mut *conn, owner).await?);
        forest.check_parent(place, parent)?;
    }
    Ok(())
}

/// GET /api/places
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<PlaceView>>> {
    let rows = PlaceRepo::list(&state.pool, auth.user_id).await?;
    let items = Projector::new(&state.pool, &auth).places(rows).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed places");
    Ok(Json(items))
}

/// POST /api/places
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreatePlace>,
) -> AppResult<(StatusCode, Json<PlaceView>)> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_parent(&mut tx, auth.user_id, None, input.parent).await?;
    let place = PlaceRepo::create(&mut tx, auth.user_id, &input).await?;
    tx.commit().await?;

    tracing::info!(
        place_id = %place.id,
        name = %place.name,
        user_id = auth.user_id,
        "Place created"
    );
    Ok((StatusCode::CREATED, Json(view(&state, &auth, place).await?)))
}

/// GET /api/places/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<PlaceView>> {
    let place = PlaceRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Place", id))?;
    Ok(Json(view(&state, &auth, place).await?))
}

/// PUT /api/places/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreatePlace>,
) -> AppResult<Json<PlaceView>> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_parent(&mut tx, auth.user_id, Some(id), input.parent).await?;
    let place = PlaceRepo::replace(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Place", id))?;
    tx.commit().await?;

    tracing::info!(place_id = %id, user_id = auth.user_id, "Place replaced");
    Ok(Json(view(&state, &auth, place).await?))
}

/// PATCH /api/places/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdatePlace>,
) -> AppResult<Json<PlaceView>> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project.flatten()).await?;
    ensure_parent(&mut tx, auth.user_id, Some(id), input.parent.flatten()).await?;
    let place = PlaceRepo::update(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Place", id))?;
    tx.commit().await?;

    tracing::info!(place_id = %id, user_id = auth.user_id, "Place updated");
    Ok(Json(view(&state, &auth, place).await?))
}

/// DELETE /api/places/{id}
///
/// Child places are deleted too; events and scenes set there lose their
/// place.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if PlaceRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(place_id = %id, user_id = auth.user_id, "Place deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Place", id))
    }
}
