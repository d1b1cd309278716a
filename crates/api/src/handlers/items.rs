//! Handlers for the `/api/items` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_core::validation::dedup_ids;
use inkwell_db::models::item::{CreateItem, Item, UpdateItem};
use inkwell_db::repositories::{ItemRepo, Link, LinkRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{single, ItemView, Projector};
use crate::references::{ensure_ref, ensure_visible};
use crate::state::AppState;

async fn view(state: &AppState, auth: &AuthUser, item: Item) -> AppResult<ItemView> {
    let id = item.id;
    let views = Projector::new(&state.pool, auth).items(vec![item]).await?;
    single(views, "Item", id)
}

/// GET /api/items
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<ItemView>>> {
    let rows = ItemRepo::list(&state.pool, auth.user_id).await?;
    let items = Projector::new(&state.pool, &auth).items(rows).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed items");
    Ok(Json(items))
}

/// POST /api/items
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateItem>,
) -> AppResult<(StatusCode, Json<ItemView>)> {
    input.validate()?;
    let owners = dedup_ids(input.owners.as_deref().unwrap_or_default());

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_visible(&mut tx, EntityKind::Character, auth.user_id, "owners", &owners).await?;
    let item = ItemRepo::create(&mut tx, auth.user_id, &input).await?;
    LinkRepo::replace(&mut tx, Link::ItemOwners, item.id, &owners).await?;
    tx.commit().await?;

    tracing::info!(item_id = %item.id, name = %item.name, user_id = auth.user_id, "Item created");
    Ok((StatusCode::CREATED, Json(view(&state, &auth, item).await?)))
}

/// GET /api/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<ItemView>> {
    let item = ItemRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Item", id))?;
    Ok(Json(view(&state, &auth, item).await?))
}

/// PUT /api/items/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateItem>,
) -> AppResult<Json<ItemView>> {
    input.validate()?;
    let owners = dedup_ids(input.owners.as_deref().unwrap_or_default());

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_visible(&mut tx, EntityKind::Character, auth.user_id, "owners", &owners).await?;
    let item = ItemRepo::replace(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Item", id))?;
    LinkRepo::replace(&mut tx, Link::ItemOwners, id, &owners).await?;
    tx.commit().await?;

    tracing::info!(item_id = %id, user_id = auth.user_id, "Item replaced");
    Ok(Json(view(&state, &auth, item).await?))
}

/// PATCH /api/items/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateItem>,
) -> AppResult<Json<ItemView>> {
    input.validate()?;
    let owners = input
        .owners
        .as_ref()
        .map(|ids| dedup_ids(ids.as_deref().unwrap_or_default()));

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project.flatten()).await?;
    if let Some(owners) = &owners {
        ensure_visible(&mut tx, EntityKind::Character, auth.user_id, "owners", owners).await?;
    }
    let item = ItemRepo::update(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Item", id))?;
    if let Some(owners) = &owners {
        LinkRepo::replace(&mut tx, Link::ItemOwners, id, owners).await?;
    }
    tx.commit().await?;

    tracing::info!(item_id = %id, user_id = auth.user_id, "Item updated");
    Ok(Json(view(&state, &auth, item).await?))
}

/// DELETE /api/items/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if ItemRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(item_id = %id, user_id = auth.user_id, "Item deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Item", id))
    }
}
