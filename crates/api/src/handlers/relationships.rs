//! Handlers for the `/api/character-relationships` resource.
//!
//! A relationship is visible through its `from_character`; writes require
//! both endpoints to be the caller's characters.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_core::types::{EntityId, UserId};
use inkwell_db::models::relationship::{
    CreateCharacterRelationship, UpdateCharacterRelationship,
};
use inkwell_db::repositories::RelationshipRepo;
use sqlx::PgConnection;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::RelationshipView;
use crate::references::ensure_ref;
use crate::state::AppState;

async fn ensure_endpoints(
    conn: &mut PgConnection,
    owner: UserId,
    from: Option<EntityId>,
    to: Option<EntityId>,
) -> AppResult<()> {
    ensure_ref(&mut *conn, EntityKind::Character, owner, "from_character", from).await?;
    ensure_ref(conn, EntityKind::Character, owner, "to_character", to).await
}

/// GET /api/character-relationships
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<RelationshipView>>> {
    let rows = RelationshipRepo::list(&state.pool, auth.user_id).await?;
    let items: Vec<RelationshipView> = rows.into_iter().map(RelationshipView::from).collect();
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed relationships");
    Ok(Json(items))
}

/// POST /api/character-relationships
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateCharacterRelationship>,
) -> AppResult<(StatusCode, Json<RelationshipView>)> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_endpoints(&mut tx, auth.user_id, input.from_character, input.to_character).await?;
    let relationship = RelationshipRepo::create(&mut tx, &input).await?;
    tx.commit().await?;

    tracing::info!(
        relationship_id = %relationship.id,
        from = %relationship.from_character_id,
        to = %relationship.to_character_id,
        user_id = auth.user_id,
        "Relationship created"
    );
    Ok((StatusCode::CREATED, Json(relationship.into())))
}

/// GET /api/character-relationships/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<RelationshipView>> {
    let relationship = RelationshipRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("CharacterRelationship", id))?;
    Ok(Json(relationship.into()))
}

/// PUT /api/character-relationships/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateCharacterRelationship>,
) -> AppResult<Json<RelationshipView>> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_endpoints(&mut tx, auth.user_id, input.from_character, input.to_character).await?;
    let relationship = RelationshipRepo::replace(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("CharacterRelationship", id))?;
    tx.commit().await?;

    tracing::info!(relationship_id = %id, user_id = auth.user_id, "Relationship replaced");
    Ok(Json(relationship.into()))
}

/// PATCH /api/character-relationships/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateCharacterRelationship>,
) -> AppResult<Json<RelationshipView>> {
    input.validate()?;
    input.validate_types()?;

    let mut tx = state.pool.begin().await?;
    ensure_endpoints(&mut tx, auth.user_id, input.from_character, input.to_character).await?;
    let relationship = RelationshipRepo::update(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("CharacterRelationship", id))?;
    tx.commit().await?;

    tracing::info!(relationship_id = %id, user_id = auth.user_id, "Relationship updated");
    Ok(Json(relationship.into()))
}

/// DELETE /api/character-relationships/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if RelationshipRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(relationship_id = %id, user_id = auth.user_id, "Relationship deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("CharacterRelationship", id))
    }
}
