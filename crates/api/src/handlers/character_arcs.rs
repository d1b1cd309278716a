//! Handlers for the `/api/character-arcs` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_db::models::character_arc::{CreateCharacterArc, UpdateCharacterArc};
use inkwell_db::repositories::CharacterArcRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{CharacterArcView, Projector};
use crate::references::ensure_ref;
use crate::state::AppState;

/// GET /api/character-arcs
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<CharacterArcView>>> {
    let rows = CharacterArcRepo::list(&state.pool, auth.user_id).await?;
    let projector = Projector::new(&state.pool, &auth);
    let items: Vec<_> = rows.into_iter().map(|arc| projector.arc(arc)).collect();
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed character arcs");
    Ok(Json(items))
}

/// POST /api/character-arcs
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateCharacterArc>,
) -> AppResult<(StatusCode, Json<CharacterArcView>)> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Character, auth.user_id, "character", input.character).await?;
    let arc = CharacterArcRepo::create(&mut tx, auth.user_id, &input).await?;
    tx.commit().await?;

    tracing::info!(
        arc_id = %arc.id,
        character_id = %arc.character_id,
        user_id = auth.user_id,
        "Character arc created"
    );
    let view = Projector::new(&state.pool, &auth).arc(arc);
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/character-arcs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<CharacterArcView>> {
    let arc = CharacterArcRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("CharacterArc", id))?;
    Ok(Json(Projector::new(&state.pool, &auth).arc(arc)))
}

/// PUT /api/character-arcs/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateCharacterArc>,
) -> AppResult<Json<CharacterArcView>> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Character, auth.user_id, "character", input.character).await?;
    let arc = CharacterArcRepo::replace(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("CharacterArc", id))?;
    tx.commit().await?;

    tracing::info!(arc_id = %id, user_id = auth.user_id, "Character arc replaced");
    Ok(Json(Projector::new(&state.pool, &auth).arc(arc)))
}

/// PATCH /api/character-arcs/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateCharacterArc>,
) -> AppResult<Json<CharacterArcView>> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Character, auth.user_id, "character", input.character).await?;
    let arc = CharacterArcRepo::update(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("CharacterArc", id))?;
    tx.commit().await?;

    tracing::info!(arc_id = %id, user_id = auth.user_id, "Character arc updated");
    Ok(Json(Projector::new(&state.pool, &auth).arc(arc)))
}

/// DELETE /api/character-arcs/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if CharacterArcRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(arc_id = %id, user_id = auth.user_id, "Character arc deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("CharacterArc", id))
    }
}
