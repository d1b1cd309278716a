//! Handlers for the `/api/characters` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_core::ownership::EntityKind;
use inkwell_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use inkwell_db::repositories::CharacterRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{single, CharacterView, Projector};
use crate::references::ensure_ref;
use crate::state::AppState;

async fn view(state: &AppState, auth: &AuthUser, character: Character) -> AppResult<CharacterView> {
    let id = character.id;
    let views = Projector::new(&state.pool, auth).characters(vec![character]).await?;
    single(views, "Character", id)
}

/// GET /api/characters
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<CharacterView>>> {
    let rows = CharacterRepo::list(&state.pool, auth.user_id).await?;
    let items = Projector::new(&state.pool, &auth).characters(rows).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed characters");
    Ok(Json(items))
}

/// POST /api/characters
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateCharacter>,
) -> AppResult<(StatusCode, Json<CharacterView>)> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_ref(&mut tx, EntityKind::Race, auth.user_id, "race", input.race).await?;
    let character = CharacterRepo::create(&mut tx, auth.user_id, &input).await?;
    tx.commit().await?;

    tracing::info!(
        character_id = %character.id,
        name = %character.name,
        user_id = auth.user_id,
        "Character created"
    );
    Ok((StatusCode::CREATED, Json(view(&state, &auth, character).await?)))
}

/// GET /api/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<CharacterView>> {
    let character = CharacterRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Character", id))?;
    Ok(Json(view(&state, &auth, character).await?))
}

/// PUT /api/characters/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateCharacter>,
) -> AppResult<Json<CharacterView>> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project).await?;
    ensure_ref(&mut tx, EntityKind::Race, auth.user_id, "race", input.race).await?;
    let character = CharacterRepo::replace(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Character", id))?;
    tx.commit().await?;

    tracing::info!(character_id = %id, user_id = auth.user_id, "Character replaced");
    Ok(Json(view(&state, &auth, character).await?))
}

/// PATCH /api/characters/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateCharacter>,
) -> AppResult<Json<CharacterView>> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    ensure_ref(&mut tx, EntityKind::Project, auth.user_id, "project", input.project.flatten()).await?;
    ensure_ref(&mut tx, EntityKind::Race, auth.user_id, "race", input.race.flatten()).await?;
    let character = CharacterRepo::update(&mut tx, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Character", id))?;
    tx.commit().await?;

    tracing::info!(character_id = %id, user_id = auth.user_id, "Character updated");
    Ok(Json(view(&state, &auth, character).await?))
}

/// DELETE /api/characters/{id}
///
/// Arcs and relationships touching the character are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if CharacterRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(character_id = %id, user_id = auth.user_id, "Character deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Character", id))
    }
}
