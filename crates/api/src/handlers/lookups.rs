//! Handlers for the shared lookup tables, `/api/races` and
//! `/api/character-traits`.
//!
//! Both resources share these handlers; the route picks the table through
//! a marker type, e.g. `get(lookups::list::<Races>)`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_db::models::lookup::{CreateLookupEntry, LookupTable, UpdateLookupEntry};
use inkwell_db::repositories::LookupRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::LookupView;
use crate::state::AppState;

/// Selects the table a lookup handler works on.
pub trait Lookup: Send + Sync + 'static {
    const TABLE: LookupTable;
}

pub struct Races;

impl Lookup for Races {
    const TABLE: LookupTable = LookupTable::Races;
}

pub struct CharacterTraits;

impl Lookup for CharacterTraits {
    const TABLE: LookupTable = LookupTable::CharacterTraits;
}

fn not_found<L: Lookup>(id: impl std::fmt::Display) -> AppError {
    AppError::not_found(L::TABLE.kind().label(), id)
}

/// GET /api/{races,character-traits}
pub async fn list<L: Lookup>(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<LookupView>>> {
    let rows = LookupRepo::list(&state.pool, L::TABLE).await?;
    let items: Vec<LookupView> = rows.into_iter().map(LookupView::from).collect();
    tracing::debug!(count = items.len(), table = L::TABLE.table(), "Listed lookup entries");
    Ok(Json(items))
}

/// POST /api/{races,character-traits}
pub async fn create<L: Lookup>(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateLookupEntry>,
) -> AppResult<(StatusCode, Json<LookupView>)> {
    input.validate()?;
    let entry = LookupRepo::create(&state.pool, L::TABLE, &input).await?;
    tracing::info!(
        id = %entry.id,
        name = %entry.name,
        table = L::TABLE.table(),
        user_id = auth.user_id,
        "Lookup entry created"
    );
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// GET /api/{races,character-traits}/{id}
pub async fn get_by_id<L: Lookup>(
    State(state): State<AppState>,
    _auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<LookupView>> {
    let entry = LookupRepo::find_by_id(&state.pool, L::TABLE, id)
        .await?
        .ok_or_else(|| not_found::<L>(id))?;
    Ok(Json(entry.into()))
}

/// PUT /api/{races,character-traits}/{id}
pub async fn replace<L: Lookup>(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateLookupEntry>,
) -> AppResult<Json<LookupView>> {
    input.validate()?;
    let entry = LookupRepo::replace(&state.pool, L::TABLE, id, &input)
        .await?
        .ok_or_else(|| not_found::<L>(id))?;
    tracing::info!(id = %id, table = L::TABLE.table(), user_id = auth.user_id, "Lookup entry replaced");
    Ok(Json(entry.into()))
}

/// PATCH /api/{races,character-traits}/{id}
pub async fn update<L: Lookup>(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateLookupEntry>,
) -> AppResult<Json<LookupView>> {
    input.validate()?;
    let entry = LookupRepo::update(&state.pool, L::TABLE, id, &input)
        .await?
        .ok_or_else(|| not_found::<L>(id))?;
    tracing::info!(id = %id, table = L::TABLE.table(), user_id = auth.user_id, "Lookup entry updated");
    Ok(Json(entry.into()))
}

/// DELETE /api/{races,character-traits}/{id}
///
/// Characters of a deleted race keep existing with no race.
pub async fn delete<L: Lookup>(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if LookupRepo::delete(&state.pool, L::TABLE, id).await? {
        tracing::info!(id = %id, table = L::TABLE.table(), user_id = auth.user_id, "Lookup entry deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found::<L>(id))
    }
}
