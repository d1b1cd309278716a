//! Handlers for the `/api/projects` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkwell_db::models::project::{CreateProject, UpdateProject};
use inkwell_db::repositories::ProjectRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, EntityPath};
use crate::middleware::auth::AuthUser;
use crate::projection::{ProjectView, Projector};
use crate::state::AppState;

/// GET /api/projects
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<ProjectView>>> {
    let rows = ProjectRepo::list(&state.pool, auth.user_id).await?;
    let projector = Projector::new(&state.pool, &auth);
    let items: Vec<ProjectView> = rows.into_iter().map(|p| projector.project(p)).collect();
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed projects");
    Ok(Json(items))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectView>)> {
    input.validate()?;
    let project = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(project_id = %project.id, user_id = auth.user_id, "Project created");
    let view = Projector::new(&state.pool, &auth).project(project);
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<Json<ProjectView>> {
    let project = ProjectRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    Ok(Json(Projector::new(&state.pool, &auth).project(project)))
}

/// PUT /api/projects/{id}
pub async fn replace(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<CreateProject>,
) -> AppResult<Json<ProjectView>> {
    input.validate()?;
    let project = ProjectRepo::replace(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    tracing::info!(project_id = %id, user_id = auth.user_id, "Project replaced");
    Ok(Json(Projector::new(&state.pool, &auth).project(project)))
}

/// PATCH /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
    AppJson(input): AppJson<UpdateProject>,
) -> AppResult<Json<ProjectView>> {
    input.validate()?;
    let project = ProjectRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    tracing::info!(project_id = %id, user_id = auth.user_id, "Project updated");
    Ok(Json(Projector::new(&state.pool, &auth).project(project)))
}

/// DELETE /api/projects/{id}
///
/// Everything filed under the project is deleted with it.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityPath(id): EntityPath,
) -> AppResult<StatusCode> {
    if ProjectRepo::delete(&state.pool, auth.user_id, id).await? {
        tracing::info!(project_id = %id, user_id = auth.user_id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Project", id))
    }
}
