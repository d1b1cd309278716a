//! Repository for the `projects` table.

use inkwell_core::types::{EntityId, UserId};
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, name, description, created_at, updated_at";

/// Provides CRUD operations for projects. Every query is scoped to `owner`.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project authored by `owner`.
    pub async fn create(
        pool: &PgPool,
        owner: UserId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (author_id, name, description)
             VALUES ($1, $2, COALESCE($3, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND author_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's projects, oldest first.
    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE author_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every writable column. Absent optionals reset to defaults.
    pub async fn replace(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
        input: &CreateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = $3,
                description = COALESCE($4, '')
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the row does not exist or is not the owner's.
    pub async fn update(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and, through cascades, everything filed under it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
