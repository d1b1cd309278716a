//! Repository for the `ideas` table.

use inkwell_core::types::{EntityId, UserId};
use sqlx::PgPool;

use crate::models::idea::{CreateIdea, Idea, UpdateIdea};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, project_id, content, idea_type, tags, linked_elements, \
                       created_at, updated_at";

/// Provides CRUD operations for ideas. Every query is scoped to `owner`.
pub struct IdeaRepo;

impl IdeaRepo {
    /// Insert a new idea authored by `owner`.
    pub async fn create(
        pool: &PgPool,
        owner: UserId,
        input: &CreateIdea,
    ) -> Result<Idea, sqlx::Error> {
        let query = format!(
            "INSERT INTO ideas (author_id, project_id, content, idea_type, tags, linked_elements)
             VALUES ($1, $2, $3, COALESCE($4, 'CONCEPT'), COALESCE($5, '{{}}'::TEXT[]),
                     COALESCE($6, '{{}}'::TEXT[]))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(owner)
            .bind(input.project)
            .bind(&input.content)
            .bind(&input.idea_type)
            .bind(&input.tags)
            .bind(&input.linked_elements)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas WHERE id = $1 AND author_id = $2");
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's ideas, newest first.
    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<Idea>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ideas WHERE author_id = $1 ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    pub async fn replace(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
        input: &CreateIdea,
    ) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET
                project_id = $3,
                content = $4,
                idea_type = COALESCE($5, 'CONCEPT'),
                tags = COALESCE($6, '{{}}'::TEXT[]),
                linked_elements = COALESCE($7, '{{}}'::TEXT[])
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project)
            .bind(&input.content)
            .bind(&input.idea_type)
            .bind(&input.tags)
            .bind(&input.linked_elements)
            .fetch_optional(pool)
            .await
    }

    /// Update an idea. A supplied list replaces the stored one; `null`
    /// empties it.
    pub async fn update(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
        input: &UpdateIdea,
    ) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET
                project_id = CASE WHEN $3 THEN $4 ELSE project_id END,
                content = COALESCE($5, content),
                idea_type = COALESCE($6, idea_type),
                tags = CASE WHEN $7 THEN COALESCE($8, '{{}}'::TEXT[]) ELSE tags END,
                linked_elements = CASE WHEN $9 THEN COALESCE($10, '{{}}'::TEXT[]) ELSE linked_elements END
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project.is_some())
            .bind(input.project.flatten())
            .bind(&input.content)
            .bind(&input.idea_type)
            .bind(input.tags.is_some())
            .bind(input.tags.clone().flatten())
            .bind(input.linked_elements.is_some())
            .bind(input.linked_elements.clone().flatten())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ideas WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
