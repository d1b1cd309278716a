//! Repository for the `stories` table.
//!
//! Event links live in `story_events` and are written through
//! [`LinkRepo`](super::LinkRepo) by the caller, inside the same transaction.

use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgPool};

use crate::models::story::{CreateStory, Story, UpdateStory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, project_id, title, promise, plot, emotional_matter, \
                       universal_truth, logline, created_at, updated_at";

/// Provides CRUD operations for stories. Every query is scoped to `owner`.
pub struct StoryRepo;

impl StoryRepo {
    /// Insert a new story authored by `owner`.
    pub async fn create(
        conn: &mut PgConnection,
        owner: UserId,
        input: &CreateStory,
    ) -> Result<Story, sqlx::Error> {
        let query = format!(
            "INSERT INTO stories
                (author_id, project_id, title, promise, plot, emotional_matter, universal_truth, logline)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, ''), COALESCE($6, ''),
                     COALESCE($7, ''), COALESCE($8, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(owner)
            .bind(input.project)
            .bind(&input.title)
            .bind(&input.promise)
            .bind(&input.plot)
            .bind(&input.emotional_matter)
            .bind(&input.universal_truth)
            .bind(&input.logline)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = $1 AND author_id = $2");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's stories, oldest first.
    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<Story>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stories WHERE author_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every writable column. Absent optionals reset to defaults.
    pub async fn replace(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &CreateStory,
    ) -> Result<Option<Story>, sqlx::Error> {
        let query = format!(
            "UPDATE stories SET
                project_id = $3,
                title = $4,
                promise = COALESCE($5, ''),
                plot = COALESCE($6, ''),
                emotional_matter = COALESCE($7, ''),
                universal_truth = COALESCE($8, ''),
                logline = COALESCE($9, '')
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project)
            .bind(&input.title)
            .bind(&input.promise)
            .bind(&input.plot)
            .bind(&input.emotional_matter)
            .bind(&input.universal_truth)
            .bind(&input.logline)
            .fetch_optional(conn)
            .await
    }

    /// Update a story. Only supplied fields are applied; `project: null`
    /// detaches it from its project.
    pub async fn update(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &UpdateStory,
    ) -> Result<Option<Story>, sqlx::Error> {
        let query = format!(
            "UPDATE stories SET
                project_id = CASE WHEN $3 THEN $4 ELSE project_id END,
                title = COALESCE($5, title),
                promise = COALESCE($6, promise),
                plot = COALESCE($7, plot),
                emotional_matter = COALESCE($8, emotional_matter),
                universal_truth = COALESCE($9, universal_truth),
                logline = COALESCE($10, logline)
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project.is_some())
            .bind(input.project.flatten())
            .bind(&input.title)
            .bind(&input.promise)
            .bind(&input.plot)
            .bind(&input.emotional_matter)
            .bind(&input.universal_truth)
            .bind(&input.logline)
            .fetch_optional(conn)
            .await
    }

    /// Delete a story; chapters and event links cascade.
    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stories WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
