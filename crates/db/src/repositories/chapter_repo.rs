//! Repository for the `chapters` table.
//!
//! Chapters have no author; reads and writes go through the visibility of
//! the parent story. Ordering is `sort_order` ascending with `seq` (insertion
//! order) as the tie-breaker.

use inkwell_core::ownership::EntityKind;
use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgPool};

use crate::models::chapter::{Chapter, CreateChapter, UpdateChapter};
use crate::ownership::visibility_clause;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, story_id, title, content, sort_order, created_at, updated_at";

fn visible(owner_param: &str) -> String {
    visibility_clause(EntityKind::Chapter, "chapters", owner_param)
}

/// Provides CRUD operations for chapters.
pub struct ChapterRepo;

impl ChapterRepo {
    /// Insert a chapter. The caller has already checked the story is visible.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateChapter,
    ) -> Result<Chapter, sqlx::Error> {
        let query = format!(
            "INSERT INTO chapters (story_id, title, content, sort_order)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(input.story)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.order)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters WHERE id = $1 AND {}", visible("$2"));
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Every chapter in a story the owner can see.
    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<Chapter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chapters WHERE {} ORDER BY story_id, sort_order, seq",
            visible("$1")
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Chapters of the given (already visible) stories, in reading order.
    pub async fn list_for_stories(
        pool: &PgPool,
        story_ids: &[EntityId],
    ) -> Result<Vec<Chapter>, sqlx::Error> {
        if story_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM chapters
             WHERE story_id = ANY($1)
             ORDER BY sort_order, seq"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(story_ids)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every writable column. Absent optionals reset to defaults.
    pub async fn replace(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &CreateChapter,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!(
            "UPDATE chapters SET
                story_id = $3,
                title = $4,
                content = COALESCE($5, ''),
                sort_order = COALESCE($6, 0)
             WHERE id = $1 AND {}
             RETURNING {COLUMNS}",
            visible("$2")
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.story)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.order)
            .fetch_optional(conn)
            .await
    }

    /// Update a chapter. Only non-`None` fields in `input` are applied.
    pub async fn update(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &UpdateChapter,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!(
            "UPDATE chapters SET
                story_id = COALESCE($3, story_id),
                title = COALESCE($4, title),
                content = COALESCE($5, content),
                sort_order = COALESCE($6, sort_order)
             WHERE id = $1 AND {}
             RETURNING {COLUMNS}",
            visible("$2")
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.story)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.order)
            .fetch_optional(conn)
            .await
    }

    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM chapters WHERE id = $1 AND {}", visible("$2"));
        let result = sqlx::query(&query)
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
