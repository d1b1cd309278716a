//! Repository for the `items` table. Owners live in `item_owners`.

use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgPool};

use crate::models::item::{CreateItem, Item, UpdateItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, project_id, name, origin, created_at, updated_at";

/// Provides CRUD operations for items. Every query is scoped to `owner`.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item authored by `owner`.
    pub async fn create(
        conn: &mut PgConnection,
        owner: UserId,
        input: &CreateItem,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (author_id, project_id, name, origin)
             VALUES ($1, $2, $3, COALESCE($4, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(owner)
            .bind(input.project)
            .bind(&input.name)
            .bind(&input.origin)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 AND author_id = $2");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<Item>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM items WHERE author_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, Item>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Fetch the owner's items among `ids`; foreign ids are skipped.
    pub async fn list_by_ids(
        pool: &PgPool,
        owner: UserId,
        ids: &[EntityId],
    ) -> Result<Vec<Item>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = ANY($1) AND author_id = $2");
        sqlx::query_as::<_, Item>(&query)
            .bind(ids)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    pub async fn replace(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &CreateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                project_id = $3,
                name = $4,
                origin = COALESCE($5, '')
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project)
            .bind(&input.name)
            .bind(&input.origin)
            .fetch_optional(conn)
            .await
    }

    pub async fn update(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                project_id = CASE WHEN $3 THEN $4 ELSE project_id END,
                name = COALESCE($5, name),
                origin = COALESCE($6, origin)
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project.is_some())
            .bind(input.project.flatten())
            .bind(&input.name)
            .bind(&input.origin)
            .fetch_optional(conn)
            .await
    }

    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
