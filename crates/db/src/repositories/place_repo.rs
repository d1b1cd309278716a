//! Repository for the `places` table.

use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::place::{CreatePlace, Place, UpdatePlace};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, project_id, name, parent_id, adjectives, created_at, updated_at";

/// Provides CRUD operations for places. Every query is scoped to `owner`.
pub struct PlaceRepo;

impl PlaceRepo {
    /// Insert a new place authored by `owner`.
    pub async fn create(
        conn: &mut PgConnection,
        owner: UserId,
        input: &CreatePlace,
    ) -> Result<Place, sqlx::Error> {
        let query = format!(
            "INSERT INTO places (author_id, project_id, name, parent_id, adjectives)
             VALUES ($1, $2, $3, $4, COALESCE($5, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(owner)
            .bind(input.project)
            .bind(&input.name)
            .bind(input.parent)
            .bind(&input.adjectives)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<Place>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM places WHERE id = $1 AND author_id = $2");
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Every place the owner has, oldest first. Places are few per author,
    /// so projections load the whole set and walk it in memory.
    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<Place>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM places WHERE author_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, Place>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// `(id, parent_id)` pairs for the owner's places.
    pub async fn edges<'e>(
        executor: impl PgExecutor<'e>,
        owner: UserId,
    ) -> Result<Vec<(EntityId, Option<EntityId>)>, sqlx::Error> {
        sqlx::query_as::<_, (EntityId, Option<EntityId>)>(
            "SELECT id, parent_id FROM places WHERE author_id = $1",
        )
        .bind(owner)
        .fetch_all(executor)
        .await
    }

    /// Overwrite every writable column. Absent optionals reset to defaults.
    pub async fn replace(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &CreatePlace,
    ) -> Result<Option<Place>, sqlx::Error> {
        let query = format!(
            "UPDATE places SET
                project_id = $3,
                name = $4,
                parent_id = $5,
                adjectives = COALESCE($6, '')
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project)
            .bind(&input.name)
            .bind(input.parent)
            .bind(&input.adjectives)
            .fetch_optional(conn)
            .await
    }

    /// Update a place. Only supplied fields are applied; `parent: null`
    /// makes it a root.
    pub async fn update(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &UpdatePlace,
    ) -> Result<Option<Place>, sqlx::Error> {
        let query = format!(
            "UPDATE places SET
                project_id = CASE WHEN $3 THEN $4 ELSE project_id END,
                name = COALESCE($5, name),
                parent_id = CASE WHEN $6 THEN $7 ELSE parent_id END,
                adjectives = COALESCE($8, adjectives)
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project.is_some())
            .bind(input.project.flatten())
            .bind(&input.name)
            .bind(input.parent.is_some())
            .bind(input.parent.flatten())
            .bind(&input.adjectives)
            .fetch_optional(conn)
            .await
    }

    /// Delete a place and its descendants; scenes and events keep existing
    /// with no place.
    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
