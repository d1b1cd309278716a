//! Repository for the `scenes` table.

use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgPool};

use crate::models::scene::{CreateScene, Scene, UpdateScene};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, project_id, short_description, place_id, \
                       external_conflict, interpersonal_conflict, internal_conflict, \
                       time_order, created_at, updated_at";

/// Provides CRUD operations for scenes. Every query is scoped to `owner`.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert a new scene authored by `owner`.
    pub async fn create(
        conn: &mut PgConnection,
        owner: UserId,
        input: &CreateScene,
    ) -> Result<Scene, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenes
                (author_id, project_id, short_description, place_id, external_conflict,
                 interpersonal_conflict, internal_conflict, time_order)
             VALUES ($1, $2, $3, $4, COALESCE($5, ''), COALESCE($6, ''), COALESCE($7, ''),
                     COALESCE($8, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(owner)
            .bind(input.project)
            .bind(&input.short_description)
            .bind(input.place)
            .bind(&input.external_conflict)
            .bind(&input.interpersonal_conflict)
            .bind(&input.internal_conflict)
            .bind(input.time_order)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1 AND author_id = $2");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes WHERE author_id = $1 ORDER BY time_order, created_at, id"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    pub async fn replace(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &CreateScene,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET
                project_id = $3,
                short_description = $4,
                place_id = $5,
                external_conflict = COALESCE($6, ''),
                interpersonal_conflict = COALESCE($7, ''),
                internal_conflict = COALESCE($8, ''),
                time_order = COALESCE($9, 0)
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project)
            .bind(&input.short_description)
            .bind(input.place)
            .bind(&input.external_conflict)
            .bind(&input.interpersonal_conflict)
            .bind(&input.internal_conflict)
            .bind(input.time_order)
            .fetch_optional(conn)
            .await
    }

    pub async fn update(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &UpdateScene,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET
                project_id = CASE WHEN $3 THEN $4 ELSE project_id END,
                short_description = COALESCE($5, short_description),
                place_id = CASE WHEN $6 THEN $7 ELSE place_id END,
                external_conflict = COALESCE($8, external_conflict),
                interpersonal_conflict = COALESCE($9, interpersonal_conflict),
                internal_conflict = COALESCE($10, internal_conflict),
                time_order = COALESCE($11, time_order)
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project.is_some())
            .bind(input.project.flatten())
            .bind(&input.short_description)
            .bind(input.place.is_some())
            .bind(input.place.flatten())
            .bind(&input.external_conflict)
            .bind(&input.interpersonal_conflict)
            .bind(&input.internal_conflict)
            .bind(input.time_order)
            .fetch_optional(conn)
            .await
    }

    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scenes WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
