//! Repository for the `events` table.
//!
//! Character and item links live in `event_characters` / `event_items`.

use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgPool};

use crate::models::event::{CreateEvent, Event, UpdateEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, project_id, description, time_order, place_id, \
                       created_at, updated_at";

/// Provides CRUD operations for events. Every query is scoped to `owner`.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event authored by `owner`.
    pub async fn create(
        conn: &mut PgConnection,
        owner: UserId,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (author_id, project_id, description, time_order, place_id)
             VALUES ($1, $2, $3, COALESCE($4, 0), $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(owner)
            .bind(input.project)
            .bind(&input.description)
            .bind(input.time_order)
            .bind(input.place)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1 AND author_id = $2");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's events in story-time order.
    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE author_id = $1 ORDER BY time_order, created_at, id"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Fetch the owner's events among `ids`; foreign ids are skipped.
    pub async fn list_by_ids(
        pool: &PgPool,
        owner: UserId,
        ids: &[EntityId],
    ) -> Result<Vec<Event>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = ANY($1) AND author_id = $2");
        sqlx::query_as::<_, Event>(&query)
            .bind(ids)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    pub async fn replace(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &CreateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                project_id = $3,
                description = $4,
                time_order = COALESCE($5, 0),
                place_id = $6
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project)
            .bind(&input.description)
            .bind(input.time_order)
            .bind(input.place)
            .fetch_optional(conn)
            .await
    }

    pub async fn update(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                project_id = CASE WHEN $3 THEN $4 ELSE project_id END,
                description = COALESCE($5, description),
                time_order = COALESCE($6, time_order),
                place_id = CASE WHEN $7 THEN $8 ELSE place_id END
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project.is_some())
            .bind(input.project.flatten())
            .bind(&input.description)
            .bind(input.time_order)
            .bind(input.place.is_some())
            .bind(input.place.flatten())
            .fetch_optional(conn)
            .await
    }

    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
