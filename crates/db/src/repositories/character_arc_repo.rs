//! Repository for the `character_arcs` table.

use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgPool};

use crate::models::character_arc::{CharacterArc, CreateCharacterArc, UpdateCharacterArc};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, character_id, author_id, description, arc_type, start_trait, \
                       end_trait, change_trigger, created_at";

/// Provides CRUD operations for character arcs. Every query is scoped to `owner`.
pub struct CharacterArcRepo;

impl CharacterArcRepo {
    /// Insert an arc. The caller has already checked the character is visible.
    pub async fn create(
        conn: &mut PgConnection,
        owner: UserId,
        input: &CreateCharacterArc,
    ) -> Result<CharacterArc, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_arcs
                (character_id, author_id, description, arc_type, start_trait, end_trait, change_trigger)
             VALUES ($1, $2, $3, COALESCE($4, 'POSITIVE'), COALESCE($5, ''), COALESCE($6, ''),
                     COALESCE($7, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterArc>(&query)
            .bind(input.character)
            .bind(owner)
            .bind(&input.description)
            .bind(&input.arc_type)
            .bind(&input.start_trait)
            .bind(&input.end_trait)
            .bind(&input.change_trigger)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<CharacterArc>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM character_arcs WHERE id = $1 AND author_id = $2");
        sqlx::query_as::<_, CharacterArc>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<CharacterArc>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_arcs WHERE author_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, CharacterArc>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// The owner's arcs attached to any of `character_ids`.
    pub async fn list_for_characters(
        pool: &PgPool,
        owner: UserId,
        character_ids: &[EntityId],
    ) -> Result<Vec<CharacterArc>, sqlx::Error> {
        if character_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM character_arcs
             WHERE character_id = ANY($1) AND author_id = $2
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, CharacterArc>(&query)
            .bind(character_ids)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every writable column. Absent optionals reset to defaults.
    pub async fn replace(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &CreateCharacterArc,
    ) -> Result<Option<CharacterArc>, sqlx::Error> {
        let query = format!(
            "UPDATE character_arcs SET
                character_id = $3,
                description = $4,
                arc_type = COALESCE($5, 'POSITIVE'),
                start_trait = COALESCE($6, ''),
                end_trait = COALESCE($7, ''),
                change_trigger = COALESCE($8, '')
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterArc>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.character)
            .bind(&input.description)
            .bind(&input.arc_type)
            .bind(&input.start_trait)
            .bind(&input.end_trait)
            .bind(&input.change_trigger)
            .fetch_optional(conn)
            .await
    }

    /// Update an arc. Only non-`None` fields in `input` are applied.
    pub async fn update(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &UpdateCharacterArc,
    ) -> Result<Option<CharacterArc>, sqlx::Error> {
        let query = format!(
            "UPDATE character_arcs SET
                character_id = COALESCE($3, character_id),
                description = COALESCE($4, description),
                arc_type = COALESCE($5, arc_type),
                start_trait = COALESCE($6, start_trait),
                end_trait = COALESCE($7, end_trait),
                change_trigger = COALESCE($8, change_trigger)
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterArc>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.character)
            .bind(&input.description)
            .bind(&input.arc_type)
            .bind(&input.start_trait)
            .bind(&input.end_trait)
            .bind(&input.change_trigger)
            .fetch_optional(conn)
            .await
    }

    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM character_arcs WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
