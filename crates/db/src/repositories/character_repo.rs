//! Repository for the `characters` table.

use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgPool};

use crate::models::character::{Character, CreateCharacter, UpdateCharacter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, project_id, name, surname, nickname, gender, race_id, \
                       created_at, updated_at";

/// Provides CRUD operations for characters. Every query is scoped to `owner`.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character authored by `owner`.
    pub async fn create(
        conn: &mut PgConnection,
        owner: UserId,
        input: &CreateCharacter,
    ) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters (author_id, project_id, name, surname, nickname, gender, race_id)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, ''), COALESCE($6, ''), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(owner)
            .bind(input.project)
            .bind(&input.name)
            .bind(&input.surname)
            .bind(&input.nickname)
            .bind(&input.gender)
            .bind(input.race)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1 AND author_id = $2");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's characters, oldest first.
    pub async fn list(pool: &PgPool, owner: UserId) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters WHERE author_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Fetch the owner's characters among `ids`. Unknown or foreign ids are
    /// skipped; order is unspecified.
    pub async fn list_by_ids(
        pool: &PgPool,
        owner: UserId,
        ids: &[EntityId],
    ) -> Result<Vec<Character>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM characters WHERE id = ANY($1) AND author_id = $2"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(ids)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every writable column. Absent optionals reset to defaults.
    pub async fn replace(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &CreateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                project_id = $3,
                name = $4,
                surname = COALESCE($5, ''),
                nickname = COALESCE($6, ''),
                gender = COALESCE($7, ''),
                race_id = $8
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project)
            .bind(&input.name)
            .bind(&input.surname)
            .bind(&input.nickname)
            .bind(&input.gender)
            .bind(input.race)
            .fetch_optional(conn)
            .await
    }

    /// Update a character. Only supplied fields are applied; `race: null`
    /// clears the race.
    pub async fn update(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                project_id = CASE WHEN $3 THEN $4 ELSE project_id END,
                name = COALESCE($5, name),
                surname = COALESCE($6, surname),
                nickname = COALESCE($7, nickname),
                gender = COALESCE($8, gender),
                race_id = CASE WHEN $9 THEN $10 ELSE race_id END
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.project.is_some())
            .bind(input.project.flatten())
            .bind(&input.name)
            .bind(&input.surname)
            .bind(&input.nickname)
            .bind(&input.gender)
            .bind(input.race.is_some())
            .bind(input.race.flatten())
            .fetch_optional(conn)
            .await
    }

    /// Delete a character; arcs, relationships and link rows cascade.
    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
