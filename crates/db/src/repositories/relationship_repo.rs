//! Repository for the `character_relationships` table.
//!
//! A relationship is visible when its `from_character` is.

use inkwell_core::ownership::EntityKind;
use inkwell_core::types::{EntityId, UserId};
use sqlx::{PgConnection, PgPool};

use crate::models::relationship::{
    CharacterRelationship, CreateCharacterRelationship, UpdateCharacterRelationship,
};
use crate::ownership::visibility_clause;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, from_character_id, to_character_id, types, description, created_at";

fn visible(owner_param: &str) -> String {
    visibility_clause(
        EntityKind::CharacterRelationship,
        "character_relationships",
        owner_param,
    )
}

/// Provides CRUD operations for character relationships.
pub struct RelationshipRepo;

impl RelationshipRepo {
    /// Insert a relationship. Both endpoints were checked by the caller.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateCharacterRelationship,
    ) -> Result<CharacterRelationship, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_relationships (from_character_id, to_character_id, types, description)
             VALUES ($1, $2, COALESCE($3, '{{}}'::TEXT[]), COALESCE($4, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterRelationship>(&query)
            .bind(input.from_character)
            .bind(input.to_character)
            .bind(&input.types)
            .bind(&input.description)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: UserId,
        id: EntityId,
    ) -> Result<Option<CharacterRelationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_relationships WHERE id = $1 AND {}",
            visible("$2")
        );
        sqlx::query_as::<_, CharacterRelationship>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        owner: UserId,
    ) -> Result<Vec<CharacterRelationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_relationships WHERE {} ORDER BY created_at, id",
            visible("$1")
        );
        sqlx::query_as::<_, CharacterRelationship>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Visible relationships starting or ending at any of `character_ids`.
    pub async fn list_touching(
        pool: &PgPool,
        owner: UserId,
        character_ids: &[EntityId],
    ) -> Result<Vec<CharacterRelationship>, sqlx::Error> {
        if character_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM character_relationships
             WHERE (from_character_id = ANY($2) OR to_character_id = ANY($2)) AND {}
             ORDER BY created_at, id",
            visible("$1")
        );
        sqlx::query_as::<_, CharacterRelationship>(&query)
            .bind(owner)
            .bind(character_ids)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every writable column. An absent `types` list resets to empty.
    pub async fn replace(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &CreateCharacterRelationship,
    ) -> Result<Option<CharacterRelationship>, sqlx::Error> {
        let query = format!(
            "UPDATE character_relationships SET
                from_character_id = $3,
                to_character_id = $4,
                types = COALESCE($5, '{{}}'::TEXT[]),
                description = COALESCE($6, '')
             WHERE id = $1 AND {}
             RETURNING {COLUMNS}",
            visible("$2")
        );
        sqlx::query_as::<_, CharacterRelationship>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.from_character)
            .bind(input.to_character)
            .bind(&input.types)
            .bind(&input.description)
            .fetch_optional(conn)
            .await
    }

    /// Update a relationship. Only supplied fields are applied; `types: null`
    /// empties the list.
    pub async fn update(
        conn: &mut PgConnection,
        owner: UserId,
        id: EntityId,
        input: &UpdateCharacterRelationship,
    ) -> Result<Option<CharacterRelationship>, sqlx::Error> {
        let query = format!(
            "UPDATE character_relationships SET
                from_character_id = COALESCE($3, from_character_id),
                to_character_id = COALESCE($4, to_character_id),
                types = CASE WHEN $5 THEN COALESCE($6, '{{}}'::TEXT[]) ELSE types END,
                description = COALESCE($7, description)
             WHERE id = $1 AND {}
             RETURNING {COLUMNS}",
            visible("$2")
        );
        sqlx::query_as::<_, CharacterRelationship>(&query)
            .bind(id)
            .bind(owner)
            .bind(input.from_character)
            .bind(input.to_character)
            .bind(input.types.is_some())
            .bind(input.types.clone().flatten())
            .bind(&input.description)
            .fetch_optional(conn)
            .await
    }

    pub async fn delete(pool: &PgPool, owner: UserId, id: EntityId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM character_relationships WHERE id = $1 AND {}",
            visible("$2")
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
