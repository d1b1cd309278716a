//! Repository for the shared `races` and `character_traits` tables.

use inkwell_core::types::EntityId;
use sqlx::PgPool;

use crate::models::lookup::{CreateLookupEntry, LookupEntry, LookupTable, UpdateLookupEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at";

/// CRUD over a lookup table. Rows are global, so no owner is taken.
pub struct LookupRepo;

impl LookupRepo {
    pub async fn create(
        pool: &PgPool,
        table: LookupTable,
        input: &CreateLookupEntry,
    ) -> Result<LookupEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (name, description)
             VALUES ($1, COALESCE($2, ''))
             RETURNING {COLUMNS}",
            table.table()
        );
        sqlx::query_as::<_, LookupEntry>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        table: LookupTable,
        id: EntityId,
    ) -> Result<Option<LookupEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", table.table());
        sqlx::query_as::<_, LookupEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All entries, alphabetical.
    pub async fn list(pool: &PgPool, table: LookupTable) -> Result<Vec<LookupEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} ORDER BY name, id", table.table());
        sqlx::query_as::<_, LookupEntry>(&query).fetch_all(pool).await
    }

    pub async fn list_by_ids(
        pool: &PgPool,
        table: LookupTable,
        ids: &[EntityId],
    ) -> Result<Vec<LookupEntry>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = ANY($1)", table.table());
        sqlx::query_as::<_, LookupEntry>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    pub async fn replace(
        pool: &PgPool,
        table: LookupTable,
        id: EntityId,
        input: &CreateLookupEntry,
    ) -> Result<Option<LookupEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET name = $2, description = COALESCE($3, '')
             WHERE id = $1
             RETURNING {COLUMNS}",
            table.table()
        );
        sqlx::query_as::<_, LookupEntry>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        table: LookupTable,
        id: EntityId,
        input: &UpdateLookupEntry,
    ) -> Result<Option<LookupEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}",
            table.table()
        );
        sqlx::query_as::<_, LookupEntry>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete an entry. Characters using a deleted race keep existing with
    /// no race.
    pub async fn delete(
        pool: &PgPool,
        table: LookupTable,
        id: EntityId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table.table()))
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
